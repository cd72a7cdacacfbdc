/// Camera detection cadence (~10 passes per second).
pub const DEFAULT_TICK_PERIOD_MS: u64 = 100;

pub const DEFAULT_MODEL_URI: &str = "models";
pub const DETECTIONS_MANIFEST_NAME: &str = "detections.json";

/// Fallback drawing area for still images when the container size is unknown.
pub const DEFAULT_STILL_CONTAINER: (u32, u32) = (800, 600);

/// Expression labels below this score are not annotated.
pub const EXPRESSION_MIN_CONFIDENCE: f64 = 0.1;

/// Vertical gap between a box's top edge and its age/gender label baseline.
pub const AGE_GENDER_LABEL_OFFSET: f64 = 10.0;

pub const EXPORT_FILE_STEM: &str = "emotion-data";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
