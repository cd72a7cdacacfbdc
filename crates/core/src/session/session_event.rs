use crate::recording::domain::emotion_sample::EmotionSample;
use crate::shared::display_size::DisplaySize;

/// Notifications for the presentation layer, in the order they happened.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    ModelsLoaded,
    ModelLoadFailed(String),
    CameraStarted(DisplaySize),
    CameraDenied(String),
    CameraReleased,
    StillImageLoaded(DisplaySize),
    ImageDecodeFailed(String),
    OverlayRendered { faces: usize },
    SampleRecorded(EmotionSample),
    DetectionFailed(String),
    TrackingChanged(bool),
    HistoryCleared,
}
