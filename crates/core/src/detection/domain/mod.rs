pub mod bounding_box;
pub mod detection_result;
pub mod expression;
pub mod face_analysis_engine;
pub mod face_landmarks;
pub mod model_lifecycle;
