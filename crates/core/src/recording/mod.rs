pub mod domain;
pub mod emotion_recorder;
pub mod emotion_summary;
