pub mod emotion_sample;
pub mod session_record;
