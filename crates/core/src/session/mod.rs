pub mod detection_scheduler;
pub mod detection_session;
pub mod pass_logger;
pub mod session_event;
pub mod session_settings;
pub mod session_status;
