pub mod domain;
pub mod export_formatter;
pub mod export_session_use_case;
pub mod infrastructure;
