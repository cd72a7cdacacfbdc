pub mod domain;
pub mod infrastructure;
pub mod input_source_manager;
