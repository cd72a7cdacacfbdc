pub mod artifact_writer;
pub mod export_error;
