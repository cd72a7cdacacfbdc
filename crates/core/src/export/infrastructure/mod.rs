pub mod file_artifact_writer;
