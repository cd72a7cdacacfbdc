use std::path::PathBuf;

use crate::export::domain::export_error::ExportError;

/// Destination for downloadable export files.
pub trait ArtifactWriter: Send + Sync {
    /// Stores `contents` under `name` and returns where it landed.
    fn write(&self, name: &str, contents: &[u8]) -> Result<PathBuf, ExportError>;
}
