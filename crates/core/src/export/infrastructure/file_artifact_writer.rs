use std::path::{Path, PathBuf};

use crate::export::domain::artifact_writer::ArtifactWriter;
use crate::export::domain::export_error::ExportError;

/// Writes artifacts into a directory, creating it on first use.
pub struct FileArtifactWriter {
    dir: PathBuf,
}

impl FileArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactWriter for FileArtifactWriter {
    fn write(&self, name: &str, contents: &[u8]) -> Result<PathBuf, ExportError> {
        let io_error = |path: &Path, source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.dir.join(name);
        std::fs::write(&path, contents).map_err(|e| io_error(&path, e))?;
        log::info!("Wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_into_nested_directory() {
        let tmp = TempDir::new().unwrap();
        let writer = FileArtifactWriter::new(tmp.path().join("exports/today"));

        let path = writer.write("a.csv", b"x,y").unwrap();

        assert_eq!(path, tmp.path().join("exports/today/a.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"x,y");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let writer = FileArtifactWriter::new(tmp.path());
        writer.write("a.json", b"old").unwrap();
        writer.write("a.json", b"new").unwrap();
        assert_eq!(std::fs::read(tmp.path().join("a.json")).unwrap(), b"new");
    }

    #[test]
    fn test_unwritable_location_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"").unwrap();
        let writer = FileArtifactWriter::new(blocker.join("sub"));

        let err = writer.write("a.json", b"{}").unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
