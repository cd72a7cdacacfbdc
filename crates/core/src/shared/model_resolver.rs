use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model location not found: {0}")]
    NotFound(String),
    #[error("model location is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("could not determine data directory")]
    NoDataDir,
}

/// Resolve a model base URI to a local directory holding the engine's assets.
///
/// Resolution order:
/// 1. The URI as a filesystem path (absolute, or relative to the working dir)
/// 2. The same name under the user data directory (platform-specific)
///
/// A `file://` prefix is accepted and stripped.
pub fn resolve(base_uri: &str) -> Result<PathBuf, ModelResolveError> {
    resolve_with_fallback(base_uri, model_data_dir().ok().as_deref())
}

/// Like [`resolve`] but with an explicit fallback root instead of the
/// platform data directory.
pub fn resolve_with_fallback(
    base_uri: &str,
    fallback_root: Option<&Path>,
) -> Result<PathBuf, ModelResolveError> {
    let trimmed = base_uri.strip_prefix("file://").unwrap_or(base_uri);
    if trimmed.is_empty() {
        return Err(ModelResolveError::NotFound(base_uri.to_string()));
    }

    let direct = PathBuf::from(trimmed);
    if direct.exists() {
        return ensure_dir(direct);
    }

    if let Some(root) = fallback_root {
        let relative = trimmed.trim_start_matches('/');
        let candidate = root.join(relative);
        if candidate.exists() {
            return ensure_dir(candidate);
        }
    }

    Err(ModelResolveError::NotFound(base_uri.to_string()))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, ModelResolveError> {
    if path.is_dir() {
        Ok(path)
    } else {
        Err(ModelResolveError::NotADirectory(path))
    }
}

/// Platform-specific model data directory.
///
/// - macOS: `~/Library/Application Support/FaceLens/models/`
/// - Linux: `$XDG_DATA_HOME/FaceLens/models/` or `~/.local/share/FaceLens/models/`
/// - Windows: `%APPDATA%/FaceLens/models/`
pub fn model_data_dir() -> Result<PathBuf, ModelResolveError> {
    dirs::data_dir()
        .map(|d| d.join("FaceLens").join("models"))
        .ok_or(ModelResolveError::NoDataDir)
}
