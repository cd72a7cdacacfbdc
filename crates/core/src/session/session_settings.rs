use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detection::domain::face_analysis_engine::DetectOptions;
use crate::overlay::domain::display_toggles::DisplayToggles;
use crate::shared::constants::{DEFAULT_MODEL_URI, DEFAULT_STILL_CONTAINER, DEFAULT_TICK_PERIOD_MS};
use crate::shared::display_size::DisplaySize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Camera detection cadence.
    pub tick_period_ms: u64,
    pub model_uri: String,
    pub detect_options: DetectOptions,
    /// Toggle state a new session starts with.
    pub toggles: DisplayToggles,
    /// Display box for still images.
    pub still_container: DisplaySize,
    pub export_dir: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        let (width, height) = DEFAULT_STILL_CONTAINER;
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            model_uri: DEFAULT_MODEL_URI.to_string(),
            detect_options: DetectOptions::default(),
            toggles: DisplayToggles::default(),
            still_container: DisplaySize::new(width, height),
            export_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl SessionSettings {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.max(1))
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceLens").join("settings.json"))
    }

    /// Stored settings, or defaults when none exist or they cannot be read.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                log::warn!("Could not save settings to {}: {e}", path.display());
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = SessionSettings::default();
        assert_eq!(settings.tick_period(), Duration::from_millis(100));
        assert_eq!(settings.model_uri, "models");
        assert_eq!(settings.detect_options, DetectOptions::default());
        assert_eq!(settings.toggles, DisplayToggles::default());
        assert_eq!(settings.still_container, DisplaySize::new(800, 600));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/settings.json");
        let settings = SessionSettings {
            tick_period_ms: 250,
            model_uri: "/opt/models".into(),
            toggles: DisplayToggles {
                show_landmarks: true,
                show_expressions: false,
            },
            ..SessionSettings::default()
        };

        settings.save_to(&path).unwrap();

        assert_eq!(SessionSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(
            SessionSettings::load_from(&tmp.path().join("absent.json")),
            SessionSettings::default()
        );
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();
        assert_eq!(SessionSettings::load_from(&path), SessionSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"tick_period_ms": 40}"#).unwrap();

        let settings = SessionSettings::load_from(&path);
        assert_eq!(settings.tick_period_ms, 40);
        assert_eq!(settings.model_uri, "models");
    }

    #[test]
    fn test_zero_tick_period_is_clamped() {
        let settings = SessionSettings {
            tick_period_ms: 0,
            ..SessionSettings::default()
        };
        assert_eq!(settings.tick_period(), Duration::from_millis(1));
    }
}
