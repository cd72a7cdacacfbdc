use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::Deserialize;

use crate::detection::domain::detection_result::DetectionResult;
use crate::detection::domain::face_analysis_engine::{
    DetectOptions, EngineError, FaceAnalysisEngine,
};
use crate::shared::constants::DETECTIONS_MANIFEST_NAME;
use crate::shared::frame::Frame;
use crate::shared::model_resolver;

/// Pre-computed detections, keyed by frame index.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplayScript {
    #[serde(default)]
    frames: HashMap<usize, Vec<DetectionResult>>,
    /// Wrap frame indices past the last scripted frame.
    #[serde(default)]
    cycle: bool,
    /// Frame indices whose pass reports a detection failure.
    #[serde(default)]
    fail_frames: BTreeSet<usize>,
}

impl ReplayScript {
    fn key_for(&self, index: usize) -> usize {
        let len = self.frames.keys().max().map_or(0, |max| max + 1);
        if self.cycle && len > 0 {
            index % len
        } else {
            index
        }
    }
}

/// Replays pre-computed analysis results by frame index.
///
/// `load_models` reads a `detections.json` manifest from the resolved model
/// directory. Frames with no entry yield no faces, like an empty room.
pub struct ReplayEngine {
    script: RwLock<Option<Arc<ReplayScript>>>,
}

impl ReplayEngine {
    pub fn new() -> Self {
        Self {
            script: RwLock::new(None),
        }
    }

    /// An engine that is ready without loading, for tests and demos.
    pub fn preloaded(frames: HashMap<usize, Vec<DetectionResult>>, cycle: bool) -> Self {
        let script = ReplayScript {
            frames,
            cycle,
            fail_frames: BTreeSet::new(),
        };
        Self {
            script: RwLock::new(Some(Arc::new(script))),
        }
    }

    fn read_manifest(dir: &Path) -> Result<ReplayScript, String> {
        let path = dir.join(DETECTIONS_MANIFEST_NAME);
        let content =
            std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        serde_json::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))
    }

    fn current(&self) -> Option<Arc<ReplayScript>> {
        self.script
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ReplayEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FaceAnalysisEngine for ReplayEngine {
    async fn load_models(&self, base_uri: &str) -> Result<(), EngineError> {
        let load_error = |reason: String| EngineError::ModelLoad {
            uri: base_uri.to_string(),
            reason,
        };
        let dir = model_resolver::resolve(base_uri).map_err(|e| load_error(e.to_string()))?;
        let script = Self::read_manifest(&dir).map_err(load_error)?;
        log::info!(
            "Loaded replay manifest from {} ({} scripted frames, cycle={})",
            dir.display(),
            script.frames.len(),
            script.cycle
        );
        *self.script.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(script));
        Ok(())
    }

    async fn detect(
        &self,
        frame: &Frame,
        options: DetectOptions,
    ) -> Result<Vec<DetectionResult>, EngineError> {
        let script = self.current().ok_or(EngineError::NotReady)?;
        let key = script.key_for(frame.index());
        if script.fail_frames.contains(&key) {
            return Err(EngineError::Detection(format!(
                "scripted failure at frame {key}"
            )));
        }
        Ok(script
            .frames
            .get(&key)
            .map(|results| results.iter().cloned().map(|r| options.apply(r)).collect())
            .unwrap_or_default())
    }
}
