use std::time::Duration;

use async_trait::async_trait;

use crate::detection::domain::detection_result::DetectionResult;
use crate::detection::domain::face_analysis_engine::{
    DetectOptions, EngineError, FaceAnalysisEngine,
};
use crate::shared::frame::Frame;

/// Decorator that delays every `detect` call by a fixed duration before
/// delegating, to reproduce slow inference against a fast engine.
pub struct LatencyEngine {
    inner: Box<dyn FaceAnalysisEngine>,
    delay: Duration,
}

impl LatencyEngine {
    pub fn new(inner: Box<dyn FaceAnalysisEngine>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl FaceAnalysisEngine for LatencyEngine {
    async fn load_models(&self, base_uri: &str) -> Result<(), EngineError> {
        self.inner.load_models(base_uri).await
    }

    async fn detect(
        &self,
        frame: &Frame,
        options: DetectOptions,
    ) -> Result<Vec<DetectionResult>, EngineError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.detect(frame, options).await
    }
}
