use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::detection_result::DetectionResult;
use crate::shared::frame::Frame;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("failed to load models from {uri}: {reason}")]
    ModelLoad { uri: String, reason: String },
    #[error("detection failed: {0}")]
    Detection(String),
    #[error("models are not loaded")]
    NotReady,
}

/// Which per-face attributes the engine should compute on a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectOptions {
    pub detect_landmarks: bool,
    pub detect_expressions: bool,
    pub detect_age_gender: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            detect_landmarks: true,
            detect_expressions: true,
            detect_age_gender: true,
        }
    }
}

impl DetectOptions {
    /// Strips attributes that were not requested.
    pub fn apply(&self, mut result: DetectionResult) -> DetectionResult {
        if !self.detect_landmarks {
            result.landmarks = None;
        }
        if !self.detect_expressions {
            result.expressions = None;
        }
        if !self.detect_age_gender {
            result.age_gender = None;
        }
        result
    }
}

/// Domain interface for the external face-analysis capability.
///
/// Both calls may take unbounded time and may fail; callers must not hold
/// any lock across them. Results are in the frame's own pixel space.
#[async_trait]
pub trait FaceAnalysisEngine: Send + Sync {
    async fn load_models(&self, base_uri: &str) -> Result<(), EngineError>;

    async fn detect(
        &self,
        frame: &Frame,
        options: DetectOptions,
    ) -> Result<Vec<DetectionResult>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::bounding_box::BoundingBox;
    use crate::detection::domain::detection_result::{AgeGender, Gender};
    use crate::detection::domain::expression::{Emotion, ExpressionScores};
    use crate::detection::domain::face_landmarks::{FaceLandmarks, Point};

    fn full_result() -> DetectionResult {
        DetectionResult::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0))
            .with_landmarks(FaceLandmarks::new(vec![Point::new(1.0, 1.0)]))
            .with_expressions(ExpressionScores::single(Emotion::Angry, 0.5))
            .with_age_gender(AgeGender {
                age: 20.0,
                gender: Gender::Male,
                gender_confidence: 0.5,
            })
    }

    #[test]
    fn test_default_options_keep_everything() {
        assert_eq!(DetectOptions::default().apply(full_result()), full_result());
    }

    #[test]
    fn test_apply_strips_disabled_attributes() {
        let options = DetectOptions {
            detect_landmarks: false,
            detect_expressions: true,
            detect_age_gender: false,
        };
        let stripped = options.apply(full_result());
        assert!(stripped.landmarks.is_none());
        assert!(stripped.expressions.is_some());
        assert!(stripped.age_gender.is_none());
    }

    #[test]
    fn test_options_deserialize_with_missing_fields() {
        let options: DetectOptions = serde_json::from_str(r#"{"detectAgeGender": false}"#).unwrap();
        assert!(options.detect_landmarks);
        assert!(options.detect_expressions);
        assert!(!options.detect_age_gender);
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::ModelLoad {
            uri: "models".into(),
            reason: "missing".into(),
        };
        assert_eq!(err.to_string(), "failed to load models from models: missing");
        assert_eq!(EngineError::NotReady.to_string(), "models are not loaded");
    }
}
