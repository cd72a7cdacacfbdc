use serde::{Deserialize, Serialize};

use crate::detection::domain::bounding_box::BoundingBox;
use crate::detection::domain::expression::ExpressionScores;
use crate::detection::domain::face_landmarks::FaceLandmarks;
use crate::shared::display_size::DisplaySize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGender {
    pub age: f64,
    pub gender: Gender,
    /// In `[0, 1]`.
    pub gender_confidence: f64,
}

/// One detected face from a single detection pass.
///
/// Produced fresh each pass and never mutated; the next pass replaces the
/// whole set rather than merging into it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
    /// Detector score for the box itself, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<FaceLandmarks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expressions: Option<ExpressionScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_gender: Option<AgeGender>,
}

impl DetectionResult {
    pub fn new(bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            confidence: None,
            landmarks: None,
            expressions: None,
            age_gender: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_landmarks(mut self, landmarks: FaceLandmarks) -> Self {
        self.landmarks = Some(landmarks);
        self
    }

    pub fn with_expressions(mut self, expressions: ExpressionScores) -> Self {
        self.expressions = Some(expressions);
        self
    }

    pub fn with_age_gender(mut self, age_gender: AgeGender) -> Self {
        self.age_gender = Some(age_gender);
        self
    }

    /// Geometry scaled per axis; scores and age/gender are untouched.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            bounding_box: self.bounding_box.scaled(sx, sy),
            landmarks: self.landmarks.as_ref().map(|l| l.scaled(sx, sy)),
            ..self.clone()
        }
    }
}

/// Maps results computed in `source` pixel space onto a `target` drawing area.
pub fn resize_results(
    results: &[DetectionResult],
    source: DisplaySize,
    target: DisplaySize,
) -> Vec<DetectionResult> {
    let (sx, sy) = target.scale_from(source);
    results.iter().map(|r| r.scaled(sx, sy)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::expression::Emotion;
    use crate::detection::domain::face_landmarks::Point;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn face() -> DetectionResult {
        DetectionResult::new(BoundingBox::new(100.0, 50.0, 80.0, 120.0))
            .with_confidence(0.93)
            .with_landmarks(FaceLandmarks::new(vec![Point::new(120.0, 90.0)]))
            .with_expressions(ExpressionScores::single(Emotion::Happy, 0.8))
            .with_age_gender(AgeGender {
                age: 31.4,
                gender: Gender::Female,
                gender_confidence: 0.88,
            })
    }

    #[test]
    fn test_resize_identity_when_sizes_match() {
        let size = DisplaySize::new(640, 480);
        let resized = resize_results(&[face()], size, size);
        assert_eq!(resized, vec![face()]);
    }

    #[rstest]
    #[case::double(DisplaySize::new(1280, 960), 2.0, 2.0)]
    #[case::half(DisplaySize::new(320, 240), 0.5, 0.5)]
    #[case::stretch(DisplaySize::new(1280, 240), 2.0, 0.5)]
    fn test_resize_scales_linearly(
        #[case] target: DisplaySize,
        #[case] sx: f64,
        #[case] sy: f64,
    ) {
        let resized = resize_results(&[face()], DisplaySize::new(640, 480), target);
        let b = resized[0].bounding_box;
        assert_relative_eq!(b.x, 100.0 * sx);
        assert_relative_eq!(b.y, 50.0 * sy);
        assert_relative_eq!(b.width, 80.0 * sx);
        assert_relative_eq!(b.height, 120.0 * sy);

        let p = resized[0].landmarks.as_ref().unwrap().points()[0];
        assert_relative_eq!(p.x, 120.0 * sx);
        assert_relative_eq!(p.y, 90.0 * sy);
    }

    #[test]
    fn test_resize_keeps_non_geometric_attributes() {
        let resized = resize_results(&[face()], DisplaySize::new(640, 480), DisplaySize::new(64, 48));
        assert_eq!(resized[0].expressions, face().expressions);
        assert_eq!(resized[0].age_gender, face().age_gender);
        assert_eq!(resized[0].confidence, Some(0.93));
    }

    #[test]
    fn test_resize_empty() {
        assert!(resize_results(&[], DisplaySize::new(1, 1), DisplaySize::new(2, 2)).is_empty());
    }

    #[test]
    fn test_deserialize_minimal_result() {
        let json = r#"{"box": {"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0}}"#;
        let r: DetectionResult = serde_json::from_str(json).unwrap();
        assert_eq!(r, DetectionResult::new(BoundingBox::new(1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_deserialize_full_result() {
        let json = r#"{
            "box": {"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0},
            "confidence": 0.7,
            "landmarks": [{"x": 1.5, "y": 2.5}],
            "expressions": {"sad": 0.9},
            "ageGender": {"age": 40.0, "gender": "male", "genderConfidence": 0.6}
        }"#;
        let r: DetectionResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.expressions.unwrap().dominant(), Emotion::Sad);
        assert_eq!(r.age_gender.unwrap().gender, Gender::Male);
        assert_eq!(r.landmarks.unwrap().len(), 1);
    }
}
