use crate::detection::domain::detection_result::DetectionResult;
use crate::recording::domain::emotion_sample::EmotionSample;

/// Accumulates emotion readings while tracking is on.
///
/// Only the first face of a pass is recorded; additional faces in the same
/// frame are ignored, so a session always follows a single subject.
#[derive(Debug, Default)]
pub struct EmotionRecorder {
    tracking: bool,
    history: Vec<EmotionSample>,
}

impl EmotionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session: history is cleared.
    pub fn start_tracking(&mut self) {
        self.history.clear();
        self.tracking = true;
    }

    /// Pauses recording. History is kept.
    pub fn stop_tracking(&mut self) {
        self.tracking = false;
    }

    /// Drops the history and turns tracking off.
    pub fn clear(&mut self) {
        self.history.clear();
        self.tracking = false;
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn history(&self) -> &[EmotionSample] {
        &self.history
    }

    /// Appends one sample for a completed pass when tracking and the first
    /// face carries expression scores.
    pub fn record_pass(
        &mut self,
        results: &[DetectionResult],
        timestamp: i64,
    ) -> Option<EmotionSample> {
        if !self.tracking {
            return None;
        }
        let scores = results.first()?.expressions?;
        let sample = EmotionSample::new(timestamp, scores);
        self.history.push(sample);
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::bounding_box::BoundingBox;
    use crate::detection::domain::expression::{Emotion, ExpressionScores};

    fn face(emotion: Emotion) -> DetectionResult {
        DetectionResult::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0))
            .with_expressions(ExpressionScores::single(emotion, 0.8))
    }

    #[test]
    fn test_ignores_passes_while_not_tracking() {
        let mut recorder = EmotionRecorder::new();
        assert!(recorder.record_pass(&[face(Emotion::Happy)], 1).is_none());
        assert!(recorder.history().is_empty());
    }

    #[test]
    fn test_records_first_face_only() {
        let mut recorder = EmotionRecorder::new();
        recorder.start_tracking();
        let sample = recorder
            .record_pass(&[face(Emotion::Sad), face(Emotion::Happy)], 10)
            .unwrap();

        assert_eq!(sample.dominant, Emotion::Sad);
        assert_eq!(recorder.history().len(), 1);
    }

    #[test]
    fn test_no_sample_without_faces() {
        let mut recorder = EmotionRecorder::new();
        recorder.start_tracking();
        assert!(recorder.record_pass(&[], 10).is_none());
        assert!(recorder.history().is_empty());
    }

    #[test]
    fn test_no_sample_when_first_face_lacks_expressions() {
        let mut recorder = EmotionRecorder::new();
        recorder.start_tracking();
        let plain = DetectionResult::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert!(recorder.record_pass(&[plain, face(Emotion::Happy)], 10).is_none());
    }

    #[test]
    fn test_history_keeps_capture_order() {
        let mut recorder = EmotionRecorder::new();
        recorder.start_tracking();
        for (t, e) in [(1, Emotion::Happy), (2, Emotion::Angry), (3, Emotion::Neutral)] {
            recorder.record_pass(&[face(e)], t);
        }
        let stamps: Vec<i64> = recorder.history().iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![1, 2, 3]);
    }

    #[test]
    fn test_start_tracking_resets_history() {
        let mut recorder = EmotionRecorder::new();
        recorder.start_tracking();
        recorder.record_pass(&[face(Emotion::Happy)], 1);
        recorder.start_tracking();
        assert!(recorder.history().is_empty());
        assert!(recorder.is_tracking());
    }

    #[test]
    fn test_stop_tracking_twice_keeps_history() {
        let mut recorder = EmotionRecorder::new();
        recorder.start_tracking();
        recorder.record_pass(&[face(Emotion::Happy)], 1);

        recorder.stop_tracking();
        let after_first = recorder.history().to_vec();
        recorder.stop_tracking();

        assert_eq!(recorder.history(), after_first.as_slice());
        assert!(!recorder.is_tracking());
        assert!(recorder.record_pass(&[face(Emotion::Sad)], 2).is_none());
    }

    #[test]
    fn test_clear_drops_history_and_tracking() {
        let mut recorder = EmotionRecorder::new();
        recorder.start_tracking();
        recorder.record_pass(&[face(Emotion::Happy)], 1);
        recorder.clear();
        assert!(recorder.history().is_empty());
        assert!(!recorder.is_tracking());
    }
}
