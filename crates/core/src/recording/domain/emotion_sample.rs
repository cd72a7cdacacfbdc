use serde::{Deserialize, Serialize};

use crate::detection::domain::expression::{Emotion, ExpressionScores};

/// One recorded emotion reading. Immutable once appended to a history.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionSample {
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "emotions")]
    pub scores: ExpressionScores,
    #[serde(rename = "dominantEmotion")]
    pub dominant: Emotion,
}

impl EmotionSample {
    pub fn new(timestamp: i64, scores: ExpressionScores) -> Self {
        Self {
            timestamp,
            scores,
            dominant: scores.dominant(),
        }
    }
}
