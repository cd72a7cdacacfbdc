use serde::Serialize;

use crate::recording::domain::emotion_sample::EmotionSample;
use crate::recording::emotion_summary::{summarize, EmotionSummaryEntry};

/// Snapshot of one tracking session, built on demand from the history.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub start_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Whole seconds between first and last sample.
    pub duration: i64,
    pub emotion_history: Vec<EmotionSample>,
    pub summary: Vec<EmotionSummaryEntry>,
}

impl SessionRecord {
    /// `now` stands in for the start time when nothing was recorded.
    pub fn from_history(history: &[EmotionSample], now: i64) -> Self {
        let start_time = history.first().map_or(now, |s| s.timestamp);
        let end_time = history.last().map(|s| s.timestamp);
        Self {
            id: format!("session-{start_time}"),
            start_time,
            end_time,
            duration: duration_secs(history),
            emotion_history: history.to_vec(),
            summary: summarize(history),
        }
    }
}

/// `round((last - first) / 1000)`, or 0 with fewer than two samples.
pub fn duration_secs(history: &[EmotionSample]) -> i64 {
    match (history.first(), history.last()) {
        (Some(first), Some(last)) => ((last.timestamp - first.timestamp) as f64 / 1000.0).round() as i64,
        _ => 0,
    }
}
