//! Derived views over an emotion history. Nothing here is stored; every
//! call recomputes from the samples it is given.

use serde::Serialize;

use crate::detection::domain::expression::{Emotion, ExpressionScores};
use crate::recording::domain::emotion_sample::EmotionSample;
use crate::recording::domain::session_record::duration_secs;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionSummaryEntry {
    #[serde(rename = "label")]
    pub emotion: Emotion,
    pub count: usize,
    /// `100 * count / total`.
    pub percentage: f64,
    pub display_color: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub dominant: Option<EmotionSummaryEntry>,
    pub data_points: usize,
    pub duration_secs: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub index: usize,
    pub timestamp: i64,
    pub scores: ExpressionScores,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSlice {
    pub label: &'static str,
    pub percentage: f64,
    pub display_color: &'static str,
}

/// Counts dominant labels, most frequent first.
///
/// Labels never seen are left out. Equal counts keep canonical label order.
pub fn summarize(history: &[EmotionSample]) -> Vec<EmotionSummaryEntry> {
    if history.is_empty() {
        return Vec::new();
    }

    let mut counts = [0usize; 7];
    for sample in history {
        if let Some(slot) = Emotion::ALL.iter().position(|e| *e == sample.dominant) {
            counts[slot] += 1;
        }
    }

    let total = history.len() as f64;
    let mut entries: Vec<EmotionSummaryEntry> = Emotion::ALL
        .into_iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(emotion, count)| EmotionSummaryEntry {
            emotion,
            count,
            percentage: 100.0 * count as f64 / total,
            display_color: emotion.display_color(),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

pub fn session_stats(history: &[EmotionSample]) -> SessionStats {
    SessionStats {
        dominant: summarize(history).into_iter().next(),
        data_points: history.len(),
        duration_secs: duration_secs(history),
    }
}

/// One point per sample, in capture order, for line charts.
pub fn timeline(history: &[EmotionSample]) -> Vec<TimelinePoint> {
    history
        .iter()
        .enumerate()
        .map(|(index, sample)| TimelinePoint {
            index,
            timestamp: sample.timestamp,
            scores: sample.scores,
        })
        .collect()
}

/// Pie-chart slices, same order as [`summarize`].
pub fn distribution(history: &[EmotionSample]) -> Vec<DistributionSlice> {
    summarize(history)
        .into_iter()
        .map(|entry| DistributionSlice {
            label: entry.emotion.title(),
            percentage: entry.percentage,
            display_color: entry.display_color,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn sample(timestamp: i64, emotion: Emotion) -> EmotionSample {
        EmotionSample::new(timestamp, ExpressionScores::single(emotion, 0.9))
    }

    fn history_of(emotions: &[Emotion]) -> Vec<EmotionSample> {
        emotions
            .iter()
            .enumerate()
            .map(|(i, e)| sample(1_000 * i as i64, *e))
            .collect()
    }

    #[test]
    fn test_empty_history_has_empty_summary() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_happy_happy_sad() {
        let summary = summarize(&history_of(&[Emotion::Happy, Emotion::Happy, Emotion::Sad]));

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].emotion, Emotion::Happy);
        assert_eq!(summary[0].count, 2);
        assert_relative_eq!(summary[0].percentage, 66.7, epsilon = 0.05);
        assert_eq!(summary[1].emotion, Emotion::Sad);
        assert_eq!(summary[1].count, 1);
        assert_relative_eq!(summary[1].percentage, 33.3, epsilon = 0.05);
        assert_eq!(summary[0].display_color, Emotion::Happy.display_color());
    }

    #[test]
    fn test_equal_counts_keep_canonical_order() {
        let summary = summarize(&history_of(&[
            Emotion::Surprised,
            Emotion::Angry,
            Emotion::Neutral,
        ]));
        let order: Vec<Emotion> = summary.iter().map(|e| e.emotion).collect();
        assert_eq!(order, vec![Emotion::Neutral, Emotion::Angry, Emotion::Surprised]);
    }

    #[rstest]
    #[case(vec![Emotion::Happy])]
    #[case(vec![Emotion::Sad, Emotion::Sad, Emotion::Fearful])]
    #[case(vec![
        Emotion::Neutral, Emotion::Happy, Emotion::Sad, Emotion::Angry,
        Emotion::Fearful, Emotion::Disgusted, Emotion::Surprised,
    ])]
    #[case(Emotion::ALL.iter().cycle().take(23).copied().collect())]
    fn test_percentages_and_counts_add_up(#[case] emotions: Vec<Emotion>) {
        let summary = summarize(&history_of(&emotions));
        let percent: f64 = summary.iter().map(|e| e.percentage).sum();
        let count: usize = summary.iter().map(|e| e.count).sum();

        assert_relative_eq!(percent, 100.0, epsilon = 1e-9);
        assert_eq!(count, emotions.len());
        assert!(summary.windows(2).all(|w| w[0].percentage >= w[1].percentage));
    }

    #[test]
    fn test_session_stats() {
        let history = vec![
            sample(10_000, Emotion::Angry),
            sample(12_000, Emotion::Angry),
            sample(15_400, Emotion::Happy),
        ];
        let stats = session_stats(&history);
        assert_eq!(stats.data_points, 3);
        assert_eq!(stats.duration_secs, 5);
        assert_eq!(stats.dominant.unwrap().emotion, Emotion::Angry);
    }

    #[test]
    fn test_session_stats_empty() {
        let stats = session_stats(&[]);
        assert_eq!(stats.data_points, 0);
        assert_eq!(stats.duration_secs, 0);
        assert!(stats.dominant.is_none());
    }

    #[test]
    fn test_timeline_follows_capture_order() {
        let history = history_of(&[Emotion::Sad, Emotion::Happy]);
        let points = timeline(&history);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].index, 1);
        assert_eq!(points[1].timestamp, 1_000);
        assert_relative_eq!(points[1].scores.get(Emotion::Happy), 0.9);
    }

    #[test]
    fn test_distribution_matches_summary() {
        let slices = distribution(&history_of(&[Emotion::Disgusted, Emotion::Happy, Emotion::Happy]));
        assert_eq!(slices[0].label, "Happy");
        assert_relative_eq!(slices[1].percentage, 100.0 / 3.0);
        assert_eq!(slices[1].display_color, "#35ea35ff");
    }
}
