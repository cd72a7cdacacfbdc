use chrono::{SecondsFormat, TimeZone, Utc};
use serde::Serialize;

use crate::detection::domain::expression::Emotion;
use crate::recording::domain::emotion_sample::EmotionSample;

/// Column order of the tabular export.
pub const TABULAR_HEADER: [&str; 9] = [
    "Timestamp",
    "Neutral",
    "Happy",
    "Sad",
    "Angry",
    "Fearful",
    "Disgusted",
    "Surprised",
    "Dominant",
];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredRecord {
    pub session_start: String,
    pub session_end: String,
    pub data_point_count: usize,
    pub samples: Vec<EmotionSample>,
}

/// Whole-session record. Start and end fall back to `now_millis` when the
/// history is empty.
pub fn to_structured_record(history: &[EmotionSample], now_millis: i64) -> StructuredRecord {
    let start = history.first().map_or(now_millis, |s| s.timestamp);
    let end = history.last().map_or(now_millis, |s| s.timestamp);
    StructuredRecord {
        session_start: format_timestamp(start),
        session_end: format_timestamp(end),
        data_point_count: history.len(),
        samples: history.to_vec(),
    }
}

/// Header plus one comma-separated row per sample. Scores are written with
/// every significant digit.
pub fn to_tabular_record(history: &[EmotionSample]) -> String {
    let mut lines = Vec::with_capacity(history.len() + 1);
    lines.push(TABULAR_HEADER.join(","));
    for sample in history {
        let mut fields = Vec::with_capacity(TABULAR_HEADER.len());
        fields.push(format_timestamp(sample.timestamp));
        fields.extend(Emotion::ALL.iter().map(|e| sample.scores.get(*e).to_string()));
        fields.push(sample.dominant.label().to_string());
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

/// RFC 3339 UTC with millisecond precision. Out-of-range values fall back
/// to the raw millisecond count.
pub fn format_timestamp(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::expression::ExpressionScores;

    fn sample(timestamp: i64) -> EmotionSample {
        EmotionSample::new(
            timestamp,
            ExpressionScores::new([0.1, 0.123456789012345, 0.0, 0.0, 0.0, 0.0, 1e-7]),
        )
    }

    #[test]
    fn test_single_sample_tabular_record() {
        let csv = to_tabular_record(&[sample(1_700_000_000_123)]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Timestamp,Neutral,Happy,Sad,Angry,Fearful,Disgusted,Surprised,Dominant"
        );
        assert_eq!(
            lines[1],
            "2023-11-14T22:13:20.123Z,0.1,0.123456789012345,0,0,0,0,0.0000001,happy"
        );
    }

    #[test]
    fn test_empty_history_has_only_header() {
        assert_eq!(to_tabular_record(&[]).lines().count(), 1);
    }

    #[test]
    fn test_rows_keep_order() {
        let csv = to_tabular_record(&[sample(0), sample(1_000), sample(2_000)]);
        let stamps: Vec<&str> = csv
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(
            stamps,
            vec![
                "1970-01-01T00:00:00.000Z",
                "1970-01-01T00:00:01.000Z",
                "1970-01-01T00:00:02.000Z"
            ]
        );
    }

    #[test]
    fn test_structured_record_empty_history_uses_now() {
        let record = to_structured_record(&[], 86_400_000);
        assert_eq!(record.session_start, "1970-01-02T00:00:00.000Z");
        assert_eq!(record.session_end, record.session_start);
        assert_eq!(record.data_point_count, 0);
        assert!(record.samples.is_empty());
    }

    #[test]
    fn test_structured_record_spans_history() {
        let record = to_structured_record(&[sample(1_000), sample(5_500)], 0);
        assert_eq!(record.session_start, "1970-01-01T00:00:01.000Z");
        assert_eq!(record.session_end, "1970-01-01T00:00:05.500Z");
        assert_eq!(record.data_point_count, 2);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["dataPointCount"], 2);
        assert_eq!(value["samples"][1]["timestamp"], 5_500);
        assert_eq!(value["samples"][0]["emotions"]["happy"], 0.123456789012345);
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }
}
