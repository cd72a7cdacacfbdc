use std::path::PathBuf;

use chrono::{TimeZone, Utc};

use crate::export::domain::artifact_writer::ArtifactWriter;
use crate::export::domain::export_error::ExportError;
use crate::export::export_formatter::{to_structured_record, to_tabular_record};
use crate::recording::domain::emotion_sample::EmotionSample;
use crate::shared::constants::EXPORT_FILE_STEM;

/// Where one export action put its two files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifacts {
    pub structured: PathBuf,
    pub tabular: PathBuf,
}

/// Export action: structured JSON plus tabular CSV, both named after the
/// moment of export.
pub struct ExportSessionUseCase {
    writer: Box<dyn ArtifactWriter>,
}

impl ExportSessionUseCase {
    pub fn new(writer: Box<dyn ArtifactWriter>) -> Self {
        Self { writer }
    }

    pub fn execute(
        &self,
        history: &[EmotionSample],
        now_millis: i64,
    ) -> Result<ExportArtifacts, ExportError> {
        let stem = format!("{EXPORT_FILE_STEM}-{}", file_stamp(now_millis));

        let record = to_structured_record(history, now_millis);
        let json = serde_json::to_vec_pretty(&record)?;
        let structured = self.writer.write(&format!("{stem}.json"), &json)?;

        let csv = to_tabular_record(history);
        let tabular = self.writer.write(&format!("{stem}.csv"), csv.as_bytes())?;

        log::info!(
            "Exported {} samples to {} and {}",
            history.len(),
            structured.display(),
            tabular.display()
        );
        Ok(ExportArtifacts { structured, tabular })
    }
}

fn file_stamp(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y%m%d_%H%M%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}
