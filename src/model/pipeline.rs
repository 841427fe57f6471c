use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::{
    database::{reference_index::ReferenceIndex, store::ReferenceStore},
    model::{
        enricher::{enrich_all, RecordFailure, SkippedRecord},
        selector::SelectionLimits,
        structures::{
            processing_mode::ProcessingMode,
            records::{RatingTotals, RawRecord, SelectionResult}
        }
    }
};

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Input is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Input must be a JSON array of records, found {found}")]
    NotAnArray { found: &'static str },

    #[error("Element {index} is not an achievement record: {source}")]
    MalformedRecord { index: usize, source: serde_json::Error },

    #[error("Reference song database is not loaded yet, try again shortly")]
    ReferenceUnavailable,

    #[error("Record {} has an invalid sheet id: {}", .0.index, .0.error)]
    InvalidRecord(RecordFailure)
}

impl SubmissionError {
    /// True for errors caused by the shape of the submitted payload.
    pub fn is_input_shape(&self) -> bool {
        matches!(
            self,
            SubmissionError::InvalidJson(_) | SubmissionError::NotAnArray { .. } | SubmissionError::MalformedRecord { .. }
        )
    }
}

/// Everything produced for one submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingReport {
    #[serde(flatten)]
    pub selection: SelectionResult,
    pub totals: RatingTotals,
    /// Records left out in lenient mode
    pub skipped: Vec<SkippedRecord>,
    pub generated_at: DateTime<Utc>
}

/// Decodes an uploaded payload into raw records.
///
/// The payload is accepted or rejected as a whole: it must be a JSON array,
/// and every element must have the record shape.
pub fn parse_submission(payload: &[u8]) -> Result<Vec<RawRecord>, SubmissionError> {
    let value: Value = serde_json::from_slice(payload).map_err(SubmissionError::InvalidJson)?;

    let Value::Array(elements) = value else {
        return Err(SubmissionError::NotAnArray {
            found: json_type_name(&value)
        });
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            serde_json::from_value(element).map_err(|source| SubmissionError::MalformedRecord { index, source })
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object"
    }
}

/// Runs the scoring pipeline: enrich every record, then select the top lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingProcessor {
    pub limits: SelectionLimits,
    pub mode: ProcessingMode
}

impl RatingProcessor {
    pub fn new(limits: SelectionLimits, mode: ProcessingMode) -> RatingProcessor {
        RatingProcessor { limits, mode }
    }

    pub fn process(&self, records: &[RawRecord], index: &ReferenceIndex) -> Result<RatingReport, SubmissionError> {
        let outcome = enrich_all(records, index, self.mode).map_err(SubmissionError::InvalidRecord)?;
        let selection = self.limits.select(outcome.records);
        let totals = selection.totals();

        info!(
            "Selected {} recent and {} older records, total rating {}",
            selection.recent_list.len(),
            selection.older_list.len(),
            totals.total
        );

        Ok(RatingReport {
            selection,
            totals,
            skipped: outcome.skipped,
            generated_at: Utc::now()
        })
    }

    /// Validates the payload and the reference state before any record is
    /// enriched, so a rejected submission yields no partial result.
    pub fn process_submission(
        &self,
        payload: &[u8],
        store: &ReferenceStore
    ) -> Result<RatingReport, SubmissionError> {
        let records = parse_submission(payload)?;
        let index = store.index().ok_or(SubmissionError::ReferenceUnavailable)?;

        info!("Processing submission of {} records", records.len());
        self.process(&records, &index)
    }
}
