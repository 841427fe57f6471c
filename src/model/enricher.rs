use serde::Serialize;
use tracing::{debug, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::{
    database::reference_index::ReferenceIndex,
    model::{
        identifier::{parse_sheet_id, IdentifierError},
        structures::{
            processing_mode::ProcessingMode,
            records::{EnrichedRecord, RawRecord}
        }
    },
    utils::progress_utils::progress_span
};

/// A record that was left out of a lenient batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRecord {
    /// Position in the submitted array
    pub index: usize,
    pub sheet_id: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: IdentifierError
}

/// A record that failed a strict batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    pub index: usize,
    pub error: IdentifierError
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentOutcome {
    /// Enriched records, in submission order
    pub records: Vec<EnrichedRecord>,
    pub skipped: Vec<SkippedRecord>
}

/// Parses the sheet id, looks the chart up and scores it.
///
/// A chart missing from the reference table is not an error: it keeps level
/// `0` and version `0` and therefore scores `0`.
pub fn enrich(raw: &RawRecord, index: &ReferenceIndex) -> Result<EnrichedRecord, IdentifierError> {
    let sheet = parse_sheet_id(&raw.sheet_id)?;

    let level = index.level(&sheet.song_name, sheet.chart_type, sheet.difficulty);
    let version = index.version(&sheet.song_name);

    Ok(EnrichedRecord::new(
        sheet.song_name,
        sheet.chart_type,
        sheet.difficulty,
        raw.achievement_rate,
        level,
        version
    ))
}

/// Enriches a whole submission.
///
/// In [`ProcessingMode::Strict`] the first bad sheet id aborts the batch. In
/// [`ProcessingMode::Lenient`] bad records are collected and the rest of the
/// batch is still scored.
pub fn enrich_all(
    records: &[RawRecord],
    index: &ReferenceIndex,
    mode: ProcessingMode
) -> Result<EnrichmentOutcome, RecordFailure> {
    let span = progress_span(records.len() as u64, "Enriching records");
    let _guard = span.enter();

    let mut outcome = EnrichmentOutcome {
        records: Vec::with_capacity(records.len()),
        skipped: Vec::new()
    };

    for (i, raw) in records.iter().enumerate() {
        match enrich(raw, index) {
            Ok(record) => outcome.records.push(record),
            Err(error) => match mode {
                ProcessingMode::Strict => {
                    warn!("Rejecting batch: record {} is invalid: {}", i, error);
                    return Err(RecordFailure { index: i, error });
                }
                ProcessingMode::Lenient => {
                    warn!("Skipping record {}: {}", i, error);
                    outcome.skipped.push(SkippedRecord {
                        index: i,
                        sheet_id: raw.sheet_id.clone(),
                        error
                    });
                }
            }
        }

        span.pb_inc(1);
    }

    let unmatched = outcome.records.iter().filter(|r| r.level() == 0.0).count();
    debug!(
        "Enriched {} records ({} skipped, {} without a reference level)",
        outcome.records.len(),
        outcome.skipped.len(),
        unmatched
    );

    Ok(outcome)
}

fn serialize_error<S>(error: &IdentifierError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer
{
    serializer.collect_str(error)
}

#[cfg(test)]
mod tests {
    use crate::{
        database::reference_index::ReferenceIndex,
        model::{
            enricher::{enrich, enrich_all, RecordFailure},
            identifier::IdentifierError,
            structures::{
                chart_type::ChartType, difficulty::Difficulty, processing_mode::ProcessingMode, records::RawRecord
            }
        },
        utils::test_utils::{generate_reference_entry, generate_reference_index}
    };
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_enrich_reference_scenario() {
        let index = generate_reference_index();
        let record = enrich(&RawRecord::new("Foo__x__dx__y__master", 99.2), &index).unwrap();

        assert_eq!(record.song_name(), "Foo");
        assert_eq!(record.chart_type(), ChartType::Dx);
        assert_eq!(record.difficulty(), Difficulty::Master);
        assert_abs_diff_eq!(record.achievement(), 99.2);
        assert_abs_diff_eq!(record.level(), 13.5);
        assert_eq!(record.version(), 25500);
        assert_eq!(record.rating(), 278);
    }

    #[test]
    fn test_enrich_unknown_song_scores_zero() {
        let index = ReferenceIndex::build(&[generate_reference_entry("Foo", 25500, &[("dx_lev_mas", "13.5")])]);
        let record = enrich(&RawRecord::new("Unknown__x__dx__y__master", 100.5), &index).unwrap();

        assert_eq!(record.level(), 0.0);
        assert_eq!(record.version(), 0);
        assert_eq!(record.rating(), 0);
    }

    #[test]
    fn test_enrich_propagates_parse_errors() {
        let index = generate_reference_index();

        assert!(matches!(
            enrich(&RawRecord::new("a__b__c", 99.0), &index),
            Err(IdentifierError::Format { .. })
        ));
        assert!(matches!(
            enrich(&RawRecord::new("a__b__std__c__legendary", 99.0), &index),
            Err(IdentifierError::UnknownDifficulty { .. })
        ));
    }

    #[test]
    fn test_enrich_all_lenient_skips_bad_records() {
        let index = generate_reference_index();
        let records = vec![
            RawRecord::new("Foo__x__dx__y__master", 99.2),
            RawRecord::new("broken", 99.0),
            RawRecord::new("Bar__x__std__y__expert", 100.1),
            RawRecord::new("Baz__x__std__y__legendary", 98.0),
        ];

        let outcome = enrich_all(&records, &index, ProcessingMode::Lenient).unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].song_name(), "Foo");
        assert_eq!(outcome.records[1].song_name(), "Bar");
        assert_eq!(outcome.skipped.len(), 2);
        assert_eq!(outcome.skipped[0].index, 1);
        assert_eq!(outcome.skipped[0].sheet_id, "broken");
        assert_eq!(outcome.skipped[1].index, 3);
    }

    #[test]
    fn test_enrich_all_strict_fails_on_first_bad_record() {
        let index = generate_reference_index();
        let records = vec![
            RawRecord::new("Foo__x__dx__y__master", 99.2),
            RawRecord::new("a__b__std__c__legendary", 99.0),
            RawRecord::new("broken", 99.0),
        ];

        let failure = enrich_all(&records, &index, ProcessingMode::Strict).unwrap_err();

        assert_eq!(
            failure,
            RecordFailure {
                index: 1,
                error: IdentifierError::UnknownDifficulty {
                    sheet_id: "a__b__std__c__legendary".to_string(),
                    difficulty: "legendary".to_string()
                }
            }
        );
    }

    #[test]
    fn test_enrich_all_empty() {
        let outcome = enrich_all(&[], &generate_reference_index(), ProcessingMode::Strict).unwrap();

        assert!(outcome.records.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_skipped_record_serializes_error_message() {
        let index = generate_reference_index();
        let outcome = enrich_all(&[RawRecord::new("broken", 1.0)], &index, ProcessingMode::Lenient).unwrap();
        let value = serde_json::to_value(&outcome.skipped[0]).unwrap();

        assert_eq!(value["index"], 0);
        assert_eq!(value["sheetId"], "broken");
        assert!(value["error"].as_str().unwrap().contains("Invalid sheet id format"));
    }
}
