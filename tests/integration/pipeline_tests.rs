use dx_rating_processor::{
    database::{client::parse_reference_table, reference_index::ReferenceIndex, store::ReferenceStore},
    model::{
        pipeline::{RatingProcessor, SubmissionError},
        selector::{compare_records, SelectionLimits},
        structures::processing_mode::ProcessingMode
    },
    utils::test_utils::{generate_random_raw_records, generate_random_reference_table, generate_reference_index}
};
use std::cmp::Ordering;

use crate::common::init_test_env;

#[test]
fn test_reference_scenario_end_to_end() {
    init_test_env();
    let table = parse_reference_table(
        br#"[
            {"title": "Foo", "version": "25500", "image_url": "foo.png", "dx_lev_mas": "13.5", "lev_mas": "12+"},
            {"title": "Old Song", "version": 19000, "lev_exp": "12", "lev_exp_i": "12.7"}
        ]"#
    )
    .unwrap();
    let store = ReferenceStore::new();
    store.install_entries(&table);

    let report = RatingProcessor::default()
        .process_submission(
            br#"[
                {"sheetId": "Foo__x__dx__y__master", "achievementRate": 99.2},
                {"sheetId": "Old Song__x__std__y__expert", "achievementRate": 97.0}
            ]"#,
            &store
        )
        .unwrap();

    assert_eq!(report.selection.recent_list.len(), 1);
    assert_eq!(report.selection.recent_list[0].song_name(), "Foo");
    assert_eq!(report.selection.recent_list[0].rating(), 278);

    // 12.7 * 97.0 * 0.2
    assert_eq!(report.selection.older_list[0].rating(), 246);
    assert_eq!(report.totals.total, 278 + 246);
}

#[test]
fn test_unknown_song_scores_zero() {
    init_test_env();
    let store = ReferenceStore::with_index(generate_reference_index());
    let report = RatingProcessor::default()
        .process_submission(br#"[{"sheetId": "Nope__x__dx__y__master", "achievementRate": 100.5}]"#, &store)
        .unwrap();

    let record = &report.selection.older_list[0];
    assert_eq!(record.level(), 0.0);
    assert_eq!(record.version(), 0);
    assert_eq!(record.rating(), 0);
}

#[test]
fn test_random_batch_invariants() {
    init_test_env();
    let songs = 300;
    let index = ReferenceIndex::build(&generate_random_reference_table(songs, 7));
    let records = generate_random_raw_records(2_000, songs, 11);
    let limits = SelectionLimits::default();

    let report = RatingProcessor::new(limits, ProcessingMode::Lenient)
        .process(&records, &index)
        .unwrap();
    let selection = &report.selection;

    assert!(selection.recent_list.len() <= limits.recent_capacity);
    assert!(selection.older_list.len() <= limits.older_capacity);
    assert!(!report.skipped.is_empty());

    assert!(selection
        .recent_list
        .iter()
        .all(|r| r.version() >= limits.version_threshold));
    assert!(selection
        .older_list
        .iter()
        .all(|r| r.version() < limits.version_threshold));

    for list in [&selection.recent_list, &selection.older_list] {
        assert!(list
            .windows(2)
            .all(|pair| compare_records(&pair[0], &pair[1]) != Ordering::Greater));
    }

    let recent: u32 = selection.recent_list.iter().map(|r| r.rating()).sum();
    let older: u32 = selection.older_list.iter().map(|r| r.rating()).sum();
    assert_eq!(report.totals.recent, recent);
    assert_eq!(report.totals.older, older);
    assert_eq!(report.totals.total, recent + older);
}

#[test]
fn test_random_batch_strict_mode_fails_on_first_bad_record() {
    init_test_env();
    let songs = 50;
    let index = ReferenceIndex::build(&generate_random_reference_table(songs, 3));
    let records = generate_random_raw_records(1_000, songs, 5);
    let first_bad = records
        .iter()
        .position(|r| r.sheet_id.split("__").count() != 5)
        .expect("generator produces malformed ids");

    let err = RatingProcessor::new(SelectionLimits::default(), ProcessingMode::Strict)
        .process(&records, &index)
        .unwrap_err();

    match err {
        SubmissionError::InvalidRecord(failure) => assert_eq!(failure.index, first_bad),
        other => panic!("Unexpected error: {other}")
    }
}

#[test]
fn test_lenient_and_strict_agree_on_clean_batches() {
    init_test_env();
    let songs = 40;
    let index = ReferenceIndex::build(&generate_random_reference_table(songs, 21));
    let records: Vec<_> = generate_random_raw_records(500, songs, 22)
        .into_iter()
        .filter(|r| r.sheet_id.split("__").count() == 5)
        .collect();

    let lenient = RatingProcessor::new(SelectionLimits::default(), ProcessingMode::Lenient)
        .process(&records, &index)
        .unwrap();
    let strict = RatingProcessor::new(SelectionLimits::default(), ProcessingMode::Strict)
        .process(&records, &index)
        .unwrap();

    assert_eq!(lenient.selection, strict.selection);
    assert!(lenient.skipped.is_empty());
}
