/*!
 * Tests for corpus-level cleaning
 */

use tmclean::corpus::split_columns;
use tmclean::filters::{remove_on_source_target_ratio, remove_on_wordcount, unescape_html};
use tmclean::{CleanOptions, Pipeline, TextUnit, clean_units, clean_units_parallel};

use crate::common;

fn pipeline() -> Pipeline {
    Pipeline::new()
        .single("unescape_html", unescape_html())
        .single("wordcount", remove_on_wordcount(2, 6).unwrap())
        .paired("ratio", remove_on_source_target_ratio(2.0).unwrap())
}

#[test]
fn test_cleanUnits_shouldAttributeRejectionsToFirstFailingStage() {
    common::init_logging();
    let units = vec![
        TextUnit::new("fish &amp; chips", "fisk &amp; pommes"),
        TextUnit::new("one", "en"),
        TextUnit::new("a very long source sentence here", "kort"),
        TextUnit::new("good morning", "god morgon"),
    ];

    let cleaned = clean_units(&pipeline(), units, CleanOptions::default());
    let counts: Vec<(&str, usize)> = cleaned
        .stats
        .rejected_by_stage
        .iter()
        .map(|stage| (stage.label.as_str(), stage.count))
        .collect();

    assert_eq!(counts, vec![("unescape_html", 0), ("wordcount", 2), ("ratio", 0)]);
    assert_eq!(
        cleaned.units,
        vec![
            TextUnit::new("fish & chips", "fisk & pommes"),
            TextUnit::new("good morning", "god morgon"),
        ]
    );
    assert_eq!(cleaned.stats.accepted + cleaned.stats.rejected(), cleaned.stats.total);
}

#[test]
fn test_cleanUnits_withDuplicatesAfterNormalization_shouldCountThem() {
    let units = vec![
        TextUnit::new("salt &amp; pepper", "salt &amp; peppar"),
        TextUnit::new("salt & pepper", "salt & peppar"),
    ];

    let cleaned = clean_units(&pipeline(), units, CleanOptions::default());
    assert_eq!(cleaned.units.len(), 1);
    assert_eq!(cleaned.stats.duplicates, 1);
    assert_eq!(cleaned.stats.acceptance_rate(), 50.0);
}

#[test]
fn test_cleanUnitsParallel_shouldMatchSequentialEvaluation() {
    let pipeline = pipeline();
    let units: Vec<TextUnit> = (0..500)
        .map(|i| {
            let words = "word ".repeat(i % 9);
            TextUnit::new(format!("{}{}", words, i), format!("{}&amp;", "ord ".repeat(i % 5)))
        })
        .collect();

    let sequential: Vec<Option<TextUnit>> =
        units.iter().cloned().map(|unit| pipeline.apply(unit)).collect();
    let parallel = clean_units_parallel(&pipeline, units);

    assert_eq!(parallel, sequential);
}

#[test]
fn test_cleanedCorpus_intoColumns_shouldSplitAcceptedUnits() {
    let units = vec![TextUnit::new("good morning", "god morgon")];
    let (sources, targets) = clean_units(&pipeline(), units, CleanOptions::default()).into_columns();

    assert_eq!(sources, vec!["good morning".to_string()]);
    assert_eq!(targets, vec!["god morgon".to_string()]);
    assert_eq!(split_columns(Vec::new()), (Vec::new(), Vec::new()));
}
