/*!
 * Tests for the individual filter factories
 */

use rand::Rng;

use tmclean::SingleFilter;
use tmclean::filters::{
    QuoteConvention, normalize_quotation, normalize_whitespace, remove_empty, remove_larger,
    remove_markup, remove_non_text, remove_on_source_target_ratio, remove_on_wordcount,
    remove_smaller, replace, split_quotation_marks, unescape_html, unescape_standard,
};
use tmclean::{FilterError, TextUnit};

use crate::common;

fn run(filter: &SingleFilter, text: &str) -> Option<String> {
    filter(text.to_string())
}

/// Random text mixing letters with assorted Unicode whitespace
fn random_spaced_text(rng: &mut impl Rng, pool: &[char]) -> String {
    let length = rng.random_range(0..40);
    (0..length)
        .map(|_| {
            if rng.random_bool(0.4) {
                pool[rng.random_range(0..pool.len())]
            } else {
                char::from(b'a' + rng.random_range(0..26u8))
            }
        })
        .collect()
}

#[test]
fn test_normalizeWhitespace_withRandomText_shouldBeIdempotent() {
    let catalog = common::catalog();
    let filter = normalize_whitespace(&catalog);
    let pool = catalog.whitespace().to_vec();
    let mut rng = rand::rng();

    for _ in 0..200 {
        let text = random_spaced_text(&mut rng, &pool);
        let once = run(&filter, &text).unwrap();
        let twice = run(&filter, &once).unwrap();
        assert_eq!(once, twice, "input {:?}", text);
        assert!(!once.contains("  "));
        assert!(once.chars().all(|c| c == ' ' || !pool.contains(&c)));
    }
}

#[test]
fn test_unescapeStandard_withDocumentedExamples_shouldDecode() {
    let filter = unescape_standard(&common::catalog());
    assert_eq!(run(&filter, r"a\tb"), Some("a\tb".to_string()));
    assert_eq!(run(&filter, r"a\\nb"), Some(r"a\nb".to_string()));
}

#[test]
fn test_unescapeHtml_withUnknownEntity_shouldKeepIt() {
    let filter = unescape_html();
    assert_eq!(run(&filter, "a &bogus; b"), Some("a &bogus; b".to_string()));
    assert_eq!(run(&filter, "&amp;amp;"), Some("&amp;".to_string()));
}

#[test]
fn test_normalizeQuotation_everyInitialAndFinalMark_shouldMapToConventionGlyph() {
    let catalog = common::catalog();
    let (single, other) = split_quotation_marks(&catalog);
    assert!(!single.is_empty() && !other.is_empty());

    for convention in [QuoteConvention::English, QuoteConvention::Swedish] {
        let filter = normalize_quotation(&catalog, convention).unwrap();
        let all: String = single.iter().chain(other.iter()).collect();
        let expected: String = single
            .iter()
            .map(|_| convention.single_glyph())
            .chain(other.iter().map(|_| convention.double_glyph()))
            .collect();
        assert_eq!(run(&filter, &all), Some(expected));
    }
}

#[test]
fn test_replace_withStringChars_shouldReplaceEach() {
    let filter = replace("–—".chars(), '-').unwrap();
    assert_eq!(run(&filter, "a–b—c"), Some("a-b-c".to_string()));
}

#[test]
fn test_removeMarkup_withNestedTags_shouldKeepText() {
    let filter = remove_markup();
    assert_eq!(
        run(&filter, "<p>Click <a href=\"/x\">here</a></p>"),
        Some("Click here".to_string())
    );
}

#[test]
fn test_boundFilters_shouldPassTextUnchanged() {
    let filters = [
        remove_smaller(2).unwrap(),
        remove_larger(50).unwrap(),
        remove_empty(),
        remove_non_text(1.0, 30.0).unwrap(),
        remove_on_wordcount(1, 10).unwrap(),
    ];
    for filter in &filters {
        assert_eq!(run(filter, "Same  text"), Some("Same  text".to_string()));
    }
}

#[test]
fn test_filterFactories_withInvalidParameters_shouldReturnInvalidConfig() {
    assert!(matches!(remove_smaller(0), Err(FilterError::InvalidConfig(_))));
    assert!(matches!(remove_larger(0), Err(FilterError::InvalidConfig(_))));
    assert!(matches!(remove_non_text(3.0, 1.0), Err(FilterError::InvalidConfig(_))));
    assert!(matches!(remove_on_wordcount(5, 2), Err(FilterError::InvalidConfig(_))));
    assert!(matches!(
        remove_on_source_target_ratio(f64::NAN),
        Err(FilterError::InvalidConfig(_))
    ));
    assert!(matches!(replace(std::iter::empty(), 'x'), Err(FilterError::InvalidConfig(_))));
}

#[test]
fn test_removeOnSourceTargetRatio_withDocumentedLengths_shouldMatch() {
    let filter = remove_on_source_target_ratio(2.0).unwrap();
    let unit = |source: usize, target: usize| TextUnit::new("s".repeat(source), "t".repeat(target));

    assert_eq!(filter(unit(10, 2)), None);
    assert!(filter(unit(10, 6)).is_some());
    assert!(filter(unit(6, 10)).is_some());
    assert_eq!(filter(unit(2, 10)), None);
}
