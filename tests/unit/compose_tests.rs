/*!
 * Tests for filter composition and pipelines
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tmclean::filters::{paired_filter, single_filter};
use tmclean::{
    FilterItem, Pipeline, SingleFilter, TextUnit, Verdict, compose_paired, compose_sequential,
};

fn counting(calls: &Arc<AtomicUsize>) -> SingleFilter {
    let calls = Arc::clone(calls);
    single_filter(move |text| {
        calls.fetch_add(1, Ordering::SeqCst);
        Some(text)
    })
}

#[test]
fn test_composeSequential_withEmptyList_shouldReturnInput() {
    let identity = compose_sequential(Vec::new());
    for text in ["", "word", "  spaced  ", "åäö"] {
        assert_eq!(identity(text.to_string()), Some(text.to_string()));
    }
}

#[test]
fn test_composeSequential_withRejectingFirst_shouldNotInvokeSecond() {
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = compose_sequential(vec![single_filter(|_| None), counting(&calls)]);

    assert_eq!(chain("anything".to_string()), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_composeSequential_isNestable() {
    let inner = compose_sequential(vec![
        single_filter(|t| Some(t.replace('a', "b"))),
        single_filter(|t| Some(t.replace('b', "c"))),
    ]);
    let outer = compose_sequential(vec![inner, single_filter(|t| Some(t.to_uppercase()))]);
    assert_eq!(outer("aab".to_string()), Some("CCC".to_string()));
}

#[test]
fn test_composePaired_withSingleItem_shouldRunOnSourceThenTarget() {
    let calls = Arc::new(AtomicUsize::new(0));
    let filter = compose_paired(vec![FilterItem::single(counting(&calls))]);

    let unit = TextUnit::new("s", "t");
    assert_eq!(filter(unit.clone()), Some(unit));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_composePaired_withSourceRejection_shouldSkipTarget() {
    let calls = Arc::new(AtomicUsize::new(0));
    let filter = compose_paired(vec![FilterItem::per_side(
        single_filter(|_| None),
        counting(&calls),
    )]);

    assert_eq!(filter(TextUnit::new("s", "t")), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_composePaired_withMixedShapes_shouldNeverSwapSides() {
    let filter = compose_paired(vec![
        FilterItem::single(single_filter(|t| Some(t.trim().to_string()))),
        FilterItem::per_side(
            single_filter(|t| Some(format!("src:{}", t))),
            single_filter(|t| Some(format!("tgt:{}", t))),
        ),
        FilterItem::paired(paired_filter(|unit| {
            let (source, target) = unit.into_parts();
            Some(TextUnit::new(source.to_uppercase(), target))
        })),
    ]);

    assert_eq!(
        filter(TextUnit::new(" left ", " right ")),
        Some(TextUnit::new("SRC:LEFT", "tgt:right"))
    );
}

#[test]
fn test_pipeline_evaluate_shouldAcceptWhenAllStagesPass() {
    let pipeline = Pipeline::new()
        .single("identity", single_filter(Some))
        .paired("identity pair", paired_filter(Some));

    assert_eq!(
        pipeline.evaluate(TextUnit::new("a", "b")),
        Verdict::Accepted(TextUnit::new("a", "b"))
    );
    assert_eq!(pipeline.len(), 2);
    assert!(!pipeline.is_empty());
}

#[test]
fn test_pipeline_push_shouldChainLabels() {
    let mut pipeline = Pipeline::new();
    pipeline
        .push("first", FilterItem::single(single_filter(Some)))
        .push("second", FilterItem::paired(paired_filter(Some)));

    assert_eq!(pipeline.labels().collect::<Vec<_>>(), vec!["first", "second"]);
    assert_eq!(pipeline.label(2), None);
}

#[test]
fn test_pipeline_intoFilter_shouldBehaveLikeApply() {
    let pipeline = Pipeline::new().per_side(
        "tag",
        single_filter(|t| Some(format!("[{}]", t))),
        single_filter(|t| if t.is_empty() { None } else { Some(t) }),
    );
    let cloned = pipeline.clone();
    let filter = pipeline.into_filter();

    for unit in [TextUnit::new("a", "b"), TextUnit::new("a", "")] {
        assert_eq!(filter(unit.clone()), cloned.apply(unit));
    }
}

#[test]
fn test_filterItem_debug_shouldShowShape() {
    let item = FilterItem::paired(paired_filter(Some));
    assert_eq!(format!("{:?}", item), "FilterItem::paired");
    assert_eq!(item.shape(), "paired");
}
