/*!
 * Filters and their composition.
 *
 * A filter either transforms its input or rejects it by returning `None`.
 * Three shapes exist:
 * - `SingleFilter`: works on one side of a unit
 * - `PairedFilter`: works on the whole unit, for checks that compare sides
 * - per-side pairs: one `SingleFilter` for the source, another for the target
 *
 * `compose` chains them into a `Pipeline`; `bounds` holds the rejection
 * filters and `normalize` the rewriting ones, with HTML character reference
 * decoding in `entities`.
 */

pub mod bounds;
pub mod compose;
mod entities;
pub mod normalize;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use bounds::{
    remove_empty, remove_larger, remove_non_text, remove_on_source_target_ratio,
    remove_on_wordcount, remove_smaller,
};
pub use compose::{FilterItem, Pipeline, Verdict, compose_paired, compose_sequential};
pub use normalize::{
    QuoteConvention, normalize_quotation, normalize_quotation_en, normalize_quotation_sv,
    normalize_whitespace, remove_markup, replace, split_quotation_marks, unescape_html,
    unescape_standard,
};

/// One aligned source/target segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextUnit {
    source: String,
    target: String,
}

impl TextUnit {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Split into `(source, target)`
    pub fn into_parts(self) -> (String, String) {
        (self.source, self.target)
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for TextUnit {
    fn from((source, target): (S, T)) -> Self {
        Self::new(source, target)
    }
}

impl From<TextUnit> for (String, String) {
    fn from(unit: TextUnit) -> Self {
        unit.into_parts()
    }
}

/// Filter over one side of a unit
pub type SingleFilter = Arc<dyn Fn(String) -> Option<String> + Send + Sync>;

/// Filter over a whole unit
pub type PairedFilter = Arc<dyn Fn(TextUnit) -> Option<TextUnit> + Send + Sync>;

/// Wrap a closure as a `SingleFilter`
pub fn single_filter<F>(f: F) -> SingleFilter
where
    F: Fn(String) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a `PairedFilter`
pub fn paired_filter<F>(f: F) -> PairedFilter
where
    F: Fn(TextUnit) -> Option<TextUnit> + Send + Sync + 'static,
{
    Arc::new(f)
}
