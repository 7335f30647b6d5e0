/*!
 * Rewriting filters.
 *
 * These clean up text without rejecting it: entity and escape decoding,
 * whitespace collapsing, character substitution, quotation mark
 * normalization and markup stripping. Filters that depend on Unicode
 * categories take the shared `CharsetCatalog`.
 */

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::charset::CharsetCatalog;
use crate::errors::FilterError;

use super::entities::decode_character_references;
use super::{SingleFilter, compose_sequential};

/// Anything tag shaped: `<b>`, `</p>`, `<br/>`, `<!-- note -->`, `<a href="x">`
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^<>()\s][^<>()]*>").expect("markup pattern is valid")
});

/// Decode HTML/XML character references (`&amp;`, `&#233;`, `&#xE9;`, `&copy`, ...)
pub fn unescape_html() -> SingleFilter {
    Arc::new(|text: String| match decode_character_references(&text) {
        Cow::Borrowed(_) => Some(text),
        Cow::Owned(decoded) => Some(decoded),
    })
}

/// Decode C-style backslash escapes using the catalog's escape table
pub fn unescape_standard(catalog: &Arc<CharsetCatalog>) -> SingleFilter {
    let catalog = Arc::clone(catalog);
    Arc::new(move |text: String| Some(catalog.decode_escapes(&text)))
}

/// Collapse every run of catalog whitespace into a single ASCII space
pub fn normalize_whitespace(catalog: &Arc<CharsetCatalog>) -> SingleFilter {
    let catalog = Arc::clone(catalog);
    Arc::new(move |text: String| {
        Some(catalog.whitespace_run().replace_all(&text, " ").into_owned())
    })
}

/// Replace every char of `chars` with `replacement`
pub fn replace<I>(chars: I, replacement: char) -> Result<SingleFilter, FilterError>
where
    I: IntoIterator<Item = char>,
{
    let chars: HashSet<char> = chars.into_iter().collect();
    if chars.is_empty() {
        return Err(FilterError::invalid("replace: input set is empty"));
    }

    Ok(Arc::new(move |text: String| {
        if !text.chars().any(|c| chars.contains(&c)) {
            return Some(text);
        }
        Some(
            text.chars()
                .map(|c| if chars.contains(&c) { replacement } else { c })
                .collect(),
        )
    }))
}

/// Canonical quotation glyphs of a target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteConvention {
    /// APOSTROPHE and QUOTATION MARK
    English,
    /// RIGHT SINGLE and RIGHT DOUBLE QUOTATION MARK
    Swedish,
}

impl QuoteConvention {
    pub fn single_glyph(self) -> char {
        match self {
            Self::English => '\'',
            Self::Swedish => '\u{2019}',
        }
    }

    pub fn double_glyph(self) -> char {
        match self {
            Self::English => '"',
            Self::Swedish => '\u{201D}',
        }
    }
}

/// Split initial and final punctuation into single-quote-like marks and the rest.
///
/// A mark is single-quote-like when its Unicode name contains `SINGLE`.
pub fn split_quotation_marks(catalog: &CharsetCatalog) -> (Vec<char>, Vec<char>) {
    let initial = catalog.category("Pi").unwrap_or_default();
    let final_marks = catalog.category("Pf").unwrap_or_default();

    initial.iter().chain(final_marks.iter()).copied().partition(|&c| {
        unicode_names2::name(c).is_some_and(|name| name.to_string().contains("SINGLE"))
    })
}

/// Map all quotation marks onto the glyphs of `convention`
pub fn normalize_quotation(
    catalog: &CharsetCatalog,
    convention: QuoteConvention,
) -> Result<SingleFilter, FilterError> {
    let (single_quotes, other_quotes) = split_quotation_marks(catalog);
    if single_quotes.is_empty() || other_quotes.is_empty() {
        return Err(FilterError::invalid(
            "normalize_quotation: catalog has no initial/final quotation marks",
        ));
    }

    Ok(compose_sequential(vec![
        replace(single_quotes, convention.single_glyph())?,
        replace(other_quotes, convention.double_glyph())?,
    ]))
}

pub fn normalize_quotation_en(catalog: &CharsetCatalog) -> Result<SingleFilter, FilterError> {
    normalize_quotation(catalog, QuoteConvention::English)
}

pub fn normalize_quotation_sv(catalog: &CharsetCatalog) -> Result<SingleFilter, FilterError> {
    normalize_quotation(catalog, QuoteConvention::Swedish)
}

/// Strip inline HTML/XML markup
pub fn remove_markup() -> SingleFilter {
    Arc::new(|text: String| Some(MARKUP_REGEX.replace_all(&text, "").into_owned()))
}
