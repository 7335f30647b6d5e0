/*!
 * Rejection filters.
 *
 * These never rewrite text: they pass their input through untouched or drop
 * it. Lengths are counted in chars and tokens are whitespace separated.
 * Factory parameters are checked when the filter is built, so a filter that
 * exists is always usable.
 */

use std::sync::Arc;

use crate::errors::FilterError;

use super::{PairedFilter, SingleFilter, TextUnit};

/// Reject texts shorter than `min_length` chars
pub fn remove_smaller(min_length: usize) -> Result<SingleFilter, FilterError> {
    if min_length == 0 {
        return Err(FilterError::invalid(
            "remove_smaller: min_length must be at least 1",
        ));
    }

    Ok(Arc::new(move |text: String| {
        if text.chars().count() < min_length {
            return None;
        }
        Some(text)
    }))
}

/// Reject texts longer than `max_length` chars
pub fn remove_larger(max_length: usize) -> Result<SingleFilter, FilterError> {
    if max_length == 0 {
        return Err(FilterError::invalid(
            "remove_larger: max_length must be at least 1",
        ));
    }

    Ok(Arc::new(move |text: String| {
        if text.chars().count() > max_length {
            return None;
        }
        Some(text)
    }))
}

/// Reject empty texts
pub fn remove_empty() -> SingleFilter {
    Arc::new(|text: String| if text.is_empty() { None } else { Some(text) })
}

/// Reject texts that look like URLs, markup or other non-prose content.
///
/// The text is split on whitespace; it is rejected when there are no tokens
/// or when the mean token length (all chars, whitespace included, divided by
/// the token count) falls outside `[min_token_length, max_token_length]`.
/// Good bounds depend on the language; mean plus three standard deviations
/// of the corpus token length is a reasonable upper bound.
pub fn remove_non_text(
    min_token_length: f64,
    max_token_length: f64,
) -> Result<SingleFilter, FilterError> {
    if !min_token_length.is_finite() || !max_token_length.is_finite() {
        return Err(FilterError::invalid(
            "remove_non_text: token length bounds must be finite",
        ));
    }
    if min_token_length < 0.0 || max_token_length <= 0.0 {
        return Err(FilterError::invalid(format!(
            "remove_non_text: bounds must be positive (got {} and {})",
            min_token_length, max_token_length
        )));
    }
    if min_token_length > max_token_length {
        return Err(FilterError::invalid(format!(
            "remove_non_text: min_token_length {} exceeds max_token_length {}",
            min_token_length, max_token_length
        )));
    }

    Ok(Arc::new(move |text: String| {
        let num_tokens = text.split_whitespace().count();
        if num_tokens == 0 {
            return None;
        }

        let avg_token_length = text.chars().count() as f64 / num_tokens as f64;
        if avg_token_length > max_token_length || avg_token_length < min_token_length {
            return None;
        }
        Some(text)
    }))
}

/// Reject texts with fewer than `min_wordcount` or more than `max_wordcount` tokens
pub fn remove_on_wordcount(
    min_wordcount: usize,
    max_wordcount: usize,
) -> Result<SingleFilter, FilterError> {
    if max_wordcount == 0 {
        return Err(FilterError::invalid(
            "remove_on_wordcount: max_wordcount must be at least 1",
        ));
    }
    if min_wordcount > max_wordcount {
        return Err(FilterError::invalid(format!(
            "remove_on_wordcount: min_wordcount {} exceeds max_wordcount {}",
            min_wordcount, max_wordcount
        )));
    }

    Ok(Arc::new(move |text: String| {
        let num_words = text.split_whitespace().count();
        if num_words < min_wordcount || num_words > max_wordcount {
            return None;
        }
        Some(text)
    }))
}

/// Reject units whose source/target or target/source char ratio exceeds `max_ratio`.
///
/// A unit with an empty side has no meaningful ratio and is rejected.
pub fn remove_on_source_target_ratio(max_ratio: f64) -> Result<PairedFilter, FilterError> {
    if !max_ratio.is_finite() || max_ratio < 1.0 {
        return Err(FilterError::invalid(format!(
            "remove_on_source_target_ratio: max_ratio must be a finite value of at least 1 (got {})",
            max_ratio
        )));
    }

    Ok(Arc::new(move |unit: TextUnit| {
        let source_chars = unit.source().chars().count();
        let target_chars = unit.target().chars().count();
        if source_chars == 0 || target_chars == 0 {
            return None;
        }

        let ratio = source_chars as f64 / target_chars as f64;
        if ratio > max_ratio || 1.0 / ratio > max_ratio {
            return None;
        }
        Some(unit)
    }))
}
