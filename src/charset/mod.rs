/*!
 * Unicode charset catalog.
 *
 * The catalog partitions every Unicode scalar value by general category,
 * derives the whitespace set used by whitespace normalization, and carries
 * the escape decoding table used by standard unescaping. Building it walks
 * the whole code-point space, so it is done once and either shared through
 * an `Arc` or cached on disk as a snapshot (see `cache`).
 *
 * # Architecture
 *
 * - `escapes`: escape rule table and the even-backslash aware substitution
 * - `cache`: load-or-build with a best-effort JSON snapshot on disk
 */

pub mod cache;
pub mod escapes;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::errors::CatalogError;
use escapes::{CompiledEscapeRule, EscapeRule, default_escape_rules};

pub use cache::{CatalogOrigin, LoadedCatalog, default_cache_path, load_or_build};

/// Snapshot layout version, bumped whenever `CatalogSnapshot` changes shape
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Categories whose union forms the whitespace set, in union order
pub const WHITESPACE_CATEGORIES: [&str; 4] = ["Zl", "Zs", "Zp", "Cc"];

/// Read-only Unicode category, whitespace and escape data
pub struct CharsetCatalog {
    categories: BTreeMap<String, Vec<char>>,
    whitespace: Vec<char>,
    escape_rules: Vec<EscapeRule>,
    compiled_rules: Vec<CompiledEscapeRule>,
    whitespace_run: Regex,
}

/// Serializable form of the catalog.
///
/// Categories are stored as inclusive code-point ranges, which keeps the file
/// small while still describing every member exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub format_version: u32,
    pub categories: BTreeMap<String, Vec<(u32, u32)>>,
    pub whitespace: Vec<char>,
    pub escape_rules: Vec<EscapeRule>,
}

impl CharsetCatalog {
    /// Build the catalog from the Unicode tables compiled into the binary.
    pub fn build() -> Result<Self, CatalogError> {
        let mut by_code: BTreeMap<&'static str, Vec<char>> = BTreeMap::new();
        for c in (0..=char::MAX as u32).filter_map(char::from_u32) {
            by_code.entry(Self::category_of(c)).or_default().push(c);
        }

        let categories: BTreeMap<String, Vec<char>> = by_code
            .into_iter()
            .map(|(code, chars)| (code.to_string(), chars))
            .collect();

        let whitespace = derive_whitespace(&categories)?;
        debug!(
            "Built charset catalog: {} categories, {} whitespace chars",
            categories.len(),
            whitespace.len()
        );

        Self::assemble(categories, whitespace, default_escape_rules())
    }

    /// Rebuild a catalog from a snapshot, validating its content.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, CatalogError> {
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(CatalogError::SnapshotVersion {
                found: snapshot.format_version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }

        let mut categories = BTreeMap::new();
        for (code, ranges) in snapshot.categories {
            let mut chars = Vec::new();
            for (low, high) in ranges {
                if low > high {
                    return Err(CatalogError::InvalidSnapshot(format!(
                        "category '{}' has reversed range {:#X}..={:#X}",
                        code, low, high
                    )));
                }
                for cp in low..=high {
                    let c = char::from_u32(cp).ok_or_else(|| {
                        CatalogError::InvalidSnapshot(format!(
                            "category '{}' contains non-scalar value {:#X}",
                            code, cp
                        ))
                    })?;
                    chars.push(c);
                }
            }
            categories.insert(code, chars);
        }

        let expected_whitespace = derive_whitespace(&categories)?;
        if expected_whitespace != snapshot.whitespace {
            return Err(CatalogError::InvalidSnapshot(
                "whitespace set does not match its categories".to_string(),
            ));
        }
        if snapshot.escape_rules.is_empty() {
            return Err(CatalogError::InvalidSnapshot(
                "escape rule table is empty".to_string(),
            ));
        }

        Self::assemble(categories, snapshot.whitespace, snapshot.escape_rules)
    }

    fn assemble(
        categories: BTreeMap<String, Vec<char>>,
        whitespace: Vec<char>,
        escape_rules: Vec<EscapeRule>,
    ) -> Result<Self, CatalogError> {
        let compiled_rules = escape_rules
            .iter()
            .map(CompiledEscapeRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        let whitespace_run = Regex::new(&char_class_run(&whitespace))?;

        Ok(Self {
            categories,
            whitespace,
            escape_rules,
            compiled_rules,
            whitespace_run,
        })
    }

    /// Convert into the on-disk form.
    pub fn to_snapshot(&self) -> CatalogSnapshot {
        let categories = self
            .categories
            .iter()
            .map(|(code, chars)| (code.clone(), to_ranges(chars)))
            .collect();

        CatalogSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            categories,
            whitespace: self.whitespace.clone(),
            escape_rules: self.escape_rules.clone(),
        }
    }

    /// Code points of one general category, e.g. `"Pi"`
    pub fn category(&self, code: &str) -> Option<&[char]> {
        self.categories.get(code).map(Vec::as_slice)
    }

    /// All categories keyed by their two-letter code
    pub fn categories(&self) -> &BTreeMap<String, Vec<char>> {
        &self.categories
    }

    /// Union of the `Zl`, `Zs`, `Zp` and `Cc` categories
    pub fn whitespace(&self) -> &[char] {
        &self.whitespace
    }

    /// Escape decoding table in application order
    pub fn escape_rules(&self) -> &[EscapeRule] {
        &self.escape_rules
    }

    /// Apply every escape rule in table order, each as a global substitution.
    pub fn decode_escapes(&self, text: &str) -> String {
        let mut decoded = text.to_string();
        for rule in &self.compiled_rules {
            let next = match rule.replace_all(&decoded) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(next) => next,
            };
            decoded = next;
        }
        decoded
    }

    /// Regex matching one maximal run of catalog whitespace
    pub(crate) fn whitespace_run(&self) -> &Regex {
        &self.whitespace_run
    }

    /// Two-letter general category code of `c`
    pub fn category_of(c: char) -> &'static str {
        #[allow(unreachable_patterns)]
        match get_general_category(c) {
            GeneralCategory::UppercaseLetter => "Lu",
            GeneralCategory::LowercaseLetter => "Ll",
            GeneralCategory::TitlecaseLetter => "Lt",
            GeneralCategory::ModifierLetter => "Lm",
            GeneralCategory::OtherLetter => "Lo",
            GeneralCategory::NonspacingMark => "Mn",
            GeneralCategory::SpacingMark => "Mc",
            GeneralCategory::EnclosingMark => "Me",
            GeneralCategory::DecimalNumber => "Nd",
            GeneralCategory::LetterNumber => "Nl",
            GeneralCategory::OtherNumber => "No",
            GeneralCategory::ConnectorPunctuation => "Pc",
            GeneralCategory::DashPunctuation => "Pd",
            GeneralCategory::OpenPunctuation => "Ps",
            GeneralCategory::ClosePunctuation => "Pe",
            GeneralCategory::InitialPunctuation => "Pi",
            GeneralCategory::FinalPunctuation => "Pf",
            GeneralCategory::OtherPunctuation => "Po",
            GeneralCategory::MathSymbol => "Sm",
            GeneralCategory::CurrencySymbol => "Sc",
            GeneralCategory::ModifierSymbol => "Sk",
            GeneralCategory::OtherSymbol => "So",
            GeneralCategory::SpaceSeparator => "Zs",
            GeneralCategory::LineSeparator => "Zl",
            GeneralCategory::ParagraphSeparator => "Zp",
            GeneralCategory::Control => "Cc",
            GeneralCategory::Format => "Cf",
            GeneralCategory::Surrogate => "Cs",
            GeneralCategory::PrivateUse => "Co",
            GeneralCategory::Unassigned => "Cn",
            _ => "Cn",
        }
    }
}

impl PartialEq for CharsetCatalog {
    fn eq(&self, other: &Self) -> bool {
        self.categories == other.categories
            && self.whitespace == other.whitespace
            && self.escape_rules == other.escape_rules
    }
}

impl fmt::Debug for CharsetCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharsetCatalog")
            .field("categories", &self.categories.len())
            .field("whitespace", &self.whitespace.len())
            .field("escape_rules", &self.escape_rules.len())
            .finish()
    }
}

fn derive_whitespace(categories: &BTreeMap<String, Vec<char>>) -> Result<Vec<char>, CatalogError> {
    let mut whitespace = Vec::new();
    for code in WHITESPACE_CATEGORIES {
        match categories.get(code) {
            Some(chars) if !chars.is_empty() => whitespace.extend_from_slice(chars),
            _ => return Err(CatalogError::MissingCategory(code.to_string())),
        }
    }
    Ok(whitespace)
}

/// `[...]+` over the given chars, each written as a `\x{..}` escape
fn char_class_run(chars: &[char]) -> String {
    let mut pattern = String::from("[");
    for c in chars {
        pattern.push_str(&format!(r"\x{{{:X}}}", *c as u32));
    }
    pattern.push_str("]+");
    pattern
}

fn to_ranges(chars: &[char]) -> Vec<(u32, u32)> {
    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for &c in chars {
        let cp = c as u32;
        match ranges.last_mut() {
            Some((_, high)) if *high + 1 == cp => *high = cp,
            _ => ranges.push((cp, cp)),
        }
    }
    ranges
}

#[cfg(test)]
pub(crate) fn shared_test_catalog() -> std::sync::Arc<CharsetCatalog> {
    use once_cell::sync::Lazy;
    use std::sync::Arc;

    static CATALOG: Lazy<Arc<CharsetCatalog>> =
        Lazy::new(|| Arc::new(CharsetCatalog::build().expect("catalog builds")));
    Arc::clone(&CATALOG)
}
