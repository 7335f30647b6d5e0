/*!
 * Backslash escape decoding rules.
 *
 * Every lettered or numeric rule starts with a `pairs` group that swallows an
 * even run of backslashes, and a match is only honoured when it is not
 * preceded by another unconsumed backslash. Together these make sure that
 * `\\n` stays a literal backslash followed by `n` while `\n` and `\\\n`
 * decode to a newline.
 */

use std::borrow::Cow;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;

/// Even run of backslashes in front of an escape token
const EVEN_BACKSLASHES: &str = r"(?P<pairs>(?:\\\\)*)";

/// How a matched escape is turned back into text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EscapeReplacement {
    /// Fixed replacement text
    Literal(String),
    /// The `code` group holds a hexadecimal code point
    HexCodePoint,
    /// The `code` group holds an octal code point
    OctalCodePoint,
}

/// One entry of the escape decoding table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscapeRule {
    name: String,
    pattern: String,
    replacement: EscapeReplacement,
}

impl EscapeRule {
    fn new(name: &str, pattern: String, replacement: EscapeReplacement) -> Self {
        Self {
            name: name.to_string(),
            pattern,
            replacement,
        }
    }

    fn lettered(name: &str, token: &str, literal: &str) -> Self {
        Self::new(
            name,
            format!(r"{}\\{}", EVEN_BACKSLASHES, token),
            EscapeReplacement::Literal(literal.to_string()),
        )
    }

    fn numeric(name: &str, token: &str, replacement: EscapeReplacement) -> Self {
        Self::new(name, format!(r"{}\\{}", EVEN_BACKSLASHES, token), replacement)
    }

    /// Short identifier of the rule
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Regular expression source of the rule
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replacement(&self) -> &EscapeReplacement {
        &self.replacement
    }
}

/// The escape table in application order.
///
/// Longer numeric forms come before shorter ones so that `\U0001f600` is
/// never read as `\U` followed by stray digits, and the backslash collapse
/// runs last so earlier rules still see escaped backslashes as pairs.
pub fn default_escape_rules() -> Vec<EscapeRule> {
    vec![
        EscapeRule::lettered("single_quote", "'", "'"),
        EscapeRule::lettered("double_quote", "\"", "\""),
        EscapeRule::lettered("bell", "a", "\u{07}"),
        EscapeRule::lettered("backspace", "b", "\u{08}"),
        EscapeRule::lettered("form_feed", "f", "\u{0C}"),
        EscapeRule::lettered("line_feed", "n", "\n"),
        EscapeRule::lettered("carriage_return", "r", "\r"),
        EscapeRule::lettered("tab", "t", "\t"),
        EscapeRule::lettered("vertical_tab", "v", "\u{0B}"),
        EscapeRule::numeric(
            "unicode_short",
            "u(?P<code>[0-9a-f]{4})",
            EscapeReplacement::HexCodePoint,
        ),
        EscapeRule::numeric(
            "unicode_long",
            "U(?P<code>[0-9a-f]{8})",
            EscapeReplacement::HexCodePoint,
        ),
        EscapeRule::numeric(
            "octal",
            "(?P<code>[0-7]{3})",
            EscapeReplacement::OctalCodePoint,
        ),
        EscapeRule::numeric(
            "hex_byte",
            "(?P<code>[0-9a-f]{2})",
            EscapeReplacement::HexCodePoint,
        ),
        EscapeRule::new(
            "backslash",
            r"\\\\".to_string(),
            EscapeReplacement::Literal("\\".to_string()),
        ),
    ]
}

/// An escape rule with its pattern compiled
#[derive(Debug, Clone)]
pub(crate) struct CompiledEscapeRule {
    regex: Regex,
    replacement: EscapeReplacement,
}

impl CompiledEscapeRule {
    pub(crate) fn compile(rule: &EscapeRule) -> Result<Self, CatalogError> {
        Ok(Self {
            regex: Regex::new(&rule.pattern)?,
            replacement: rule.replacement.clone(),
        })
    }

    /// Substitute every honoured match in `text`, left to right.
    pub(crate) fn replace_all<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let bytes = text.as_bytes();
        let mut output = String::new();
        let mut last_end = 0;
        let mut search_at = 0;

        while search_at < text.len() {
            let Some(caps) = self.regex.captures_at(text, search_at) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            // An unconsumed backslash right before the match makes the run odd
            if whole.start() > last_end && bytes[whole.start() - 1] == b'\\' {
                search_at = whole.end();
                continue;
            }

            output.push_str(&text[last_end..whole.start()]);
            match self.decode(&caps) {
                Some(decoded) => output.push_str(&decoded),
                None => output.push_str(whole.as_str()),
            }
            last_end = whole.end();
            search_at = whole.end();
        }

        if last_end == 0 {
            return Cow::Borrowed(text);
        }
        output.push_str(&text[last_end..]);
        Cow::Owned(output)
    }

    fn decode(&self, caps: &Captures<'_>) -> Option<String> {
        let pairs = caps.name("pairs").map_or("", |m| m.as_str());
        let decoded = match &self.replacement {
            EscapeReplacement::Literal(literal) => return Some(format!("{}{}", pairs, literal)),
            EscapeReplacement::HexCodePoint => code_point(caps, 16)?,
            EscapeReplacement::OctalCodePoint => code_point(caps, 8)?,
        };
        Some(format!("{}{}", pairs, decoded))
    }
}

/// Surrogates and values past U+10FFFF have no char and stay undecoded
fn code_point(caps: &Captures<'_>, radix: u32) -> Option<char> {
    let digits = caps.name("code")?.as_str();
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
}
