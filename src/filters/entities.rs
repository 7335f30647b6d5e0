/*!
 * HTML5 character reference decoding.
 *
 * Follows the HTML5 rules for references found in text: numeric references
 * with or without the closing semicolon, C1 code points remapped through
 * Windows-1252, surrogates and out-of-range values replaced by U+FFFD, and
 * the legacy named references (`&amp`, `&copy`, ...) that browsers accept
 * without a semicolon, including as the prefix of a longer word. Named
 * references are looked up in the `html-escape` entity table.
 */

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Candidate reference: decimal, hexadecimal or named, semicolon optional
static REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)")
        .expect("character reference pattern is valid")
});

/// Named references that are recognized without a trailing semicolon
const LEGACY_NAMES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

static LEGACY_ENTITIES: Lazy<HashMap<&'static str, String>> = Lazy::new(|| {
    LEGACY_NAMES
        .iter()
        .filter_map(|&name| named_reference(name).map(|value| (name, value)))
        .collect()
});

/// Decode every character reference in `text`
pub(crate) fn decode_character_references(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    REFERENCE_REGEX.replace_all(text, |caps: &Captures<'_>| decode_reference(&caps[1]))
}

fn decode_reference(reference: &str) -> String {
    match reference.strip_prefix('#') {
        Some(number) => decode_numeric(number).map_or_else(String::new, String::from),
        None => decode_named(reference),
    }
}

/// `None` means the reference decodes to nothing
fn decode_numeric(number: &str) -> Option<char> {
    let number = number.trim_end_matches(';');
    let parsed = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => number.parse::<u32>(),
    };
    // Overflow only happens far past U+10FFFF
    let Ok(code) = parsed else {
        return Some(char::REPLACEMENT_CHARACTER);
    };

    if let Some(remapped) = windows_1252_remap(code) {
        return Some(remapped);
    }
    if (0xD800..=0xDFFF).contains(&code) || code > 0x10FFFF {
        return Some(char::REPLACEMENT_CHARACTER);
    }
    if is_disallowed_code_point(code) {
        return None;
    }
    char::from_u32(code)
}

/// Replacements for NUL, CR and the C1 range
fn windows_1252_remap(code: u32) -> Option<char> {
    let remapped = match code {
        0x00 => '\u{FFFD}',
        0x0D => '\r',
        0x80 => '\u{20AC}',
        0x81 => '\u{81}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8D => '\u{8D}',
        0x8E => '\u{017D}',
        0x8F => '\u{8F}',
        0x90 => '\u{90}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9D => '\u{9D}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(remapped)
}

/// Control characters and noncharacters that references must not produce
fn is_disallowed_code_point(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || (code & 0xFFFE) == 0xFFFE
}

fn decode_named(reference: &str) -> String {
    let found = match reference.strip_suffix(';') {
        Some(name) => named_reference(name),
        None => LEGACY_ENTITIES.get(reference).cloned(),
    };
    if let Some(value) = found {
        return value;
    }

    // Longest legacy name that prefixes the reference, e.g. `&notit;` -> `¬it;`
    for end in (2..reference.len()).rev() {
        if !reference.is_char_boundary(end) {
            continue;
        }
        if let Some(value) = LEGACY_ENTITIES.get(&reference[..end]) {
            return format!("{}{}", value, &reference[end..]);
        }
    }
    format!("&{}", reference)
}

fn named_reference(name: &str) -> Option<String> {
    let reference = format!("&{};", name);
    match html_escape::decode_html_entities(&reference) {
        Cow::Owned(decoded) if decoded != reference => Some(decoded),
        _ => None,
    }
}
