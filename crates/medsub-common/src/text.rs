//! Text normalization for medication matching.
//!
//! Every comparison in the engine runs over the output of [`normalize_text`]:
//! - Lowercase conversion
//! - Unicode NFD decomposition with combining marks dropped (`á` -> `a`)
//! - Anything outside `[a-z0-9 ]` replaced by a space
//! - Whitespace collapsed
//! - A numeral followed by a unit token merged (`500 mg` -> `500mg`)
//!
//! Accented and unaccented spellings therefore compare equal, and substring
//! or whole-word checks behave the same for names, compositions and notes.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Unit tokens merged into a preceding numeral.
///
/// `%` never reaches the merge step because punctuation is stripped first.
const UNIT_TOKENS: &[&str] = &["mg", "ml", "g"];

/// Lowercases and strips diacritics, keeping punctuation.
///
/// Used where separators carry meaning, e.g. splitting a composition on `+`.
pub fn fold(raw: &str) -> String {
    raw.to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect()
}

/// Normalizes free text into the canonical comparison form.
///
/// Missing or blank input normalizes to the empty string. The function is
/// idempotent: normalizing an already-normalized string returns it unchanged.
///
/// # Examples
///
/// ```
/// use medsub_common::normalize_text;
///
/// assert_eq!(normalize_text("Paracetamol (500 MG) + Cafeína"), "paracetamol 500mg cafeina");
/// assert_eq!(normalize_text("   "), "");
/// ```
pub fn normalize_text(raw: &str) -> String {
    let folded = fold(raw);
    let mut cleaned = String::with_capacity(folded.len());
    for ch in folded.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            cleaned.push(ch);
        } else if ch.is_alphanumeric() {
            // Letters with no ASCII decomposition are dropped in place.
            continue;
        } else {
            cleaned.push(' ');
        }
    }
    merge_units(cleaned.split_whitespace())
}

fn merge_units<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    let mut merged: Vec<String> = Vec::new();
    for token in tokens {
        if UNIT_TOKENS.contains(&token)
            && let Some(last) = merged.last_mut()
            && last.ends_with(|ch: char| ch.is_ascii_digit())
        {
            last.push_str(token);
            continue;
        }
        merged.push(token.to_string());
    }
    merged.join(" ")
}

/// Extracts the principal active component of a composition.
///
/// This is the text before the first `+` and before any parenthesis,
/// normalized. `"Paracetamol (500mg) + Cafeína (50mg)"` yields `"paracetamol"`.
pub fn principal_component(composition: &str) -> String {
    let folded = fold(composition);
    let head = folded.split('+').next().unwrap_or("");
    let head = head.split('(').next().unwrap_or("");
    normalize_text(head)
}

/// Number of `+`-joined components in a composition.
pub fn component_count(composition: &str) -> usize {
    composition.matches('+').count() + 1
}

/// Returns true when `needle` occurs in `haystack` delimited by non-alphanumeric
/// characters or the string boundaries.
///
/// Both arguments are expected to be normalized already. An empty needle never
/// matches.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|ch| !ch.is_alphanumeric());
        let after = haystack[end..]
            .chars()
            .next()
            .is_none_or(|ch| !ch.is_alphanumeric());
        before && after
    })
}

/// Splits raw text into normalized word tokens.
pub fn tokens(raw: &str) -> Vec<String> {
    normalize_text(raw)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Normalized tokens of `raw` with stop words removed, in input order.
pub fn keywords(raw: &str, stop_words: &[&str]) -> Vec<String> {
    tokens(raw)
        .into_iter()
        .filter(|token| !stop_words.contains(&token.as_str()))
        .collect()
}
