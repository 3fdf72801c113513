// src/analyze/tokenizer.rs
//! Text normalization helpers shared by the mention locator and the sentiment aggregator.
//!
//! Two word modes:
//! - `tokenize`: lowercase + whitespace split (punctuation stays glued to words).
//! - `extract_words`: lowercase + `\w+` runs, used for position counting so that
//!   punctuation never counts as a word of its own.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("word regex"));

/// Lowercases `text` and splits it on runs of whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Lowercases `text` and returns its alphanumeric word runs in order.
pub fn extract_words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Number of words that start before `byte_index` in `text`.
///
/// `byte_index` is clamped to the nearest char boundary at or below it.
pub fn count_words_before(text: &str, byte_index: usize) -> usize {
    let end = floor_char_boundary(text, byte_index);
    WORD_RE.find_iter(&text[..end]).count()
}

/// Byte offset of the first case-insensitive occurrence of `needle_lower` in `haystack`.
///
/// `needle_lower` must already be lowercase. The offset refers to `haystack` itself,
/// so it stays valid even when lowercasing would change byte lengths.
pub fn find_ignore_case(haystack: &str, needle_lower: &str) -> Option<usize> {
    if needle_lower.is_empty() {
        return None;
    }
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| starts_with_ignore_case(&haystack[i..], needle_lower))
}

/// Case-insensitive substring test; `needle_lower` must already be lowercase.
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    find_ignore_case(haystack, needle_lower).is_some()
}

fn starts_with_ignore_case(s: &str, needle_lower: &str) -> bool {
    let mut hay = s.chars().flat_map(char::to_lowercase);
    needle_lower.chars().all(|c| hay.next() == Some(c))
}

/// Largest char boundary `<= index` (clamped to `s.len()`).
pub(crate) fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Byte offset reached after advancing at most `max_chars` characters from `start`.
pub(crate) fn advance_chars(s: &str, start: usize, max_chars: usize) -> usize {
    let start = floor_char_boundary(s, start);
    s[start..]
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| start + i)
        .unwrap_or(s.len())
}

/// Byte offset reached after stepping back at most `max_chars` characters from `end`.
pub(crate) fn retreat_chars(s: &str, end: usize, max_chars: usize) -> usize {
    let end = floor_char_boundary(s, end);
    if max_chars == 0 {
        return end;
    }
    s[..end]
        .char_indices()
        .rev()
        .nth(max_chars - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}
