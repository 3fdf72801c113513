// src/analyze/mention.rs
//! Brand mention locator: is the brand in the answer, and where?
//!
//! Position policy:
//! - recommendation-style prompt + brand found in a numbered list → the list number (rank)
//! - otherwise → 1-based index of the first word of the mention
//! - not found → `mentioned = false`, `position = 0`
//!
//! The prompt (not the answer) decides whether ranks apply: "top 5 CRMs" wants a rank,
//! "tell me about Acme" wants a plain word offset.

use serde::Serialize;

use crate::analyze::fuzzy::fuzzy_match;
use crate::analyze::list_items::{extract_list_items, ListItem};
use crate::analyze::tokenizer::{advance_chars, count_words_before, extract_words, tokenize};

/// Substrings that mark a prompt as asking for a ranked answer.
pub const RECOMMENDATION_KEYWORDS: [&str; 7] = [
    "recommend",
    "list",
    "best",
    "top",
    "suggest",
    "compare",
    "options",
];

/// Raw text considered after a list marker (chars), further capped by the next item.
const ITEM_SPAN_CHARS: usize = 500;

/// Outcome of locating a brand; `position == 0` iff `!mentioned`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub mentioned: bool,
    pub position: usize,
    /// List number of the first matching item (recommendation prompts only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_rank: Option<usize>,
    /// 1-based word index of the mention, when one was computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_position: Option<usize>,
}

impl MatchResult {
    pub fn not_mentioned() -> Self {
        Self::default()
    }
}

/// Case-insensitive keyword test against [`RECOMMENDATION_KEYWORDS`].
pub fn is_recommendation_prompt(prompt: &str) -> bool {
    let p = prompt.to_lowercase();
    RECOMMENDATION_KEYWORDS.iter().any(|k| p.contains(k))
}

/// Locate `brand` in the generated `text`; `prompt` is the question that produced it.
pub fn locate(text: &str, brand: &str, prompt: &str) -> MatchResult {
    let brand = brand.trim().to_lowercase();
    if text.trim().is_empty() || brand.is_empty() {
        return MatchResult::not_mentioned();
    }

    let text = text.to_lowercase();
    let brand_tokens = tokenize(&brand);
    let recommendation = is_recommendation_prompt(prompt);

    let mut list_rank = None;
    let mut word_position = None;

    if recommendation {
        let items = extract_list_items(&text);
        if let Some((rank, pos)) = rank_in_list(&text, &items, &brand, &brand_tokens) {
            list_rank = Some(rank);
            word_position = Some(pos);
        }
    }

    if list_rank.is_none() {
        word_position = position_in_words(&text, &brand, &brand_tokens);
    }

    if word_position.is_none() {
        word_position = verbatim_position(&text, &brand);
    }

    match (list_rank, word_position) {
        (Some(rank), _) => MatchResult {
            mentioned: true,
            position: rank,
            list_rank,
            word_position,
        },
        (None, Some(pos)) => MatchResult {
            mentioned: true,
            position: pos,
            list_rank: None,
            word_position,
        },
        (None, None) => MatchResult::not_mentioned(),
    }
}

/// First list item mentioning the brand → `(list number, word position)`.
fn rank_in_list(
    text: &str,
    items: &[ListItem],
    brand: &str,
    brand_tokens: &[String],
) -> Option<(usize, usize)> {
    for (k, item) in items.iter().enumerate() {
        let span = item_span(text, items, k);

        let matched = if brand_tokens.len() > 1 {
            let all_tokens_in = |hay: &str| brand_tokens.iter().all(|t| hay.contains(t.as_str()));
            all_tokens_in(&item.content)
                || all_tokens_in(span)
                || item.content.contains(brand)
                || span.contains(brand)
        } else {
            item.content.contains(brand) || span.contains(brand) || fuzzy_match(&item.content, brand)
        };

        if matched {
            let anchor = span
                .find(brand)
                .map(|off| item.start_index + off)
                .unwrap_or(item.start_index);
            return Some((item.number, count_words_before(text, anchor) + 1));
        }
    }
    None
}

/// Raw text of item `k`: from its marker up to the next item, at most `ITEM_SPAN_CHARS`.
fn item_span<'t>(text: &'t str, items: &[ListItem], k: usize) -> &'t str {
    let start = items[k].start_index;
    let next = items
        .get(k + 1)
        .map(|n| n.start_index)
        .filter(|&e| e > start)
        .unwrap_or(text.len());
    let end = next.min(advance_chars(text, start, ITEM_SPAN_CHARS));
    &text[start..end]
}

/// Word-level search: sliding fuzzy window for multi-word brands, per-word fuzzy otherwise.
fn position_in_words(text: &str, brand: &str, brand_tokens: &[String]) -> Option<usize> {
    let words = extract_words(text);

    if brand_tokens.len() > 1 {
        words
            .windows(brand_tokens.len())
            .position(|window| {
                window
                    .iter()
                    .zip(brand_tokens)
                    .all(|(word, token)| fuzzy_match(word, token))
            })
            .map(|i| i + 1)
            .or_else(|| verbatim_position(text, brand))
    } else {
        words
            .iter()
            .position(|w| fuzzy_match(w, brand))
            .map(|i| i + 1)
    }
}

/// Verbatim substring search; position = words before the match + 1.
fn verbatim_position(text: &str, brand: &str) -> Option<usize> {
    text.find(brand).map(|idx| count_words_before(text, idx) + 1)
}
