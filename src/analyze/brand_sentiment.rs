// src/analyze/brand_sentiment.rs
//! Brand-scoped sentiment: score only the parts of the answer that talk about the brand.
//!
//! Contexts, in discovery order:
//! 1. every sentence containing the brand phrase or any brand token
//! 2. per paragraph, ~100 chars around the first brand occurrence (exact duplicates skipped)
//! 3. fallback: the whole text
//!
//! Each context is scored with the lexicon analyzer; raw and comparative scores are
//! averaged and the averaged raw score picks the label.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analyze::tokenizer::{
    advance_chars, contains_ignore_case, find_ignore_case, retreat_chars, tokenize,
};
use crate::sentiment::SentimentAnalyzer;

/// Max contexts reported back (all of them are still scored).
pub const MAX_CONTEXTS: usize = 5;
/// Display length of a context before the ellipsis.
pub const CONTEXT_DISPLAY_CHARS: usize = 200;
/// Chars kept on each side of the brand in a paragraph window.
const PARAGRAPH_WINDOW_CHARS: usize = 100;

const VERY_POSITIVE_ABOVE: f64 = 2.0;
const POSITIVE_ABOVE: f64 = 0.5;
const NEGATIVE_BELOW: f64 = -0.5;
const VERY_NEGATIVE_BELOW: f64 = -2.0;

static SENTENCE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence split regex"));
static PARAGRAPH_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph split regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryPositive,
    Positive,
    #[default]
    Neutral,
    Negative,
    VeryNegative,
}

impl SentimentLabel {
    /// Label for an averaged raw lexicon score.
    pub fn from_score(avg: f64) -> Self {
        if avg > VERY_POSITIVE_ABOVE {
            Self::VeryPositive
        } else if avg > POSITIVE_ABOVE {
            Self::Positive
        } else if avg < VERY_NEGATIVE_BELOW {
            Self::VeryNegative
        } else if avg < NEGATIVE_BELOW {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryPositive => "very_positive",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
            Self::VeryNegative => "very_negative",
        }
    }
}

/// One scored excerpt of the answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentContext {
    /// Excerpt, truncated to 200 chars + `...`.
    pub text: String,
    pub raw_score: i32,
    pub comparative: f64,
    pub positive_terms: Vec<String>,
    pub negative_terms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
    pub comparative: f64,
    pub confidence: f64,
    pub contexts: Vec<SentimentContext>,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// Sentiment of `text` towards `brand`. Empty input → neutral zero result.
pub fn analyze_sentiment(text: &str, brand: &str) -> SentimentResult {
    let brand = brand.trim().to_lowercase();
    if text.trim().is_empty() || brand.is_empty() {
        return SentimentResult::neutral();
    }

    let contexts = collect_contexts(text, &brand);
    let analyzer = SentimentAnalyzer::new();
    let scored: Vec<(&str, _)> = contexts
        .iter()
        .map(|c| (c.as_str(), analyzer.score_text(c)))
        .collect();

    let n = scored.len() as f64;
    let avg_score = scored.iter().map(|(_, s)| s.score as f64).sum::<f64>() / n;
    let avg_comparative = scored.iter().map(|(_, s)| s.comparative).sum::<f64>() / n;

    SentimentResult {
        label: SentimentLabel::from_score(avg_score),
        score: round2(avg_score),
        comparative: round2(avg_comparative),
        confidence: round2(avg_comparative.abs()),
        contexts: scored
            .into_iter()
            .take(MAX_CONTEXTS)
            .map(|(text, s)| SentimentContext {
                text: truncate_display(text),
                raw_score: s.score,
                comparative: round2(s.comparative),
                positive_terms: s.positive,
                negative_terms: s.negative,
            })
            .collect(),
    }
}

/// Brand contexts in discovery order; never empty for non-empty `text`.
fn collect_contexts(text: &str, brand_lower: &str) -> Vec<String> {
    let brand_tokens = tokenize(brand_lower);
    let mut contexts: Vec<String> = Vec::new();

    for sentence in split_trimmed(&SENTENCE_SPLIT, text) {
        let hit = contains_ignore_case(sentence, brand_lower)
            || brand_tokens.iter().any(|t| contains_ignore_case(sentence, t));
        if hit {
            contexts.push(sentence.to_string());
        }
    }

    for paragraph in split_trimmed(&PARAGRAPH_SPLIT, text) {
        let Some(idx) = find_ignore_case(paragraph, brand_lower) else {
            continue;
        };
        let start = retreat_chars(paragraph, idx, PARAGRAPH_WINDOW_CHARS);
        let brand_end = advance_chars(paragraph, idx, brand_lower.chars().count());
        let end = advance_chars(paragraph, brand_end, PARAGRAPH_WINDOW_CHARS);
        let window = paragraph[start..end].trim();
        if !window.is_empty() && !contexts.iter().any(|c| c == window) {
            contexts.push(window.to_string());
        }
    }

    if contexts.is_empty() {
        contexts.push(text.trim().to_string());
    }
    contexts
}

fn split_trimmed<'t>(re: &'t Regex, text: &'t str) -> impl Iterator<Item = &'t str> {
    re.split(text).map(str::trim).filter(|s| !s.is_empty())
}

fn truncate_display(text: &str) -> String {
    match text.char_indices().nth(CONTEXT_DISPLAY_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Round to 2 decimals; `-0.0` is normalized to `0.0`.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0 + 0.0
}
