// src/analyze/mod.rs
//! Analysis pipeline entry: brand mention/rank + brand-scoped sentiment for one answer.
//!
//! Everything under `analyze` is pure and synchronous: no I/O, no shared state,
//! identical inputs always give identical outputs.

pub mod brand_sentiment;
pub mod fuzzy;
pub mod list_items;
pub mod mention;
pub mod tokenizer;

use serde::Serialize;

// Re-export convenient types.
pub use crate::analyze::brand_sentiment::{
    analyze_sentiment, SentimentContext, SentimentLabel, SentimentResult,
};
pub use crate::analyze::fuzzy::{fuzzy_match, levenshtein};
pub use crate::analyze::list_items::{extract_list_items, ListItem};
pub use crate::analyze::mention::{is_recommendation_prompt, locate, MatchResult};

/// Combined judgment for one generated answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BrandAnalysis {
    pub mention: MatchResult,
    pub sentiment: SentimentResult,
}

/// Locate `brand` in `text` (answer to `prompt`) and score the sentiment around it.
pub fn analyze_response(text: &str, brand: &str, prompt: &str) -> BrandAnalysis {
    BrandAnalysis {
        mention: locate(text, brand, prompt),
        sentiment: analyze_sentiment(text, brand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_rank_and_sentiment() {
        let text = "Here are the best CRMs:\n1. Initech\n2. Globex - excellent and reliable\n3. Umbrella";
        let out = analyze_response(text, "Globex", "What are the best CRM tools?");
        assert_eq!(out.mention.position, 2);
        assert!(out.sentiment.score > 0.0);
    }

    #[test]
    fn empty_text_yields_zero_values() {
        let out = analyze_response("", "Globex", "best tools");
        assert_eq!(out, BrandAnalysis::default());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let text = "1. Globex is great\n2. Initech is poor";
        let a = analyze_response(text, "Globex", "top tools");
        let b = analyze_response(text, "Globex", "top tools");
        assert_eq!(a, b);
    }
}
