// src/analyze/fuzzy.rs
//! Fuzzy token equality for brand matching.
//!
//! Decision order (first hit wins):
//! 1. equal after trim + lowercase
//! 2. one side contains the other
//! 3. Levenshtein distance <= 2, or distance / max_len <= 0.3
//! 4. Sørensen-Dice bigram similarity >= 0.7
//!
//! Similarity: `strsim::sorensen_dice`, distance: `strsim::levenshtein` (exact DP, per char).

use strsim::{levenshtein as strsim_levenshtein, sorensen_dice};

pub const MAX_EDIT_DISTANCE: usize = 2;
pub const MAX_EDIT_RATIO: f64 = 0.3;
pub const MIN_SIMILARITY: f64 = 0.7;

/// Returns true when `a` and `b` plausibly denote the same token.
/// Empty input (after trimming) never matches.
pub fn fuzzy_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }

    if a == b {
        return true;
    }
    if a.contains(&b) || b.contains(&a) {
        return true;
    }

    let distance = levenshtein(&a, &b);
    let max_len = a.chars().count().max(b.chars().count());
    if distance <= MAX_EDIT_DISTANCE || (distance as f64 / max_len as f64) <= MAX_EDIT_RATIO {
        return true;
    }

    similarity(&a, &b) >= MIN_SIMILARITY
}

/// Exact single-character edit distance (insert/delete/substitute cost 1).
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim_levenshtein(a, b)
}

/// Bigram (Dice) similarity in [0, 1]; whitespace is ignored.
pub fn similarity(a: &str, b: &str) -> f64 {
    sorensen_dice(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_case_insensitive() {
        assert!(fuzzy_match("Acme", "acme"));
        assert!(fuzzy_match("  GLOBEX ", "globex"));
    }

    #[test]
    fn substring_either_way() {
        assert!(fuzzy_match("acme", "acmecorp"));
        assert!(fuzzy_match("acmecorp", "acme"));
    }

    #[test]
    fn small_typos_match() {
        assert!(fuzzy_match("initech", "inittech"));
        assert!(fuzzy_match("microsoft", "mircosoft"));
    }

    #[test]
    fn ratio_rule_covers_longer_words() {
        // distance 3 over 10 chars => 0.3
        assert_eq!(levenshtein("abcdefghij", "xbcdefyhiz"), 3);
        assert!(fuzzy_match("abcdefghij", "xbcdefyhiz"));
        // distance 4 over 10 chars => 0.4
        assert!(!fuzzy_match("abcdefghij", "xbcwefyhiz"));
    }

    #[test]
    fn unrelated_words_do_not_match() {
        assert!(!fuzzy_match("globex", "initech"));
        assert!(!fuzzy_match("products", "acme"));
    }

    #[test]
    fn empty_never_matches() {
        assert!(!fuzzy_match("", ""));
        assert!(!fuzzy_match("   ", "acme"));
        assert!(!fuzzy_match("acme", ""));
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn similarity_is_bounded() {
        assert_eq!(similarity("night", "night"), 1.0);
        let s = similarity("night", "nacht");
        assert!((0.0..=1.0).contains(&s));
    }
}
