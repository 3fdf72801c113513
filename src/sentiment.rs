use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

/// Lexicon score of a single text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentScore {
    /// Sum of (possibly negated) lexicon values.
    pub score: i32,
    /// `score / tokens`, 0 for empty input.
    pub comparative: f64,
    pub tokens: usize,
    /// Words that contributed positively, in order of appearance.
    pub positive: Vec<String>,
    /// Words that contributed negatively, in order of appearance.
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Lexicon value of a word (0 when unknown).
    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Scores `text` against the AFINN-style lexicon.
    /// Negation: a negator within the previous 1..=3 tokens flips the sign of the word.
    pub fn score_text(&self, text: &str) -> SentimentScore {
        // Indexed backwards for negation, so collect first.
        let tokens: Vec<String> = tokenize(text).collect();
        let mut out = SentimentScore {
            tokens: tokens.len(),
            ..SentimentScore::default()
        };

        for i in 0..tokens.len() {
            let w = tokens[i].as_str();
            let base = self.word_score(w);
            if base == 0 {
                continue;
            }

            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            let adj = if negated { -base } else { base };
            out.score += adj;
            if adj > 0 {
                out.positive.push(w.to_string());
            } else {
                out.negative.push(w.to_string());
            }
        }

        if out.tokens > 0 {
            out.comparative = out.score as f64 / out.tokens as f64;
        }
        out
    }
}

/// Lowercased word tokens; apostrophes stay inside words so "isn't" survives.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .map(|t| t.trim_matches(|c: char| c == '\'' || c == '’'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('’', "'").to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "neither"
            | "nor"
            | "hardly"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "weren't"
            | "won't"
            | "can't"
            | "cannot"
            | "don't"
            | "doesn't"
            | "didn't"
            | "couldn't"
            | "shouldn't"
            | "wouldn't"
            | "without"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_words_score_positive() {
        let s = SentimentAnalyzer::new().score_text("I love it, truly fantastic!");
        assert!(s.score > 0);
        assert_eq!(s.positive, vec!["love", "fantastic"]);
        assert!(s.negative.is_empty());
        assert_eq!(s.tokens, 5);
        assert!((s.comparative - s.score as f64 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn negation_flips_sign() {
        let a = SentimentAnalyzer::new();
        let plain = a.score_text("the support is good");
        let negated = a.score_text("the support isn't very good");
        assert!(plain.score > 0);
        assert_eq!(negated.score, -plain.score);
        assert_eq!(negated.negative, vec!["good"]);
    }

    #[test]
    fn curly_apostrophe_negator_is_recognized() {
        let s = SentimentAnalyzer::new().score_text("this doesn’t feel good");
        assert!(s.score < 0);
    }

    #[test]
    fn negator_outside_window_is_ignored() {
        let s = SentimentAnalyzer::new().score_text("not that i ever said it was bad");
        assert!(s.score < 0);
    }

    #[test]
    fn empty_text_is_zero() {
        let s = SentimentAnalyzer::new().score_text("");
        assert_eq!(s, SentimentScore::default());
    }
}
