//! Sentiment Classifier: local fallback used when the BFF returns no sentiment distribution.
//!
//! Default: `KeywordClassifier` (fixed Portuguese keyword lists, case-insensitive substring
//! matching, star rating as tie-breaker). Deterministic and total: never fails.
//!
//! `AppState` holds an `Arc<dyn SentimentClassifier>`.

use crate::models::review::{Review, SentimentLabel};

// ────────────────────────────────────────────────────────────────────────────
// Keyword lists
// ────────────────────────────────────────────────────────────────────────────

/// Phrases indicating satisfaction. Matched as substrings of the lower-cased body.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "ótimo",
    "otimo",
    "excelente",
    "recomendo",
    "fácil",
    "facil",
    "rápido",
    "rapido",
    "confiável",
    "confiavel",
    "bom",
    "perfeito",
    "adoro",
    "amei",
    "prático",
    "pratico",
];

/// Phrases indicating dissatisfaction. Matched as substrings of the lower-cased body.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "ruim",
    "péssimo",
    "pessimo",
    "erro",
    "lento",
    "travou",
    "trava",
    "não recomendo",
    "nao recomendo",
    "golpe",
    "inseguro",
    "horrível",
    "horrivel",
    "problema",
    "falha",
    "demora",
    "pior",
];

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Labels a single review. Implementations must be total.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, review: &Review) -> SentimentLabel;

    /// Backend name, surfaced for transparency in summaries.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordClassifier
// ────────────────────────────────────────────────────────────────────────────

/// Keyword-count classifier.
///
/// Algorithm:
/// 1. An existing positive/negative label is returned unchanged.
/// 2. Count positive and negative keywords present in the lower-cased body.
/// 3. More positive hits → positive; more negative hits → negative.
/// 4. Tie or no hits → rating ≥ 4 positive, rating ≤ 2 negative, else neutral.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl SentimentClassifier for KeywordClassifier {
    fn classify(&self, review: &Review) -> SentimentLabel {
        classify_review(review)
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// Counts of matched keywords in one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub positive: usize,
    pub negative: usize,
}

pub fn classify_review(review: &Review) -> SentimentLabel {
    match review.sentiment {
        Some(label @ (SentimentLabel::Positive | SentimentLabel::Negative)) => return label,
        Some(SentimentLabel::Neutral) | None => {}
    }

    let hits = count_keywords(review.body.as_deref().unwrap_or_default());

    if hits.positive > hits.negative && hits.positive > 0 {
        SentimentLabel::Positive
    } else if hits.negative > hits.positive && hits.negative > 0 {
        SentimentLabel::Negative
    } else {
        label_from_rating(review.rating)
    }
}

/// Each keyword counts once per text, however often it appears.
pub fn count_keywords(text: &str) -> KeywordHits {
    let normalized = text.to_lowercase();
    let present = |keywords: &[&str]| keywords.iter().filter(|k| normalized.contains(**k)).count();

    KeywordHits {
        positive: present(POSITIVE_KEYWORDS),
        negative: present(NEGATIVE_KEYWORDS),
    }
}

pub fn label_from_rating(rating: Option<u8>) -> SentimentLabel {
    match rating {
        Some(r) if r >= 4 => SentimentLabel::Positive,
        Some(r) if r <= 2 => SentimentLabel::Negative,
        _ => SentimentLabel::Neutral,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
