//! Aggregator: folds a review set (or the BFF's own analysis) into a `SentimentSummary`.
//!
//! Remote analysis always wins. The classifier is consulted only when no remote distribution
//! exists, fallback is allowed, and there is at least one review.

use serde::{Deserialize, Serialize};

use crate::models::analysis::RemoteAnalysis;
use crate::models::review::{Review, SentimentLabel};
use crate::sentiment::classifier::SentimentClassifier;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    Remote,
    Local,
    #[default]
    None,
}

/// Sentiment distribution shown by the dashboard cards.
///
/// Percentages are rounded independently and are not forced to sum to 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SentimentSummary {
    pub positive_percentage: f64,
    pub neutral_percentage: f64,
    pub negative_percentage: f64,
    pub total_reviews: u64,
    pub average_sentiment_score: Option<f64>,
    pub source: SummarySource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl LabelCounts {
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }
}

pub fn aggregate(
    reviews: &[Review],
    remote: Option<&RemoteAnalysis>,
    allow_classifier_fallback: bool,
    classifier: &dyn SentimentClassifier,
) -> SentimentSummary {
    if let Some(remote) = remote.filter(|r| r.has_distribution()) {
        return SentimentSummary {
            positive_percentage: remote.positive_percentage.unwrap_or(0.0),
            neutral_percentage: remote.neutral_percentage.unwrap_or(0.0),
            negative_percentage: remote.negative_percentage.unwrap_or(0.0),
            total_reviews: remote.total_reviews.unwrap_or(reviews.len() as u64),
            average_sentiment_score: remote.average_sentiment_score,
            source: SummarySource::Remote,
        };
    }

    if reviews.is_empty() || !allow_classifier_fallback {
        return SentimentSummary {
            total_reviews: reviews.len() as u64,
            ..SentimentSummary::default()
        };
    }

    let counts = label_counts(reviews, classifier);
    let total = counts.total();

    SentimentSummary {
        positive_percentage: percentage(counts.positive, total),
        neutral_percentage: percentage(counts.neutral, total),
        negative_percentage: percentage(counts.negative, total),
        total_reviews: total,
        average_sentiment_score: None,
        source: SummarySource::Local,
    }
}

pub fn label_counts(reviews: &[Review], classifier: &dyn SentimentClassifier) -> LabelCounts {
    reviews.iter().fold(LabelCounts::default(), |mut counts, review| {
        counts.record(classifier.classify(review));
        counts
    })
}

/// Mean star rating over the reviews that carry one.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    let rated: Vec<f64> = reviews.iter().filter_map(|r| r.rating).map(f64::from).collect();
    if rated.is_empty() {
        return None;
    }
    Some(rated.iter().sum::<f64>() / rated.len() as f64)
}

/// Whole-number percentage, rounded half away from zero. Zero total yields zero.
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (100.0 * count as f64 / total as f64).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::classifier::KeywordClassifier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps the keyword classifier and records every invocation.
    #[derive(Default)]
    struct CountingClassifier {
        calls: AtomicUsize,
    }

    impl SentimentClassifier for CountingClassifier {
        fn classify(&self, review: &Review) -> SentimentLabel {
            self.calls.fetch_add(1, Ordering::SeqCst);
            KeywordClassifier.classify(review)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn review(id: usize, body: &str, rating: Option<u8>) -> Review {
        Review {
            id: id.to_string(),
            body: Some(body.to_string()),
            rating,
            ..Review::default()
        }
    }

    #[test]
    fn test_empty_reviews_all_zero() {
        let summary = aggregate(&[], None, true, &KeywordClassifier);
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.positive_percentage, 0.0);
        assert_eq!(summary.neutral_percentage, 0.0);
        assert_eq!(summary.negative_percentage, 0.0);
        assert_eq!(summary.source, SummarySource::None);
        assert!(!summary.positive_percentage.is_nan());
    }

    #[test]
    fn test_local_distribution_sixty_twenty_twenty() {
        let mut reviews = Vec::new();
        for i in 0..3 {
            reviews.push(review(i, "App excelente", Some(5)));
        }
        for i in 3..6 {
            reviews.push(review(i, "ótimo para investir", Some(4)));
        }
        for i in 6..8 {
            reviews.push(review(i, "péssimo suporte", Some(1)));
        }
        for i in 8..10 {
            reviews.push(review(i, "atualizei ontem", Some(3)));
        }

        let summary = aggregate(&reviews, None, true, &KeywordClassifier);
        assert_eq!(summary.total_reviews, 10);
        assert_eq!(summary.positive_percentage, 60.0);
        assert_eq!(summary.negative_percentage, 20.0);
        assert_eq!(summary.neutral_percentage, 20.0);
        assert_eq!(summary.source, SummarySource::Local);
        assert!(summary.average_sentiment_score.is_none());
    }

    #[test]
    fn test_remote_summary_is_verbatim_and_skips_classifier() {
        let classifier = CountingClassifier::default();
        let reviews = vec![review(1, "péssimo", Some(1)), review(2, "ruim", Some(1))];
        let remote = RemoteAnalysis {
            positive_percentage: Some(72.4),
            neutral_percentage: Some(10.0),
            negative_percentage: Some(17.6),
            total_reviews: Some(1500),
            average_sentiment_score: Some(0.634),
            ..RemoteAnalysis::default()
        };

        let summary = aggregate(&reviews, Some(&remote), true, &classifier);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(summary.positive_percentage, 72.4);
        assert_eq!(summary.neutral_percentage, 10.0);
        assert_eq!(summary.negative_percentage, 17.6);
        assert_eq!(summary.total_reviews, 1500);
        assert_eq!(summary.average_sentiment_score, Some(0.634));
        assert_eq!(summary.source, SummarySource::Remote);
    }

    #[test]
    fn test_remote_without_total_uses_review_count() {
        let reviews = vec![review(1, "ok", None)];
        let remote = RemoteAnalysis {
            positive_percentage: Some(100.0),
            ..RemoteAnalysis::default()
        };
        let summary = aggregate(&reviews, Some(&remote), false, &KeywordClassifier);
        assert_eq!(summary.total_reviews, 1);
        assert_eq!(summary.negative_percentage, 0.0);
    }

    #[test]
    fn test_remote_without_distribution_falls_back() {
        let classifier = CountingClassifier::default();
        let reviews = vec![review(1, "excelente", None), review(2, "ruim", None)];
        let remote = RemoteAnalysis {
            overall_sentiment: Some("Positivo".to_string()),
            ..RemoteAnalysis::default()
        };

        let summary = aggregate(&reviews, Some(&remote), true, &classifier);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);
        assert_eq!(summary.source, SummarySource::Local);
        assert_eq!(summary.positive_percentage, 50.0);
        assert_eq!(summary.negative_percentage, 50.0);
    }

    #[test]
    fn test_fallback_disabled_returns_zeros() {
        let classifier = CountingClassifier::default();
        let reviews = vec![review(1, "excelente", Some(5))];
        let summary = aggregate(&reviews, None, false, &classifier);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(summary.total_reviews, 1);
        assert_eq!(summary.positive_percentage, 0.0);
        assert_eq!(summary.source, SummarySource::None);
    }

    #[test]
    fn test_percentages_round_independently() {
        // 1/3 each → 33 + 33 + 33 = 99
        let reviews = vec![
            review(1, "excelente", None),
            review(2, "nada a declarar", None),
            review(3, "ruim", None),
        ];
        let summary = aggregate(&reviews, None, true, &KeywordClassifier);
        assert_eq!(summary.positive_percentage, 33.0);
        assert_eq!(summary.neutral_percentage, 33.0);
        assert_eq!(summary.negative_percentage, 33.0);
    }

    #[test]
    fn test_average_rating_ignores_unrated() {
        let reviews = vec![review(1, "", Some(5)), review(2, "", None), review(3, "", Some(2))];
        assert_eq!(average_rating(&reviews), Some(3.5));
        assert_eq!(average_rating(&[review(1, "", None)]), None);
    }
}
