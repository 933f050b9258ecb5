//! View models built from a `ViewState` snapshot. Pure; recomputed on every request.

use serde::Serialize;

use crate::format::{
    format_count, format_date, format_percentage, format_rating, format_score, RatingTier,
};
use crate::models::app::App;
use crate::models::review::{Review, SentimentLabel};
use crate::sentiment::aggregator::{aggregate, average_rating, SentimentSummary};
use crate::sentiment::classifier::SentimentClassifier;

use super::view_state::ViewState;

const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AppCard {
    pub app_id: String,
    pub name: String,
    pub category: String,
    pub rating: String,
    pub rating_tier: RatingTier,
    pub total_reviews: String,
    pub icon_url: Option<String>,
}

impl AppCard {
    pub fn from_app(app: &App) -> Self {
        AppCard {
            app_id: app.app_id.clone(),
            name: app.name.clone(),
            category: app.category.clone(),
            rating: format_rating(app.rating),
            rating_tier: RatingTier::from_rating(app.rating),
            total_reviews: format_count(app.total_reviews),
            icon_url: app.icon_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewRow {
    pub id: String,
    pub author: String,
    pub body: String,
    pub rating: Option<u8>,
    pub date: String,
    pub sentiment: SentimentLabel,
}

impl ReviewRow {
    pub fn from_review(review: &Review, classifier: &dyn SentimentClassifier) -> Self {
        ReviewRow {
            id: review.id.clone(),
            author: review.author.clone().unwrap_or_else(|| ANONYMOUS.to_string()),
            body: review.body.clone().unwrap_or_default(),
            rating: review.rating,
            date: format_date(review.timestamp),
            sentiment: classifier.classify(review),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryView {
    pub summary: SentimentSummary,
    pub positive: String,
    pub neutral: String,
    pub negative: String,
    pub total_reviews: String,
    pub average_sentiment_score: String,
    pub average_rating: String,
    pub classifier: &'static str,
}

impl SummaryView {
    pub fn from_state(
        state: &ViewState,
        allow_fallback: bool,
        classifier: &dyn SentimentClassifier,
    ) -> Self {
        let summary = aggregate(&state.reviews, state.analysis.as_ref(), allow_fallback, classifier);
        SummaryView {
            positive: format_percentage(summary.positive_percentage),
            neutral: format_percentage(summary.neutral_percentage),
            negative: format_percentage(summary.negative_percentage),
            total_reviews: format_count(summary.total_reviews),
            average_sentiment_score: format_score(summary.average_sentiment_score),
            average_rating: format_score(average_rating(&state.reviews)),
            classifier: classifier.name(),
            summary,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AppDetailView {
    pub app: AppCard,
    pub based_on: String,
    pub reviews: Vec<ReviewRow>,
    pub sentiment: SummaryView,
    pub overall_sentiment: Option<String>,
    pub key_points: Vec<String>,
    pub suggestions: Vec<String>,
    pub reviews_error: Option<String>,
    pub analysis_error: Option<String>,
}

impl AppDetailView {
    /// `None` when no app is selected.
    pub fn from_state(
        state: &ViewState,
        allow_fallback: bool,
        classifier: &dyn SentimentClassifier,
    ) -> Option<Self> {
        let app = state.selected_app.as_ref()?;
        let analysis = state.analysis.as_ref();

        Some(AppDetailView {
            app: AppCard::from_app(app),
            based_on: format_count(app.total_reviews),
            reviews: state
                .reviews
                .iter()
                .map(|r| ReviewRow::from_review(r, classifier))
                .collect(),
            sentiment: SummaryView::from_state(state, allow_fallback, classifier),
            overall_sentiment: analysis.and_then(|a| a.overall_sentiment.clone()),
            key_points: analysis.map(|a| a.key_points.clone()).unwrap_or_default(),
            suggestions: analysis.map(|a| a.suggestions.clone()).unwrap_or_default(),
            reviews_error: state.errors.reviews.clone(),
            analysis_error: state.errors.analysis.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::view_state::{reduce, Action};
    use crate::models::analysis::RemoteAnalysis;
    use crate::sentiment::aggregator::SummarySource;
    use crate::sentiment::classifier::KeywordClassifier;

    fn itau() -> App {
        App {
            app_id: "com.itau".to_string(),
            name: "Itaú".to_string(),
            category: "Finanças".to_string(),
            rating: 4.63,
            total_reviews: 2_460_000,
            ..App::default()
        }
    }

    fn review(id: &str, body: &str, rating: Option<u8>) -> Review {
        Review {
            id: id.to_string(),
            body: Some(body.to_string()),
            rating,
            ..Review::default()
        }
    }

    fn state_with(reviews: Vec<Review>, analysis: Option<RemoteAnalysis>) -> ViewState {
        let state = reduce(&ViewState::default(), Action::AppSelected(itau()));
        let state = reduce(
            &state,
            Action::ReviewsLoaded {
                app_id: "com.itau".to_string(),
                reviews,
            },
        );
        reduce(
            &state,
            Action::AnalysisLoaded {
                app_id: "com.itau".to_string(),
                analysis,
            },
        )
    }

    #[test]
    fn test_app_card_formatting() {
        let card = AppCard::from_app(&itau());
        assert_eq!(card.rating, "4.6");
        assert_eq!(card.rating_tier, RatingTier::Excellent);
        assert_eq!(card.total_reviews, "2.5M");
    }

    #[test]
    fn test_review_row_defaults() {
        let row = ReviewRow::from_review(&Review::default(), &KeywordClassifier);
        assert_eq!(row.author, "Anonymous");
        assert_eq!(row.body, "");
        assert_eq!(row.date, "N/A");
        assert_eq!(row.sentiment, SentimentLabel::Neutral);
    }

    #[test]
    fn test_detail_without_selection_is_none() {
        assert!(AppDetailView::from_state(&ViewState::default(), true, &KeywordClassifier).is_none());
    }

    #[test]
    fn test_detail_uses_local_fallback_when_analysis_missing() {
        let state = state_with(
            vec![
                review("1", "excelente", Some(5)),
                review("2", "travou no pix", Some(1)),
            ],
            None,
        );
        let detail = AppDetailView::from_state(&state, true, &KeywordClassifier).unwrap();
        assert_eq!(detail.based_on, "2.5M");
        assert_eq!(detail.reviews.len(), 2);
        assert_eq!(detail.reviews[1].sentiment, SentimentLabel::Negative);
        assert_eq!(detail.sentiment.summary.source, SummarySource::Local);
        assert_eq!(detail.sentiment.positive, "50%");
        assert_eq!(detail.sentiment.average_sentiment_score, "N/A");
        assert_eq!(detail.sentiment.average_rating, "3.0");
        assert_eq!(detail.sentiment.classifier, "keyword");
    }

    #[test]
    fn test_detail_prefers_remote_analysis() {
        let analysis = RemoteAnalysis {
            positive_percentage: Some(81.0),
            neutral_percentage: Some(9.0),
            negative_percentage: Some(10.0),
            average_sentiment_score: Some(0.78),
            overall_sentiment: Some("Positivo".to_string()),
            key_points: vec!["PIX rápido".to_string()],
            ..RemoteAnalysis::default()
        };
        let state = state_with(vec![review("1", "péssimo", Some(1))], Some(analysis));
        let detail = AppDetailView::from_state(&state, true, &KeywordClassifier).unwrap();
        assert_eq!(detail.sentiment.summary.source, SummarySource::Remote);
        assert_eq!(detail.sentiment.positive, "81%");
        assert_eq!(detail.sentiment.average_sentiment_score, "0.8");
        assert_eq!(detail.overall_sentiment.as_deref(), Some("Positivo"));
        assert_eq!(detail.key_points.len(), 1);
    }
}
