use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{as_decimal, as_id, as_text, as_timestamp, first_of};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Parses the labels the BFF emits, in English or Portuguese, any case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "positive" | "positivo" | "pos" => Some(SentimentLabel::Positive),
            "negative" | "negativo" | "neg" => Some(SentimentLabel::Negative),
            "neutral" | "neutro" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

/// A single store review. Never mutated after fetch: labels derived locally live elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawReview")]
pub struct Review {
    pub id: String,
    pub author: Option<String>,
    pub body: Option<String>,
    pub rating: Option<u8>,
    pub sentiment: Option<SentimentLabel>,
    pub timestamp: Option<DateTime<Utc>>,
    pub app_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawReview {
    id: Option<Value>,
    review_id: Option<Value>,
    #[serde(rename = "reviewId")]
    review_id_camel: Option<Value>,
    author: Option<Value>,
    user_name: Option<Value>,
    #[serde(rename = "userName")]
    user_name_camel: Option<Value>,
    user: Option<Value>,
    body: Option<Value>,
    content: Option<Value>,
    text: Option<Value>,
    comment: Option<Value>,
    rating: Option<Value>,
    score: Option<Value>,
    sentiment: Option<Value>,
    timestamp: Option<Value>,
    date: Option<Value>,
    at: Option<Value>,
    created_at: Option<Value>,
    app_id: Option<Value>,
    #[serde(rename = "appId")]
    app_id_camel: Option<Value>,
}

impl From<RawReview> for Review {
    fn from(raw: RawReview) -> Self {
        Review {
            id: first_of(&[&raw.id, &raw.review_id, &raw.review_id_camel], as_id)
                .unwrap_or_default(),
            author: first_of(
                &[
                    &raw.author,
                    &raw.user_name,
                    &raw.user_name_camel,
                    &raw.user,
                ],
                as_text,
            ),
            body: first_of(
                &[&raw.body, &raw.content, &raw.text, &raw.comment],
                as_text,
            ),
            rating: first_of(&[&raw.rating, &raw.score], as_star_rating),
            sentiment: first_of(&[&raw.sentiment], as_sentiment_label),
            timestamp: first_of(
                &[&raw.timestamp, &raw.date, &raw.at, &raw.created_at],
                as_timestamp,
            ),
            app_id: first_of(&[&raw.app_id, &raw.app_id_camel], as_text),
        }
    }
}

/// Ratings outside 1 to 5 are treated as absent.
fn as_star_rating(value: &Value) -> Option<u8> {
    as_decimal(value)
        .filter(|r| (1.0..=5.0).contains(r) && r.fract() == 0.0)
        .map(|r| r as u8)
}

fn as_sentiment_label(value: &Value) -> Option<SentimentLabel> {
    match value {
        Value::String(s) => SentimentLabel::parse(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_aliases_and_defaults() {
        let review: Review = serde_json::from_str(
            r#"{"reviewId": 17, "userName": "Ana", "content": "Muito bom", "score": 5}"#,
        )
        .unwrap();
        assert_eq!(review.id, "17");
        assert_eq!(review.author.as_deref(), Some("Ana"));
        assert_eq!(review.body.as_deref(), Some("Muito bom"));
        assert_eq!(review.rating, Some(5));
        assert!(review.sentiment.is_none());
        assert!(review.timestamp.is_none());
    }

    #[test]
    fn test_out_of_range_rating_is_absent() {
        let review: Review = serde_json::from_str(r#"{"id": "a", "rating": 7}"#).unwrap();
        assert_eq!(review.rating, None);
        let review: Review = serde_json::from_str(r#"{"id": "a", "rating": 0}"#).unwrap();
        assert_eq!(review.rating, None);
        let review: Review = serde_json::from_str(r#"{"id": "a", "rating": 3.5}"#).unwrap();
        assert_eq!(review.rating, None);
    }

    #[test]
    fn test_unknown_sentiment_is_unset() {
        let review: Review =
            serde_json::from_str(r#"{"id": "a", "sentiment": "mixed"}"#).unwrap();
        assert!(review.sentiment.is_none());
        let review: Review =
            serde_json::from_str(r#"{"id": "a", "sentiment": "Negativo"}"#).unwrap();
        assert_eq!(review.sentiment, Some(SentimentLabel::Negative));
    }

    #[test]
    fn test_several_body_names_at_once() {
        let review: Review = serde_json::from_str(
            r#"{"reviewId": "gp:1", "id": null, "text": "Travou", "content": "App travou no login", "score": 1, "rating": "x"}"#,
        )
        .unwrap();
        assert_eq!(review.id, "gp:1");
        assert_eq!(review.body.as_deref(), Some("App travou no login"));
        assert_eq!(review.rating, Some(1));
    }

    #[test]
    fn test_blank_body_falls_through_to_next_name() {
        let review: Review =
            serde_json::from_str(r#"{"id": "a", "body": " ", "comment": "bom"}"#).unwrap();
        assert_eq!(review.body.as_deref(), Some("bom"));
    }

    #[test]
    fn test_blank_body_is_absent() {
        let review: Review = serde_json::from_str(r#"{"id": "a", "text": "   "}"#).unwrap();
        assert!(review.body.is_none());
    }
}
