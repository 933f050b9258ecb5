use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{as_count, as_decimal, as_string_list, as_text, first_of};

/// Sentiment analysis as computed by the BFF for one app.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawAnalysis")]
pub struct RemoteAnalysis {
    pub positive_percentage: Option<f64>,
    pub neutral_percentage: Option<f64>,
    pub negative_percentage: Option<f64>,
    pub total_reviews: Option<u64>,
    pub average_sentiment_score: Option<f64>,
    pub overall_sentiment: Option<String>,
    pub key_points: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAnalysis {
    positive_percentage: Option<Value>,
    #[serde(rename = "positivePercentage")]
    positive_percentage_camel: Option<Value>,
    positive: Option<Value>,
    neutral_percentage: Option<Value>,
    #[serde(rename = "neutralPercentage")]
    neutral_percentage_camel: Option<Value>,
    neutral: Option<Value>,
    negative_percentage: Option<Value>,
    #[serde(rename = "negativePercentage")]
    negative_percentage_camel: Option<Value>,
    negative: Option<Value>,
    total_reviews: Option<Value>,
    #[serde(rename = "totalReviews")]
    total_reviews_camel: Option<Value>,
    total_reviews_analyzed: Option<Value>,
    average_sentiment_score: Option<Value>,
    #[serde(rename = "averageSentimentScore")]
    average_sentiment_score_camel: Option<Value>,
    average_score: Option<Value>,
    overall_sentiment: Option<Value>,
    #[serde(rename = "overallSentiment")]
    overall_sentiment_camel: Option<Value>,
    key_points: Option<Value>,
    #[serde(rename = "keyPoints")]
    key_points_camel: Option<Value>,
    suggestions: Option<Value>,
}

impl From<RawAnalysis> for RemoteAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        RemoteAnalysis {
            positive_percentage: first_of(
                &[
                    &raw.positive_percentage,
                    &raw.positive_percentage_camel,
                    &raw.positive,
                ],
                as_decimal,
            ),
            neutral_percentage: first_of(
                &[
                    &raw.neutral_percentage,
                    &raw.neutral_percentage_camel,
                    &raw.neutral,
                ],
                as_decimal,
            ),
            negative_percentage: first_of(
                &[
                    &raw.negative_percentage,
                    &raw.negative_percentage_camel,
                    &raw.negative,
                ],
                as_decimal,
            ),
            total_reviews: first_of(
                &[
                    &raw.total_reviews,
                    &raw.total_reviews_camel,
                    &raw.total_reviews_analyzed,
                ],
                as_count,
            ),
            average_sentiment_score: first_of(
                &[
                    &raw.average_sentiment_score,
                    &raw.average_sentiment_score_camel,
                    &raw.average_score,
                ],
                as_decimal,
            ),
            overall_sentiment: first_of(
                &[&raw.overall_sentiment, &raw.overall_sentiment_camel],
                as_text,
            ),
            key_points: first_of(&[&raw.key_points, &raw.key_points_camel], as_string_list)
                .unwrap_or_default(),
            suggestions: first_of(&[&raw.suggestions], as_string_list).unwrap_or_default(),
        }
    }
}

impl RemoteAnalysis {
    /// True when the payload carries a usable sentiment distribution.
    pub fn has_distribution(&self) -> bool {
        self.positive_percentage.is_some()
            || self.neutral_percentage.is_some()
            || self.negative_percentage.is_some()
    }
}
