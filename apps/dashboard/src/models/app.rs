use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{as_count, as_decimal, as_id, as_text, first_of};

/// An app store listing. Read-only reference data for the whole session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawApp")]
pub struct App {
    pub app_id: String,
    pub name: String,
    pub category: String,
    pub rating: f64,
    pub total_reviews: u64,
    pub icon_url: Option<String>,
    pub version: Option<String>,
    pub last_updated: Option<String>,
    pub store: Option<String>,
    pub downloads: Option<f64>,
}

/// Every field name an app listing has been seen with.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawApp {
    app_id: Option<Value>,
    #[serde(rename = "appId")]
    app_id_camel: Option<Value>,
    id: Option<Value>,
    name: Option<Value>,
    title: Option<Value>,
    category: Option<Value>,
    genre: Option<Value>,
    rating: Option<Value>,
    #[serde(rename = "averageRating")]
    average_rating_camel: Option<Value>,
    average_rating: Option<Value>,
    score: Option<Value>,
    total_reviews: Option<Value>,
    #[serde(rename = "totalReviews")]
    total_reviews_camel: Option<Value>,
    reviews: Option<Value>,
    ratings: Option<Value>,
    icon_url: Option<Value>,
    #[serde(rename = "iconUrl")]
    icon_url_camel: Option<Value>,
    icon: Option<Value>,
    version: Option<Value>,
    last_updated: Option<Value>,
    #[serde(rename = "lastUpdated")]
    last_updated_camel: Option<Value>,
    updated: Option<Value>,
    store: Option<Value>,
    downloads: Option<Value>,
    downloads_count: Option<Value>,
    installs: Option<Value>,
}

impl From<RawApp> for App {
    fn from(raw: RawApp) -> Self {
        App {
            // the bundle id beats the numeric store id
            app_id: first_of(&[&raw.app_id, &raw.app_id_camel, &raw.id], as_id)
                .unwrap_or_default(),
            name: first_of(&[&raw.name, &raw.title], as_text).unwrap_or_default(),
            category: first_of(&[&raw.category, &raw.genre], as_text).unwrap_or_default(),
            rating: first_of(
                &[
                    &raw.rating,
                    &raw.average_rating_camel,
                    &raw.average_rating,
                    &raw.score,
                ],
                as_decimal,
            )
            .unwrap_or(0.0),
            total_reviews: first_of(
                &[
                    &raw.total_reviews,
                    &raw.total_reviews_camel,
                    &raw.reviews,
                    &raw.ratings,
                ],
                as_count,
            )
            .unwrap_or(0),
            icon_url: first_of(&[&raw.icon_url, &raw.icon_url_camel, &raw.icon], as_text),
            version: first_of(&[&raw.version], as_id),
            last_updated: first_of(
                &[&raw.last_updated, &raw.last_updated_camel, &raw.updated],
                as_id,
            ),
            store: first_of(&[&raw.store], as_text),
            downloads: first_of(&[&raw.downloads, &raw.downloads_count, &raw.installs], as_count)
                .map(|n| n as f64),
        }
    }
}

impl App {
    /// Fills in positional ids for listings that came back without one.
    pub fn assign_missing_ids(apps: &mut [App]) {
        for (index, app) in apps.iter_mut().enumerate() {
            if app.app_id.trim().is_empty() {
                app.app_id = (index + 1).to_string();
            }
        }
    }
}
