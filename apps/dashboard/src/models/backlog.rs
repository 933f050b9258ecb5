use serde::{Deserialize, Serialize};

use super::{lenient_count, null_as_default};

/// Backlog suggestions generated by the BFF from an app's reviews.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BacklogReport {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_reviews_processed: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub generated_backlog_items: Vec<GeneratedItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneratedItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub item_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: String,
}
