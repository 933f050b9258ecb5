use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{as_text, first_of, lenient_count, null_as_default};

/// Connection settings forwarded to the BFF's Jira integration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JiraConfig {
    #[serde(default)]
    pub jira_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub project_key: String,
}

impl JiraConfig {
    pub fn has_credentials(&self) -> bool {
        !self.jira_url.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.api_token.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JiraConnectionStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JiraProject {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct JiraProjectList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<JiraProject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JiraIssueSummary {
    #[serde(default, deserialize_with = "lenient_count")]
    pub created_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub failed_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_items: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawIssue")]
pub struct CreatedIssue {
    pub key: String,
    pub summary: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawIssue")]
pub struct FailedIssue {
    pub title: String,
    pub error: String,
}

/// Created and failed issues name their title `summary` or `title`, sometimes both.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIssue {
    key: Option<Value>,
    summary: Option<Value>,
    title: Option<Value>,
    url: Option<Value>,
    error: Option<Value>,
}

impl From<RawIssue> for CreatedIssue {
    fn from(raw: RawIssue) -> Self {
        CreatedIssue {
            key: first_of(&[&raw.key], as_text).unwrap_or_default(),
            summary: first_of(&[&raw.summary, &raw.title], as_text).unwrap_or_default(),
            url: first_of(&[&raw.url], as_text),
        }
    }
}

impl From<RawIssue> for FailedIssue {
    fn from(raw: RawIssue) -> Self {
        FailedIssue {
            title: first_of(&[&raw.title, &raw.summary], as_text).unwrap_or_default(),
            error: first_of(&[&raw.error], as_text).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JiraIssueResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: JiraIssueSummary,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_issues: Vec<CreatedIssue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed_issues: Vec<FailedIssue>,
}
