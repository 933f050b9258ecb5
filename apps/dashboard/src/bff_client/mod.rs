/// BFF Client: the single point of entry for every call to the remote analytics API.
///
/// ARCHITECTURAL RULE: No other module may talk to the BFF directly.
/// Handlers depend on the `BffSource` trait; `BffClient` is the HTTP implementation.
///
/// Failed calls are not retried. A failure is terminal until the user triggers the fetch again.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::dashboard::backlog::BacklogBoard;
use crate::models::analysis::RemoteAnalysis;
use crate::models::app::App;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::backlog::BacklogReport;
use crate::models::jira::{
    JiraConfig, JiraConnectionStatus, JiraIssueResult, JiraProject, JiraProjectList,
};
use crate::models::review::Review;

#[derive(Debug, Error)]
pub enum BffError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid BFF base URL: {0}")]
    BaseUrl(String),
}

/// Everything the dashboard needs from the BFF.
#[async_trait]
pub trait BffSource: Send + Sync {
    async fn list_apps(&self, query: Option<&str>, store: &str) -> Result<Vec<App>, BffError>;

    async fn get_app(&self, app_id: &str, store: &str) -> Result<App, BffError>;

    async fn list_reviews(
        &self,
        app_id: &str,
        store: &str,
        limit: u32,
    ) -> Result<Vec<Review>, BffError>;

    /// `Ok(None)` when the BFF answers with an empty or `null` body.
    async fn get_analysis(
        &self,
        app_id: &str,
        store: &str,
    ) -> Result<Option<RemoteAnalysis>, BffError>;

    async fn get_backlog(
        &self,
        app_id: &str,
        store: &str,
        limit: u32,
    ) -> Result<BacklogReport, BffError>;

    async fn login(&self, email: &str) -> Result<LoginResponse, BffError>;

    async fn jira_test_connection(
        &self,
        config: &JiraConfig,
    ) -> Result<JiraConnectionStatus, BffError>;

    async fn jira_projects(&self, config: &JiraConfig) -> Result<Vec<JiraProject>, BffError>;

    async fn create_jira_issues(
        &self,
        board: &BacklogBoard,
        config: &JiraConfig,
    ) -> Result<JiraIssueResult, BffError>;
}

/// Listing endpoints answer either with a bare array or wrapped under a key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Apps { apps: Vec<T> },
    Reviews { reviews: Vec<T> },
    Items { items: Vec<T> },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(v)
            | Listing::Apps { apps: v }
            | Listing::Reviews { reviews: v }
            | Listing::Items { items: v } => v,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateIssuesRequest<'a> {
    backlog_data: &'a BacklogBoard,
    project_key: &'a str,
    jira_config: &'a JiraConfig,
}

/// HTTP implementation of [`BffSource`].
#[derive(Clone)]
pub struct BffClient {
    client: Client,
    base_url: Url,
}

impl BffClient {
    pub fn new(config: &Config) -> Result<Self, BffError> {
        Self::with_base_url(&config.bff_base_url, config.http_timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, BffError> {
        let base_url =
            Url::parse(base_url).map_err(|e| BffError::BaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BffError::BaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded, so an id holding
    /// `/`, `?` or `#` stays inside its own segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends the request and decodes a 2xx JSON body. Non-2xx statuses become `BffError::Api`.
    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BffError> {
        let response = request.send().await?;
        let response = ensure_success(response).await?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "BFF call succeeded");
        Ok(serde_json::from_str(&body)?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, BffError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    warn!("BFF returned {}: {}", status, message);
    Err(BffError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decodes the JSON body whatever the status. Only an undecodable body on a non-2xx status is
/// reported as `BffError::Api`.
async fn read_reply<T: DeserializeOwned>(response: Response) -> Result<T, BffError> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str::<T>(&body) {
        Ok(reply) => Ok(reply),
        Err(_) if !status.is_success() => {
            warn!("BFF returned {}: {}", status, body);
            Err(BffError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
        Err(e) => Err(BffError::Parse(e)),
    }
}

#[async_trait]
impl BffSource for BffClient {
    async fn list_apps(&self, query: Option<&str>, store: &str) -> Result<Vec<App>, BffError> {
        let mut params = vec![("store", store)];
        if let Some(q) = query.filter(|q| !q.trim().is_empty()) {
            params.push(("query", q));
        }
        let request = self.client.get(self.url(&["api", "apps"])).query(&params);

        let listing: Listing<App> = self.fetch_json(request).await?;
        let mut apps = listing.into_vec();
        App::assign_missing_ids(&mut apps);
        Ok(apps)
    }

    async fn get_app(&self, app_id: &str, store: &str) -> Result<App, BffError> {
        let request = self
            .client
            .get(self.url(&["api", "apps", app_id]))
            .query(&[("store", store)]);

        let mut app: App = self.fetch_json(request).await?;
        if app.app_id.is_empty() {
            app.app_id = app_id.to_string();
        }
        Ok(app)
    }

    async fn list_reviews(
        &self,
        app_id: &str,
        store: &str,
        limit: u32,
    ) -> Result<Vec<Review>, BffError> {
        let request = self
            .client
            .get(self.url(&["api", "apps", app_id, "reviews"]))
            .query(&[("store", store.to_string()), ("limit", limit.to_string())]);

        let listing: Listing<Review> = self.fetch_json(request).await?;
        Ok(listing.into_vec())
    }

    async fn get_analysis(
        &self,
        app_id: &str,
        store: &str,
    ) -> Result<Option<RemoteAnalysis>, BffError> {
        let request = self
            .client
            .get(self.url(&["api", "apps", app_id, "analysis"]))
            .query(&[("store", store)]);

        let response = ensure_success(request.send().await?).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str::<Option<RemoteAnalysis>>(&body)?)
    }

    async fn get_backlog(
        &self,
        app_id: &str,
        store: &str,
        limit: u32,
    ) -> Result<BacklogReport, BffError> {
        let request = self
            .client
            .get(self.url(&["api", "apps", app_id, "backlog"]))
            .query(&[("store", store.to_string()), ("limit", limit.to_string())]);

        self.fetch_json(request).await
    }

    /// The login endpoint reports rejections in the JSON body, whatever the status.
    async fn login(&self, email: &str) -> Result<LoginResponse, BffError> {
        let response = self
            .client
            .post(self.url(&["api", "auth", "login"]))
            .json(&LoginRequest {
                email: email.to_string(),
            })
            .send()
            .await?;
        read_reply(response).await
    }

    /// Bad credentials come back as a 4xx carrying `{ success: false, message }`.
    async fn jira_test_connection(
        &self,
        config: &JiraConfig,
    ) -> Result<JiraConnectionStatus, BffError> {
        let response = self
            .client
            .post(self.url(&["jira", "test-connection"]))
            .json(config)
            .send()
            .await?;
        read_reply(response).await
    }

    async fn jira_projects(&self, config: &JiraConfig) -> Result<Vec<JiraProject>, BffError> {
        let request = self.client.post(self.url(&["jira", "projects"])).json(config);
        let list: JiraProjectList = self.fetch_json(request).await?;
        Ok(list.projects)
    }

    async fn create_jira_issues(
        &self,
        board: &BacklogBoard,
        config: &JiraConfig,
    ) -> Result<JiraIssueResult, BffError> {
        let request = self
            .client
            .post(self.url(&["backlog", "create-jira-issues"]))
            .json(&CreateIssuesRequest {
                backlog_data: board,
                project_key: &config.project_key,
                jira_config: config,
            });
        self.fetch_json(request).await
    }
}
