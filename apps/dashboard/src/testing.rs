//! In-memory `BffSource` used by handler and view tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::bff_client::{BffError, BffSource};
use crate::dashboard::backlog::BacklogBoard;
use crate::models::analysis::RemoteAnalysis;
use crate::models::app::App;
use crate::models::auth::LoginResponse;
use crate::models::backlog::BacklogReport;
use crate::models::jira::{JiraConfig, JiraConnectionStatus, JiraIssueResult, JiraProject};
use crate::models::review::Review;

#[derive(Default)]
pub struct FakeBff {
    apps: Vec<App>,
    reviews: HashMap<String, Vec<Review>>,
    analysis: HashMap<String, RemoteAnalysis>,
    backlog: HashMap<String, BacklogReport>,
    failing: HashSet<&'static str>,
    login_reply: Option<LoginResponse>,
    jira_status: JiraConnectionStatus,
    projects: Vec<JiraProject>,
    issue_result: JiraIssueResult,
    calls: Mutex<Vec<String>>,
}

impl FakeBff {
    pub fn with_app(mut self, app: App) -> Self {
        self.apps.push(app);
        self
    }

    pub fn with_reviews(mut self, app_id: &str, reviews: Vec<Review>) -> Self {
        self.reviews.insert(app_id.to_string(), reviews);
        self
    }

    pub fn with_analysis(mut self, app_id: &str, analysis: RemoteAnalysis) -> Self {
        self.analysis.insert(app_id.to_string(), analysis);
        self
    }

    pub fn with_backlog(mut self, app_id: &str, report: BacklogReport) -> Self {
        self.backlog.insert(app_id.to_string(), report);
        self
    }

    pub fn with_login(mut self, reply: LoginResponse) -> Self {
        self.login_reply = Some(reply);
        self
    }

    pub fn with_jira(mut self, status: JiraConnectionStatus, projects: Vec<JiraProject>) -> Self {
        self.jira_status = status;
        self.projects = projects;
        self
    }

    pub fn with_issue_result(mut self, result: JiraIssueResult) -> Self {
        self.issue_result = result;
        self
    }

    /// Makes every call to `endpoint` fail with a 500.
    pub fn failing(mut self, endpoint: &'static str) -> Self {
        self.failing.insert(endpoint);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &'static str, subject: &str) -> Result<(), BffError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{endpoint}:{subject}"));
        if self.failing.contains(endpoint) {
            return Err(BffError::Api {
                status: 500,
                message: format!("{endpoint} unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BffSource for FakeBff {
    async fn list_apps(&self, query: Option<&str>, _store: &str) -> Result<Vec<App>, BffError> {
        self.record("list_apps", query.unwrap_or(""))?;
        Ok(self.apps.clone())
    }

    async fn get_app(&self, app_id: &str, _store: &str) -> Result<App, BffError> {
        self.record("get_app", app_id)?;
        self.apps
            .iter()
            .find(|a| a.app_id == app_id)
            .cloned()
            .ok_or_else(|| BffError::Api {
                status: 404,
                message: format!("{app_id} not found"),
            })
    }

    async fn list_reviews(
        &self,
        app_id: &str,
        _store: &str,
        _limit: u32,
    ) -> Result<Vec<Review>, BffError> {
        self.record("list_reviews", app_id)?;
        Ok(self.reviews.get(app_id).cloned().unwrap_or_default())
    }

    async fn get_analysis(
        &self,
        app_id: &str,
        _store: &str,
    ) -> Result<Option<RemoteAnalysis>, BffError> {
        self.record("get_analysis", app_id)?;
        Ok(self.analysis.get(app_id).cloned())
    }

    async fn get_backlog(
        &self,
        app_id: &str,
        _store: &str,
        _limit: u32,
    ) -> Result<BacklogReport, BffError> {
        self.record("get_backlog", app_id)?;
        Ok(self.backlog.get(app_id).cloned().unwrap_or_default())
    }

    async fn login(&self, email: &str) -> Result<LoginResponse, BffError> {
        self.record("login", email)?;
        Ok(self.login_reply.clone().unwrap_or(LoginResponse {
            success: false,
            error: Some("Unknown user".to_string()),
            ..LoginResponse::default()
        }))
    }

    async fn jira_test_connection(
        &self,
        config: &JiraConfig,
    ) -> Result<JiraConnectionStatus, BffError> {
        self.record("jira_test_connection", &config.jira_url)?;
        Ok(self.jira_status.clone())
    }

    async fn jira_projects(&self, config: &JiraConfig) -> Result<Vec<JiraProject>, BffError> {
        self.record("jira_projects", &config.jira_url)?;
        Ok(self.projects.clone())
    }

    async fn create_jira_issues(
        &self,
        board: &BacklogBoard,
        config: &JiraConfig,
    ) -> Result<JiraIssueResult, BffError> {
        self.record(
            "create_jira_issues",
            &format!("{}/{}", config.project_key, board.backlog_items.len()),
        )?;
        Ok(self.issue_result.clone())
    }
}
