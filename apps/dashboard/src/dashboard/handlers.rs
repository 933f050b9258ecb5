//! Axum route handlers for the dashboard API.
//!
//! Every handler follows the same cycle: fetch from the BFF, dispatch the outcome into the
//! session's view state, render the view model from the state that comes back.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::AuthSession;
use crate::dashboard::backlog::BacklogBoard;
use crate::dashboard::competitors::{fetch_competitors, CompetitorBoard, COMPETITOR_APPS};
use crate::dashboard::view_state::{Action, Period, ViewState};
use crate::dashboard::views::{AppCard, AppDetailView, SummaryView};
use crate::errors::AppError;
use crate::models::jira::{JiraConfig, JiraConnectionStatus, JiraIssueResult, JiraProject};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AppsQuery {
    pub query: Option<String>,
    pub store: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BacklogQuery {
    pub limit: Option<u32>,
    pub store: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodRequest {
    pub days: u32,
}

/// Everything the dashboard page shows for the current session.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub sidebar_open: bool,
    pub period: Period,
    pub collecting: bool,
    pub apps: Vec<AppCard>,
    pub apps_error: Option<String>,
    pub detail: Option<AppDetailView>,
    pub backlog: Option<BacklogBoard>,
    pub backlog_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JiraConnectionView {
    pub status: JiraConnectionStatus,
    pub projects: Vec<JiraProject>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn render(state: &AppState, view: &ViewState) -> DashboardView {
    DashboardView {
        sidebar_open: view.sidebar_open,
        period: view.period,
        collecting: view.collecting,
        apps: view.apps.iter().map(AppCard::from_app).collect(),
        apps_error: view.errors.apps.clone(),
        detail: AppDetailView::from_state(
            view,
            state.config.local_sentiment_fallback,
            state.classifier.as_ref(),
        ),
        backlog: view.backlog.clone(),
        backlog_error: view.errors.backlog.clone(),
    }
}

/// The session can disappear mid-request (logout from another tab).
async fn dispatch(state: &AppState, token: &str, action: Action) -> Result<ViewState, AppError> {
    state
        .sessions
        .dispatch(token, action)
        .await
        .ok_or(AppError::Unauthorized)
}

fn store_or_default<'a>(state: &'a AppState, store: &'a Option<String>) -> &'a str {
    store
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&state.config.default_store)
}

/// Fetches reviews, then analysis, for the selected app. Each failure is kept in its own slot.
async fn load_app_sections(
    state: &AppState,
    token: &str,
    app_id: &str,
) -> Result<ViewState, AppError> {
    let store = &state.config.default_store;

    let action = match state
        .bff
        .list_reviews(app_id, store, state.config.review_limit)
        .await
    {
        Ok(reviews) => {
            info!(app_id, count = reviews.len(), "Reviews loaded");
            Action::ReviewsLoaded {
                app_id: app_id.to_string(),
                reviews,
            }
        }
        Err(e) => {
            warn!(app_id, "Failed to load reviews: {e}");
            Action::ReviewsFailed {
                app_id: app_id.to_string(),
                message: e.to_string(),
            }
        }
    };
    dispatch(state, token, action).await?;

    let action = match state.bff.get_analysis(app_id, store).await {
        Ok(analysis) => Action::AnalysisLoaded {
            app_id: app_id.to_string(),
            analysis,
        },
        Err(e) => {
            warn!(app_id, "Failed to load analysis, using local sentiment: {e}");
            Action::AnalysisFailed {
                app_id: app_id.to_string(),
                message: e.to_string(),
            }
        }
    };
    dispatch(state, token, action).await
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/dashboard/state
pub async fn handle_get_state(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<DashboardView>, AppError> {
    Ok(Json(render(&state, &auth.session.view)))
}

/// GET /api/dashboard/apps
pub async fn handle_list_apps(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(params): Query<AppsQuery>,
) -> Result<Json<Vec<AppCard>>, AppError> {
    let store = store_or_default(&state, &params.store);

    match state.bff.list_apps(params.query.as_deref(), store).await {
        Ok(apps) => {
            info!(count = apps.len(), "Apps loaded");
            let view = dispatch(&state, &auth.token, Action::AppsLoaded(apps)).await?;
            Ok(Json(view.apps.iter().map(AppCard::from_app).collect()))
        }
        Err(e) => {
            dispatch(&state, &auth.token, Action::AppsFailed(e.to_string())).await?;
            Err(AppError::Upstream(e))
        }
    }
}

/// POST /api/dashboard/apps/:app_id/select
///
/// Selects an app from the loaded list and fetches its reviews and analysis.
/// A failed analysis fetch falls back to local sentiment; a failed review fetch still renders.
pub async fn handle_select_app(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(app_id): Path<String>,
) -> Result<Json<AppDetailView>, AppError> {
    let app = auth
        .session
        .view
        .find_app(&app_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("App {app_id} is not in the loaded list")))?;

    dispatch(&state, &auth.token, Action::AppSelected(app)).await?;
    let view = load_app_sections(&state, &auth.token, &app_id).await?;

    AppDetailView::from_state(
        &view,
        state.config.local_sentiment_fallback,
        state.classifier.as_ref(),
    )
    .map(Json)
    .ok_or_else(|| AppError::NotFound(format!("App {app_id} is no longer selected")))
}

/// GET /api/dashboard/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<SummaryView>, AppError> {
    let view = &auth.session.view;
    if view.selected_app.is_none() {
        return Err(AppError::NotFound("No app selected".to_string()));
    }
    Ok(Json(SummaryView::from_state(
        view,
        state.config.local_sentiment_fallback,
        state.classifier.as_ref(),
    )))
}

/// POST /api/dashboard/sidebar/toggle
pub async fn handle_toggle_sidebar(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<DashboardView>, AppError> {
    let view = dispatch(&state, &auth.token, Action::SidebarToggled).await?;
    Ok(Json(render(&state, &view)))
}

/// POST /api/dashboard/period
pub async fn handle_change_period(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(request): Json<PeriodRequest>,
) -> Result<Json<DashboardView>, AppError> {
    let period = Period::from_days(request.days).ok_or_else(|| {
        AppError::Validation(format!(
            "period must be 7, 30 or 90 days, got {}",
            request.days
        ))
    })?;
    let view = dispatch(&state, &auth.token, Action::PeriodChanged(period)).await?;
    info!(days = period.days(), "Analysis period changed");
    Ok(Json(render(&state, &view)))
}

/// POST /api/dashboard/collect
///
/// Re-fetches the app list and, if an app is selected, its reviews and analysis.
pub async fn handle_collect(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<DashboardView>, AppError> {
    dispatch(&state, &auth.token, Action::CollectionStarted).await?;

    let action = match state.bff.list_apps(None, &state.config.default_store).await {
        Ok(apps) => Action::AppsLoaded(apps),
        Err(e) => {
            warn!("Collection could not refresh apps: {e}");
            Action::AppsFailed(e.to_string())
        }
    };
    let view = dispatch(&state, &auth.token, action).await?;

    if let Some(app_id) = view.selected_app_id().map(str::to_string) {
        load_app_sections(&state, &auth.token, &app_id).await?;
    }

    let view = dispatch(&state, &auth.token, Action::CollectionFinished).await?;
    info!(session_id = %auth.session.id, "Data collection finished");
    Ok(Json(render(&state, &view)))
}

/// GET /api/dashboard/competitors
pub async fn handle_competitors(
    State(state): State<AppState>,
    _auth: AuthSession,
) -> Result<Json<CompetitorBoard>, AppError> {
    let competitors = fetch_competitors(state.bff.as_ref(), COMPETITOR_APPS).await;
    Ok(Json(CompetitorBoard::build(&competitors)))
}

/// GET /api/dashboard/apps/:app_id/backlog
///
/// Only apps from the session's loaded list can be asked for a backlog.
pub async fn handle_backlog(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(app_id): Path<String>,
    Query(params): Query<BacklogQuery>,
) -> Result<Json<BacklogBoard>, AppError> {
    if auth.session.view.find_app(&app_id).is_none() {
        return Err(AppError::NotFound(format!(
            "App {app_id} is not in the loaded list"
        )));
    }
    let store = store_or_default(&state, &params.store);
    let limit = params.limit.unwrap_or(state.config.backlog_limit);

    match state.bff.get_backlog(&app_id, store, limit).await {
        Ok(report) => {
            let board = BacklogBoard::from_report(&app_id, &report);
            info!(
                app_id = %app_id,
                items = board.backlog_items.len(),
                "Backlog generated"
            );
            dispatch(&state, &auth.token, Action::BacklogLoaded(board.clone())).await?;
            Ok(Json(board))
        }
        Err(e) => {
            dispatch(&state, &auth.token, Action::BacklogFailed(e.to_string())).await?;
            Err(AppError::Upstream(e))
        }
    }
}

/// POST /api/dashboard/jira/test-connection
///
/// Connection failures are reported in the status, not as an error response.
pub async fn handle_jira_test_connection(
    State(state): State<AppState>,
    _auth: AuthSession,
    Json(config): Json<JiraConfig>,
) -> Result<Json<JiraConnectionView>, AppError> {
    if !config.has_credentials() {
        return Err(AppError::Validation(
            "jira_url, email and api_token are required".to_string(),
        ));
    }

    let status = match state.bff.jira_test_connection(&config).await {
        Ok(status) => status,
        Err(e) => JiraConnectionStatus {
            success: false,
            message: format!("Connection error: {e}"),
        },
    };

    let projects = if status.success {
        state.bff.jira_projects(&config).await.unwrap_or_else(|e| {
            warn!("Could not list Jira projects: {e}");
            Vec::new()
        })
    } else {
        Vec::new()
    };

    Ok(Json(JiraConnectionView { status, projects }))
}

/// POST /api/dashboard/jira/issues
///
/// Creates one Jira issue per item of the session's last generated backlog.
pub async fn handle_create_jira_issues(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(config): Json<JiraConfig>,
) -> Result<Json<JiraIssueResult>, AppError> {
    let board = match auth.session.view.backlog.as_ref() {
        Some(board) if !config.project_key.trim().is_empty() => board,
        _ => {
            return Err(AppError::Validation(
                "Configure Jira and generate the backlog first".to_string(),
            ))
        }
    };

    let result = state.bff.create_jira_issues(board, &config).await?;
    info!(
        created = result.summary.created_count,
        failed = result.summary.failed_count,
        "Jira issues created"
    );
    Ok(Json(result))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
