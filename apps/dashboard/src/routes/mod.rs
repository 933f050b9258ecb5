pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::dashboard::handlers as dashboard;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Login gate
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/logout", post(auth::handle_logout))
        // Dashboard (bearer token required)
        .route("/api/dashboard/state", get(dashboard::handle_get_state))
        .route("/api/dashboard/apps", get(dashboard::handle_list_apps))
        .route(
            "/api/dashboard/apps/:app_id/select",
            post(dashboard::handle_select_app),
        )
        .route(
            "/api/dashboard/apps/:app_id/backlog",
            get(dashboard::handle_backlog),
        )
        .route("/api/dashboard/summary", get(dashboard::handle_summary))
        .route(
            "/api/dashboard/sidebar/toggle",
            post(dashboard::handle_toggle_sidebar),
        )
        .route("/api/dashboard/period", post(dashboard::handle_change_period))
        .route("/api/dashboard/collect", post(dashboard::handle_collect))
        .route(
            "/api/dashboard/competitors",
            get(dashboard::handle_competitors),
        )
        .route(
            "/api/dashboard/jira/test-connection",
            post(dashboard::handle_jira_test_connection),
        )
        .route(
            "/api/dashboard/jira/issues",
            post(dashboard::handle_create_jira_issues),
        )
        .with_state(state)
}
