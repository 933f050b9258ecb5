//! Axum route handlers for the login gate.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{normalize_email, AuthSession};
use crate::errors::AppError;
use crate::models::auth::{AuthUser, LoginRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub token: String,
    pub session_id: Uuid,
    pub user: AuthUser,
}

/// POST /api/auth/login
///
/// Forwards the normalized email to the BFF and opens a session for the token it returns.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginView>, AppError> {
    let email = normalize_email(&request.email)?;

    let reply = state.bff.login(&email).await.map_err(|e| {
        warn!("Login request failed: {e}");
        AppError::Upstream(e)
    })?;

    let token = match (reply.success, reply.token) {
        (true, Some(token)) if !token.trim().is_empty() => token,
        _ => {
            return Err(AppError::LoginRejected(
                reply.error.unwrap_or_else(|| "Login failed".to_string()),
            ))
        }
    };

    let user = reply.user.unwrap_or_else(|| AuthUser {
        email: email.clone(),
        name: None,
    });
    let session = state.sessions.create(&token, user).await;
    let active_sessions = state.sessions.len().await;
    info!(session_id = %session.id, active_sessions, "User logged in");

    Ok(Json(LoginView {
        token,
        session_id: session.id,
        user: session.user,
    }))
}

/// POST /api/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(&auth.token).await;
    info!(session_id = %auth.session.id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}
