// Email login gate. The BFF issues the bearer token; this service only keeps the session.

pub mod handlers;
pub mod sessions;

use std::sync::LazyLock;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use regex::Regex;

use crate::errors::AppError;
use crate::state::AppState;
use sessions::Session;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Trims and lower-cases an email, rejecting blanks and malformed addresses.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(AppError::Validation("invalid email format".to_string()));
    }
    Ok(email.to_lowercase())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Extractor for routes behind the login gate.
pub struct AuthSession {
    pub token: String,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let session = state
            .sessions
            .get(token)
            .await
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthSession {
            token: token.to_string(),
            session,
        })
    }
}
