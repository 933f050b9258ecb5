use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::dashboard::view_state::{reduce, Action, ViewState};
use crate::models::auth::AuthUser;

/// One logged-in user and the dashboard state they are looking at.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub user: AuthUser,
    pub created_at: DateTime<Utc>,
    pub view: ViewState,
}

/// Sessions keyed by the bearer token the BFF issued at login.
///
/// Handlers never hold the lock across a BFF call: read a snapshot, fetch, then `dispatch`.
/// A session expires `ttl` after login. Expired sessions are dropped when looked up, and every
/// login sweeps out the rest.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::new(Config::default().session_ttl)
    }
}

impl Session {
    fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        // a clock that moved backwards reads as a fresh session
        now.signed_duration_since(self.created_at)
            .to_std()
            .map(|age| age >= ttl)
            .unwrap_or(false)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Starts a fresh session. Logging in again with the same token resets its view state.
    pub async fn create(&self, token: &str, user: AuthUser) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user,
            created_at: now,
            view: ViewState::default(),
        };

        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        let swept = before - sessions.len();
        if swept > 0 {
            debug!(swept, "Expired sessions removed");
        }
        sessions.insert(token.to_string(), session.clone());
        session
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        {
            let sessions = self.inner.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired(self.ttl, Utc::now()) => {
                    return Some(session.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }
        self.expire(token).await;
        None
    }

    #[cfg(test)]
    pub async fn view(&self, token: &str) -> Option<ViewState> {
        self.get(token).await.map(|s| s.view)
    }

    /// Applies `action` to the session's view state and returns the new state.
    pub async fn dispatch(&self, token: &str, action: Action) -> Option<ViewState> {
        let mut sessions = self.inner.write().await;
        if sessions
            .get(token)?
            .is_expired(self.ttl, Utc::now())
        {
            sessions.remove(token);
            return None;
        }
        let session = sessions.get_mut(token)?;
        session.view = reduce(&session.view, action);
        Some(session.view.clone())
    }

    pub async fn remove(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Removes `token` only if it is still expired once the write lock is held.
    async fn expire(&self, token: &str) {
        let mut sessions = self.inner.write().await;
        if sessions
            .get(token)
            .is_some_and(|s| s.is_expired(self.ttl, Utc::now()))
        {
            sessions.remove(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> AuthUser {
        AuthUser {
            email: email.to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::default();
        let created = store.create("tok-1", user("ana@itau.com.br")).await;
        let fetched = store.get("tok-1").await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.user.email, "ana@itau.com.br");
        assert!(store.get("tok-2").await.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_updates_only_that_session() {
        let store = SessionStore::default();
        store.create("a", user("a@itau.com.br")).await;
        store.create("b", user("b@itau.com.br")).await;

        let view = store.dispatch("a", Action::SidebarToggled).await.unwrap();
        assert!(view.sidebar_open);
        assert!(store.view("a").await.unwrap().sidebar_open);
        assert!(!store.view("b").await.unwrap().sidebar_open);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_token() {
        let store = SessionStore::default();
        assert!(store.dispatch("nope", Action::SidebarToggled).await.is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::default();
        store.create("a", user("a@itau.com.br")).await;
        assert_eq!(store.len().await, 1);
        assert!(store.remove("a").await);
        assert!(!store.remove("a").await);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_gone() {
        let store = SessionStore::new(Duration::ZERO);
        store.create("old", user("a@itau.com.br")).await;

        assert!(store.get("old").await.is_none());
        assert!(store.dispatch("old", Action::SidebarToggled).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_login_sweeps_expired_sessions() {
        let store = SessionStore::new(Duration::from_millis(200));
        store.create("a", user("a@itau.com.br")).await;
        store.create("b", user("b@itau.com.br")).await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        store.create("c", user("c@itau.com.br")).await;
        assert_eq!(store.len().await, 1);
        assert!(store.get("c").await.is_some());
    }

    #[tokio::test]
    async fn test_live_session_survives() {
        let store = SessionStore::new(Duration::from_secs(3600));
        store.create("a", user("a@itau.com.br")).await;
        assert!(store.get("a").await.is_some());
        assert!(store.dispatch("a", Action::SidebarToggled).await.is_some());
    }
}
