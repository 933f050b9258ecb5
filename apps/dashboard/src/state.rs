use std::sync::Arc;

use crate::auth::sessions::SessionStore;
use crate::bff_client::BffSource;
use crate::config::Config;
use crate::sentiment::classifier::SentimentClassifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The only path to the remote analytics API.
    pub bff: Arc<dyn BffSource>,
    /// Local fallback classifier. Default: KeywordClassifier.
    pub classifier: Arc<dyn SentimentClassifier>,
    pub sessions: SessionStore,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(bff: crate::testing::FakeBff) -> Self {
        Self::for_tests_shared(Arc::new(bff))
    }

    pub fn for_tests_shared(bff: Arc<crate::testing::FakeBff>) -> Self {
        AppState {
            bff,
            classifier: Arc::new(crate::sentiment::classifier::KeywordClassifier),
            sessions: SessionStore::default(),
            config: Config::default(),
        }
    }
}
