mod auth;
mod bff_client;
mod config;
mod dashboard;
mod errors;
mod format;
mod models;
mod routes;
mod sentiment;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::sessions::SessionStore;
use crate::bff_client::BffClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::sentiment::classifier::KeywordClassifier;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "review_dashboard={},tower_http={}",
                &config.rust_log, &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting review dashboard v{}", env!("CARGO_PKG_VERSION"));

    let bff = BffClient::new(&config)?;
    info!(
        "BFF client initialized (base: {}, timeout: {:?})",
        config.bff_base_url, config.http_timeout
    );

    let classifier = Arc::new(KeywordClassifier);
    if config.local_sentiment_fallback {
        info!("Local sentiment fallback enabled (classifier: keyword)");
    }

    let state = AppState {
        bff: Arc::new(bff),
        classifier,
        sessions: SessionStore::new(config.session_ttl),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
