mod cache;
mod config;
mod content_risk;
mod db;
mod enrichment;
mod errors;
mod ghost_job;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::routes::build_router;
use crate::state::AppState;

/// How often expired cache entries are reclaimed.
const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobSignal API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL is optional: without it, history and company data stay in memory
    let db = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Some(pool)
        }
        None => {
            info!("DATABASE_URL not set, using in-memory reposting history");
            None
        }
    };

    info!(
        "Cache TTL {}s, reposting lookback {} days",
        config.cache_ttl.as_secs(),
        config.repost_lookback_days
    );

    let state = AppState::new(config, db);
    info!("Ghost-job detectors: {:?}", state.detector.detector_names());

    spawn_cache_sweeper(state.clone());

    let app = build_router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", state.config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Reclaims memory held by expired cache entries. Reads never depend on it.
fn spawn_cache_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CACHE_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = state.score_cache.purge_expired() + state.companies.purge_expired();
            if purged > 0 {
                info!(
                    purged,
                    live_scores = state.score_cache.len(),
                    "Purged expired cache entries"
                );
            }
        }
    });
}
