use std::convert::Infallible;
use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use crate::cache::{ContentCache, Fingerprint};
use crate::config::Config;
use crate::enrichment::{
    CachedCompanyLookup, CompanyCache, CompanyFetcher, NullCompanyDirectory, PgCompanyDirectory,
};
use crate::ghost_job::reposting::{InMemoryRepostingHistory, PgRepostingHistory, RepostingHistory};
use crate::ghost_job::signals::ScoreResult;
use crate::ghost_job::GhostJobDetector;

/// Whole ghost-job results, keyed by the fingerprint of the request.
pub type ScoreCache = ContentCache<Fingerprint, ScoreResult, Infallible>;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub detector: GhostJobDetector,
    /// Written to by handlers after scoring; read by the reposting detector.
    pub history: Arc<dyn RepostingHistory>,
    pub companies: CachedCompanyLookup,
    pub score_cache: ScoreCache,
}

impl AppState {
    /// Postgres-backed collaborators when a pool is given, in-memory ones otherwise.
    pub fn new(config: Config, db: Option<PgPool>) -> Self {
        let (history, fetcher): (Arc<dyn RepostingHistory>, Arc<dyn CompanyFetcher>) = match db {
            Some(pool) => (
                Arc::new(PgRepostingHistory::new(pool.clone())),
                Arc::new(PgCompanyDirectory::new(pool)),
            ),
            None => (
                Arc::new(InMemoryRepostingHistory::new()),
                Arc::new(NullCompanyDirectory),
            ),
        };
        Self::with_collaborators(config, history, fetcher)
    }

    pub fn with_collaborators(
        config: Config,
        history: Arc<dyn RepostingHistory>,
        fetcher: Arc<dyn CompanyFetcher>,
    ) -> Self {
        let detector = GhostJobDetector::new(
            Arc::clone(&history),
            Duration::days(config.repost_lookback_days),
        );
        let companies = CachedCompanyLookup::new(
            fetcher,
            CompanyCache::with_default_ttl(config.cache_ttl),
            config.fetch_timeout,
        );
        let score_cache = ScoreCache::with_default_ttl(config.cache_ttl);

        Self {
            config,
            detector,
            history,
            companies,
            score_cache,
        }
    }
}
