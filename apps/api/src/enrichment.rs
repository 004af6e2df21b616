//! Company enrichment lookup: the cached front of the "fetch company data"
//! collaborator.
//!
//! Lookups are keyed by the fingerprint of the company name, so "Acme Corp"
//! and " acme  corp" share one cache entry and one in-flight fetch.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{fingerprint, ContentCache, Fingerprint};
use crate::models::job::{CompanyEnrichment, NewsItem};

/// Cloneable so a single failure can be handed to every waiter of a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Company not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Company lookup timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for FetchError {
    fn from(e: sqlx::Error) -> Self {
        FetchError::Upstream(e.to_string())
    }
}

pub type CompanyCache = ContentCache<Fingerprint, CompanyEnrichment, FetchError>;

#[async_trait]
pub trait CompanyFetcher: Send + Sync {
    async fn fetch(&self, company_name: &str) -> Result<CompanyEnrichment, FetchError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Cached lookup
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct CachedCompanyLookup {
    fetcher: Arc<dyn CompanyFetcher>,
    cache: CompanyCache,
    timeout: Duration,
}

impl CachedCompanyLookup {
    pub fn new(fetcher: Arc<dyn CompanyFetcher>, cache: CompanyCache, timeout: Duration) -> Self {
        Self {
            fetcher,
            cache,
            timeout,
        }
    }

    /// Cached fetch. Errors (including the fetch deadline) are returned as-is
    /// and never cached.
    pub async fn lookup(&self, company_name: &str) -> Result<CompanyEnrichment, FetchError> {
        let key = fingerprint(company_name);
        let fetcher = Arc::clone(&self.fetcher);
        let name = company_name.trim().to_string();
        let timeout = self.timeout;

        self.cache
            .get_or_load_default(key, move || async move {
                match tokio::time::timeout(timeout, fetcher.fetch(&name)).await {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout(timeout)),
                }
            })
            .await
    }

    /// Drops expired company profiles; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }

    /// Lookup that degrades to a name-only profile instead of failing.
    pub async fn lookup_or_minimal(&self, company_name: &str) -> CompanyEnrichment {
        match self.lookup(company_name).await {
            Ok(company) => company,
            Err(e) => {
                warn!("Company enrichment unavailable for '{company_name}', using minimal profile: {e}");
                CompanyEnrichment::minimal(company_name)
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fetchers
// ────────────────────────────────────────────────────────────────────────────

/// Reads enrichment previously stored in the `company_profiles` table.
pub struct PgCompanyDirectory {
    pool: PgPool,
}

impl PgCompanyDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CompanyProfileRow {
    name: String,
    website: Option<String>,
    description: Option<String>,
    industry: Option<String>,
    recent_news: Json<Vec<NewsItem>>,
    notable_products: Vec<String>,
}

impl From<CompanyProfileRow> for CompanyEnrichment {
    fn from(row: CompanyProfileRow) -> Self {
        CompanyEnrichment {
            name: Some(row.name),
            website: row.website,
            description: row.description,
            industry: row.industry,
            recent_news: row.recent_news.0,
            notable_products: row.notable_products,
        }
    }
}

#[async_trait]
impl CompanyFetcher for PgCompanyDirectory {
    async fn fetch(&self, company_name: &str) -> Result<CompanyEnrichment, FetchError> {
        let row: Option<CompanyProfileRow> = sqlx::query_as(
            r#"
            SELECT name, website, description, industry, recent_news, notable_products
            FROM company_profiles
            WHERE lower(name) = lower($1)
            LIMIT 1
            "#,
        )
        .bind(company_name.trim())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                info!("Loaded company profile for '{company_name}'");
                Ok(row.into())
            }
            None => Err(FetchError::NotFound(company_name.to_string())),
        }
    }
}

/// Used when no database is configured: every lookup is a miss.
pub struct NullCompanyDirectory;

#[async_trait]
impl CompanyFetcher for NullCompanyDirectory {
    async fn fetch(&self, company_name: &str) -> Result<CompanyEnrichment, FetchError> {
        Err(FetchError::NotFound(company_name.to_string()))
    }
}
