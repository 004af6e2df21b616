//! Reposting history: how often a posting URL has been seen, on how many
//! distinct days.
//!
//! The engine depends only on the `RepostingHistory` trait; storage lives in
//! whichever implementation `AppState` is built with.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

/// Default lookback for repost counting.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // For stores that are not sqlx-backed.
    #[allow(dead_code)]
    #[error("History unavailable: {0}")]
    Unavailable(String),
}

/// One sighting of a posting. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepostHistoryRecord {
    pub source_url: String,
    pub observed_at: DateTime<Utc>,
}

#[async_trait]
pub trait RepostingHistory: Send + Sync {
    /// Number of distinct calendar dates (UTC) on which `source_url` was
    /// observed within `lookback` of now.
    async fn count_distinct_dates(
        &self,
        source_url: &str,
        lookback: Duration,
    ) -> Result<u32, HistoryError>;

    async fn record_observation(
        &self,
        source_url: &str,
        observed_at: DateTime<Utc>,
    ) -> Result<(), HistoryError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

pub struct PgRepostingHistory {
    pool: PgPool,
}

impl PgRepostingHistory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RepostingHistory for PgRepostingHistory {
    async fn count_distinct_dates(
        &self,
        source_url: &str,
        lookback: Duration,
    ) -> Result<u32, HistoryError> {
        let since = Utc::now() - lookback;
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT (observed_at AT TIME ZONE 'UTC')::date)
            FROM job_postings_history
            WHERE source_url = $1 AND observed_at >= $2
            "#,
        )
        .bind(source_url.trim())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn record_observation(
        &self,
        source_url: &str,
        observed_at: DateTime<Utc>,
    ) -> Result<(), HistoryError> {
        sqlx::query("INSERT INTO job_postings_history (source_url, observed_at) VALUES ($1, $2)")
            .bind(source_url.trim())
            .bind(observed_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (no database configured, and tests)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRepostingHistory {
    records: Mutex<Vec<RepostHistoryRecord>>,
}

impl InMemoryRepostingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_records(records: Vec<RepostHistoryRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl RepostingHistory for InMemoryRepostingHistory {
    async fn count_distinct_dates(
        &self,
        source_url: &str,
        lookback: Duration,
    ) -> Result<u32, HistoryError> {
        let url = source_url.trim();
        let since = Utc::now() - lookback;
        let mut dates: Vec<NaiveDate> = self
            .records
            .lock()
            .iter()
            .filter(|r| r.source_url == url && r.observed_at >= since)
            .map(|r| r.observed_at.date_naive())
            .collect();
        dates.sort_unstable();
        dates.dedup();
        Ok(dates.len() as u32)
    }

    async fn record_observation(
        &self,
        source_url: &str,
        observed_at: DateTime<Utc>,
    ) -> Result<(), HistoryError> {
        self.records.lock().push(RepostHistoryRecord {
            source_url: source_url.trim().to_string(),
            observed_at,
        });
        Ok(())
    }
}
