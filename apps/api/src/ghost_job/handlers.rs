//! Axum route handlers for the Ghost-Job API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::fingerprint_json;
use crate::errors::AppError;
use crate::ghost_job::signals::ScoreResult;
use crate::models::job::{AnalysisInput, CompanyEnrichment, JobAnalysis};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhostJobRequest {
    pub job: JobAnalysis,
    /// Already-enriched company data. Takes precedence over `company_name`.
    #[serde(default)]
    pub company: Option<CompanyEnrichment>,
    /// Looked up through the cached company directory when `company` is absent.
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ghost-job
///
/// Scores a parsed job posting. Results without a source URL are cached by
/// request fingerprint; with a URL the reposting count depends on time, so
/// the posting is scored fresh and the sighting is recorded afterwards.
pub async fn handle_detect_ghost_job(
    State(state): State<AppState>,
    Json(request): Json<GhostJobRequest>,
) -> Result<Json<ScoreResult>, AppError> {
    if request.job.is_blank() {
        return Err(AppError::Validation(
            "job must include a title, keywords or problems to solve".to_string(),
        ));
    }

    let company = match (request.company, request.company_name.as_deref()) {
        (Some(company), _) => Some(company),
        (None, Some(name)) if !name.trim().is_empty() => {
            Some(state.companies.lookup_or_minimal(name).await)
        }
        _ => None,
    };
    let source_url = request
        .source_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let input = AnalysisInput {
        job: request.job,
        company,
        source_url,
    };

    let result = if let Some(url) = input.source_url.clone() {
        let result = state.detector.detect_ghost_job(&input).await;
        if let Err(e) = state.history.record_observation(&url, Utc::now()).await {
            warn!("Failed to record sighting of {url}: {e}");
        }
        result
    } else {
        let key = fingerprint_json(&input);
        let detector = state.detector.clone();
        let loaded = state
            .score_cache
            .get_or_load_default(key, move || async move {
                Ok(detector.detect_ghost_job(&input).await)
            })
            .await;
        match loaded {
            Ok(result) => result,
            Err(never) => match never {},
        }
    };

    Ok(Json(result))
}
