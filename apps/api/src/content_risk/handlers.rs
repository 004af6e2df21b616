//! Axum route handlers for the Content-Risk API.

use axum::Json;
use serde::Deserialize;

use crate::content_risk::assess_content_risk;
use crate::content_risk::flagger::RiskAssessment;
use crate::models::cv::{GeneratedContent, OriginalProfile};

#[derive(Debug, Deserialize)]
pub struct ContentRiskRequest {
    pub generated: GeneratedContent,
    #[serde(default)]
    pub original: OriginalProfile,
}

/// POST /api/v1/content-risk
///
/// Flags generated résumé statements likely to be challenged in an interview.
pub async fn handle_assess_content_risk(
    Json(request): Json<ContentRiskRequest>,
) -> Json<RiskAssessment> {
    Json(assess_content_risk(&request.generated, &request.original))
}
