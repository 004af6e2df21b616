pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::content_risk::handlers as content_risk;
use crate::ghost_job::handlers as ghost_job;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/ghost-job", post(ghost_job::handle_detect_ghost_job))
        .route(
            "/api/v1/content-risk",
            post(content_risk::handle_assess_content_risk),
        )
        .with_state(state)
}
