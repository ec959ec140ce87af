pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::optimizer::handlers as optimizer;
use crate::state::AppState;

/// Room for multipart framing and text fields on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/api/health", get(health::health_handler))
        // Résumé API
        .route("/api/resume/parse", post(extraction::handle_parse_upload))
        .route("/api/resume/parse-text", post(extraction::handle_parse_text))
        .route("/api/resume/jd/analyze", post(analysis::handle_analyze_jd))
        .route("/api/resume/ats-score", post(analysis::handle_ats_score))
        // Optimizer API
        .route("/api/optimizer/optimize", post(optimizer::handle_optimize_upload))
        .route("/api/optimizer/optimize-json", post(optimizer::handle_optimize_json))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
