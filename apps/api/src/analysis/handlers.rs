//! Axum route handlers for JD analysis and ATS scoring.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::keywords::{extract_jd_keywords, JdKeywordSet};
use crate::analysis::scoring::score_report;
use crate::errors::AppError;
use crate::models::resume::{lenient, StructuredResume};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Non-string `jd` values read as absent.
#[derive(Debug, Deserialize)]
pub struct AnalyzeJdRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub jd: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AtsScoreRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub resume: Option<StructuredResume>,
    #[serde(default, deserialize_with = "lenient")]
    pub jd: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreResponse {
    pub score: u8,
    pub matched_terms: Vec<String>,
    pub missing_terms: Vec<String>,
    pub recommendation: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resume/jd/analyze
///
/// Returns the skill, keyword and action-verb sets of a JD. A missing or empty
/// JD yields empty sets.
pub async fn handle_analyze_jd(
    payload: Result<Json<AnalyzeJdRequest>, JsonRejection>,
) -> Result<Json<JdKeywordSet>, AppError> {
    let Json(request) = payload?;
    let jd = request.jd.unwrap_or_default();
    Ok(Json(extract_jd_keywords(&jd)))
}

/// POST /api/resume/ats-score
///
/// Scores a résumé against a JD. Legacy résumé shapes are migrated first.
pub async fn handle_ats_score(
    payload: Result<Json<AtsScoreRequest>, JsonRejection>,
) -> Result<Json<AtsScoreResponse>, AppError> {
    let Json(request) = payload?;
    let resume = request.resume.unwrap_or_default().migrated();
    let report = score_report(&resume, &request.jd.unwrap_or_default());

    Ok(Json(AtsScoreResponse {
        score: report.overall_score,
        matched_terms: report.matched_terms,
        missing_terms: report.missing_terms,
        recommendation: report.recommendation,
    }))
}
