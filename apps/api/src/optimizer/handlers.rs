//! Axum route handlers for the Optimizer API.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::handlers::{parse_uploaded_resume, UploadForm};
use crate::models::resume::{lenient, StructuredResume};
use crate::optimizer::orchestrator::OptimizationResult;
use crate::state::AppState;

const RESUME_DATA_FIELD: &str = "resumeData";
const JOB_TITLE_FIELD: &str = "jobTitle";
const JOB_DESCRIPTION_FIELD: &str = "jobDescription";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeJsonRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub resume_data: Option<StructuredResume>,
    #[serde(default, deserialize_with = "lenient")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/optimizer/optimize
///
/// Multipart: a `resume` file or a `resumeData` JSON text field, plus
/// `jobTitle` and `jobDescription`. The file wins when both are sent.
pub async fn handle_optimize_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OptimizationResult>, AppError> {
    let mut form = UploadForm::read(multipart, state.config.max_upload_bytes).await?;

    let resume = match form.file.take() {
        Some(file) => parse_uploaded_resume(file).await?,
        None => match form.field(RESUME_DATA_FIELD).filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => serde_json::from_str::<StructuredResume>(raw)
                .map_err(|e| AppError::Validation(format!("resumeData is not valid JSON: {e}")))?,
            None => {
                return Err(AppError::Validation(
                    "Please upload a resume file or provide resume data in the request body"
                        .to_string(),
                ))
            }
        },
    };

    let job_title = form.field(JOB_TITLE_FIELD).unwrap_or_default();
    let jd_text = form.field(JOB_DESCRIPTION_FIELD).unwrap_or_default();

    Ok(Json(run_optimization(&state, resume, jd_text, job_title).await))
}

/// POST /api/optimizer/optimize-json
///
/// JSON body `{resumeData, jobTitle, jobDescription}`.
pub async fn handle_optimize_json(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeJsonRequest>, JsonRejection>,
) -> Result<Json<OptimizationResult>, AppError> {
    let Json(request) = payload?;
    let resume = request
        .resume_data
        .ok_or_else(|| AppError::Validation("resumeData is required".to_string()))?;

    let job_title = request.job_title.unwrap_or_default();
    let jd_text = request.job_description.unwrap_or_default();

    Ok(Json(run_optimization(&state, resume, &jd_text, &job_title).await))
}

async fn run_optimization(
    state: &AppState,
    resume: StructuredResume,
    jd_text: &str,
    job_title: &str,
) -> OptimizationResult {
    let resume = resume.migrated();
    info!(
        "Optimizing résumé for {:?} (generative backend: {})",
        job_title,
        state.orchestrator.has_generative()
    );
    state.orchestrator.optimize(&resume, jd_text, job_title).await
}
