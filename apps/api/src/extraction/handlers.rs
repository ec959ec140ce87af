//! Axum route handlers for résumé extraction.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::decode::decode_document;
use crate::extraction::parser::extract_resume_data;
use crate::models::resume::{lenient, StructuredResume};
use crate::state::AppState;

/// Multipart field carrying the résumé file.
pub const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub text: String,
}

/// An uploaded file held in memory.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// A drained multipart form: the résumé file (if any) plus text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Reads every field. The `resume` field is kept as bytes; the rest as text.
    pub async fn read(mut multipart: Multipart, max_file_bytes: usize) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == RESUME_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if bytes.len() > max_file_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Résumé file exceeds {max_file_bytes} bytes"
                    )));
                }
                form.file = Some(UploadedFile { file_name, bytes });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Decodes an uploaded file and parses it. Decoding runs on the blocking pool.
pub async fn parse_uploaded_resume(file: UploadedFile) -> Result<StructuredResume, AppError> {
    let UploadedFile { file_name, bytes } = file;
    info!("Parsing uploaded résumé {} ({} bytes)", file_name, bytes.len());

    let text = tokio::task::spawn_blocking(move || decode_document(&file_name, &bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Decode task failed: {e}")))??;

    Ok(extract_resume_data(&text))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resume/parse
///
/// Multipart upload (`resume` field: PDF, DOCX or TXT) → structured résumé.
pub async fn handle_parse_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StructuredResume>, AppError> {
    let form = UploadForm::read(multipart, state.config.max_upload_bytes).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    Ok(Json(parse_uploaded_resume(file).await?))
}

/// POST /api/resume/parse-text
///
/// Already-decoded résumé text → structured résumé. Empty text yields defaults.
pub async fn handle_parse_text(
    payload: Result<Json<ParseTextRequest>, JsonRejection>,
) -> Result<Json<StructuredResume>, AppError> {
    let Json(request) = payload?;
    Ok(Json(extract_resume_data(&request.text)))
}
