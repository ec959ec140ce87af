use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
/// Returns a simple status object with service version and server time.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
