use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

/// # GET /health
/// Liveness only: answers 200 whether or not the database is reachable.
pub async fn health_check() -> impl IntoResponse {
    let body = json!({
        "status": "OK",
        "message": "API Running",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    });
    (StatusCode::OK, Json(body))
}
