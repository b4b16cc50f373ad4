use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use cowork_core::models::Report;
use serde_json::Value;

use crate::error::ApiError;
use crate::services::DirectoryService;
use crate::state::AppState;

/// Accepts any body and parses it here, so malformed JSON gets the same
/// error envelope as every other failure.
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Report>), ApiError> {
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Request body must be valid JSON: {}", e)))?;

    let report = DirectoryService::submit_report(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(report)))
}
