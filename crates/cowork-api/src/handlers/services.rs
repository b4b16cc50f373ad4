use std::sync::Arc;

use axum::{extract::State, Json};
use cowork_core::models::Service;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, ApiError> {
    Ok(Json(state.store.list_services().await?))
}
