use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use cowork_core::models::{PricingPackage, Service, SpaceDetail, SpaceId};

use crate::dto::SpaceListResponse;
use crate::error::ApiError;
use crate::services::DirectoryService;
use crate::state::AppState;

pub async fn list_spaces(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<SpaceListResponse>, ApiError> {
    DirectoryService::list_spaces(&state, params).await.map(Json)
}

pub async fn get_space(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SpaceDetail>, ApiError> {
    let id: SpaceId = id.parse()?;
    tracing::info!(space_id = %id, "Fetching space");

    DirectoryService::get_space(&state, id).await.map(Json)
}

pub async fn services_for_space(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let id: SpaceId = id.parse()?;
    Ok(Json(state.store.services_for_space(id).await?))
}

pub async fn pricing_for_space(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PricingPackage>>, ApiError> {
    let id: SpaceId = id.parse()?;
    Ok(Json(state.store.pricing_for_space(id).await?))
}
