use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use cowork_core::error::CoworkError;
use cowork_core::models::BlogPost;

use crate::dto::PostsResponse;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PostsResponse>, ApiError> {
    let posts = state.store.list_posts().await?;
    Ok(Json(PostsResponse { posts }))
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    let post = state.store.get_post(&slug).await?.ok_or(CoworkError::PostNotFound { slug })?;
    Ok(Json(post))
}
