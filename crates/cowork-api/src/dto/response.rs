use cowork_core::models::{BlogPost, Space};
use cowork_core::query::ContinuationToken;
use cowork_store::{SpacePage, StorageBackend};
use serde::Serialize;

/// List spaces response.
///
/// Unpaged listings carry `total`; paged listings carry `lastKey` while
/// more results remain.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceListResponse {
    pub spaces: Vec<Space>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_key: Option<ContinuationToken>,
}

impl SpaceListResponse {
    pub fn from_page(page: SpacePage, paginated: bool) -> Self {
        if paginated {
            Self { spaces: page.spaces, total: None, last_key: page.last_key }
        } else {
            Self { spaces: page.spaces, total: Some(page.total), last_key: None }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub posts: Vec<BlogPost>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub storage: StorageBackend,
}

impl HealthResponse {
    pub fn running(storage: StorageBackend) -> Self {
        Self { message: "API is running", storage }
    }
}
