//! Port for directory API access

use async_trait::async_trait;
use cowork_core::models::{BlogPost, NewReport, PricingPackage, Report, Service, Space, SpaceDetail, SpaceId};
use cowork_core::query::{ContinuationToken, SpaceQuery};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Response of the list spaces endpoint.
///
/// `total` is present on unpaged listings, `last_key` on paged listings
/// with more results to fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceListing {
    pub spaces: Vec<Space>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_key: Option<ContinuationToken>,
}

/// Response of the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
    pub storage: String,
}

/// Directory operations used by the discovery components and the CLI
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_spaces(&self, query: &SpaceQuery) -> Result<SpaceListing>;

    /// Fails with `ClientError::NotFound` for unknown ids
    async fn get_space(&self, id: SpaceId) -> Result<SpaceDetail>;

    async fn list_services(&self) -> Result<Vec<Service>>;

    async fn services_for_space(&self, id: SpaceId) -> Result<Vec<Service>>;

    async fn pricing_for_space(&self, id: SpaceId) -> Result<Vec<PricingPackage>>;

    async fn submit_report(&self, report: &NewReport) -> Result<Report>;

    async fn list_posts(&self) -> Result<Vec<BlogPost>>;

    async fn get_post(&self, slug: &str) -> Result<BlogPost>;

    async fn health(&self) -> Result<HealthStatus>;
}
