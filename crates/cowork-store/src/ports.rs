use async_trait::async_trait;
use cowork_core::error::Result;
use cowork_core::models::{BlogPost, NewReport, PricingPackage, Report, Service, Space, SpaceId};
use cowork_core::query::{ContinuationToken, SpaceQuery};
use serde::Serialize;
use std::fmt;

/// Which adapter is serving the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fixture,
    Postgres,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Fixture => f.write_str("fixture"),
            StorageBackend::Postgres => f.write_str("postgres"),
        }
    }
}

/// One page of a space listing
#[derive(Debug, Clone, PartialEq)]
pub struct SpacePage {
    pub spaces: Vec<Space>,

    /// Number of spaces matching the query before paging
    pub total: usize,

    /// Present when more results follow
    pub last_key: Option<ContinuationToken>,
}

/// Port for directory storage operations
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Adapter kind, reported by the health endpoint
    fn backend(&self) -> StorageBackend;

    /// List spaces matching the query, each with its pricing packages
    async fn list_spaces(&self, query: &SpaceQuery) -> Result<SpacePage>;

    /// Get one space with its pricing packages
    async fn get_space(&self, id: SpaceId) -> Result<Option<Space>>;

    /// The full service catalog
    async fn list_services(&self) -> Result<Vec<Service>>;

    /// Catalog entries offered by a space; empty when the space is unknown
    async fn services_for_space(&self, id: SpaceId) -> Result<Vec<Service>>;

    /// Pricing packages of a space, ordered by id
    async fn pricing_for_space(&self, id: SpaceId) -> Result<Vec<PricingPackage>>;

    /// Store a report with `pending` status.
    ///
    /// The caller is responsible for checking that the space exists.
    async fn create_report(&self, report: NewReport) -> Result<Report>;

    /// All blog posts, newest first
    async fn list_posts(&self) -> Result<Vec<BlogPost>>;

    /// A single blog post by slug
    async fn get_post(&self, slug: &str) -> Result<Option<BlogPost>>;
}
