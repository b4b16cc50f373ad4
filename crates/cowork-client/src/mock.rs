//! Scripted directory API for component tests

use async_trait::async_trait;
use cowork_core::models::{
    BlogPost, NewReport, PricingPackage, Report, Service, Space, SpaceDetail, SpaceId,
};
use cowork_core::query::SpaceQuery;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{DirectoryApi, HealthStatus, SpaceListing};
use crate::error::{ClientError, Result};

pub(crate) fn space(id: i64, lat: f64, lng: f64) -> Space {
    Space {
        id: SpaceId(id),
        name: format!("Space {}", id),
        city: "Berlin".to_string(),
        address: format!("Street {}", id),
        lat,
        lng,
        rating: 4.5,
        image_url: None,
        description: None,
        service_ids: ["wifi".to_string()].into_iter().collect(),
        pricing_packages: Vec::new(),
    }
}

/// Answers list queries by filtering a fixed set of spaces, after a
/// configurable latency. Failures and latencies can be queued per call.
#[derive(Default)]
pub(crate) struct MockApi {
    spaces: Vec<Space>,
    latencies: Mutex<VecDeque<Duration>>,
    failures: Mutex<VecDeque<ClientError>>,
    missing: HashSet<i64>,
    queries: Mutex<Vec<SpaceQuery>>,
    detail_calls: Mutex<Vec<SpaceId>>,
}

impl MockApi {
    pub(crate) fn new(spaces: Vec<Space>) -> Self {
        Self { spaces, ..Self::default() }
    }

    pub(crate) fn with_missing(mut self, id: i64) -> Self {
        self.missing.insert(id);
        self
    }

    pub(crate) fn queue_latency(&self, latency: Duration) {
        self.latencies.lock().unwrap().push_back(latency);
    }

    pub(crate) fn queue_failure(&self, error: ClientError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub(crate) fn queries(&self) -> Vec<SpaceQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn detail_calls(&self) -> Vec<SpaceId> {
        self.detail_calls.lock().unwrap().clone()
    }

    async fn respond(&self) -> Result<()> {
        let latency = self.latencies.lock().unwrap().pop_front();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DirectoryApi for MockApi {
    async fn list_spaces(&self, query: &SpaceQuery) -> Result<SpaceListing> {
        self.queries.lock().unwrap().push(query.clone());
        self.respond().await?;
        let spaces: Vec<Space> = self.spaces.iter().filter(|s| query.matches(s)).cloned().collect();
        Ok(SpaceListing { total: Some(spaces.len()), spaces, last_key: None })
    }

    async fn get_space(&self, id: SpaceId) -> Result<SpaceDetail> {
        self.detail_calls.lock().unwrap().push(id);
        self.respond().await?;
        if self.missing.contains(&id.0) {
            return Err(ClientError::NotFound { resource: format!("space {}", id) });
        }
        let space = self.spaces.iter().find(|s| s.id == id).cloned().unwrap_or_else(|| space(id.0, 0.0, 0.0));
        Ok(SpaceDetail { space, services: Vec::new() })
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(Vec::new())
    }

    async fn services_for_space(&self, _id: SpaceId) -> Result<Vec<Service>> {
        Ok(Vec::new())
    }

    async fn pricing_for_space(&self, _id: SpaceId) -> Result<Vec<PricingPackage>> {
        Ok(Vec::new())
    }

    async fn submit_report(&self, report: &NewReport) -> Result<Report> {
        Ok(Report::from_new(report.clone()))
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        Ok(Vec::new())
    }

    async fn get_post(&self, slug: &str) -> Result<BlogPost> {
        Err(ClientError::NotFound { resource: format!("post {}", slug) })
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus { message: "API is running".to_string(), storage: "fixture".to_string() })
    }
}
