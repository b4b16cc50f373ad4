//! In-memory directory store for development and testing.
//!
//! Spaces and pricing packages are kept as separate collections and joined
//! on read, like the table-backed store. Mutations (reports) live only as
//! long as the process.

use async_trait::async_trait;
use cowork_core::error::{CoworkError, Result};
use cowork_core::models::post::sort_newest_first;
use cowork_core::models::{
    BlogPost, NewReport, PricingPackage, Report, Service, Space, SpaceDetail, SpaceId,
};
use cowork_core::query::SpaceQuery;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::fixtures;
use crate::pagination::paginate;
use crate::ports::{DirectoryStore, SpacePage, StorageBackend};

/// In-memory implementation of DirectoryStore
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectoryStore {
    spaces: Arc<RwLock<Vec<Space>>>,
    pricing: Arc<RwLock<Vec<PricingPackage>>>,
    services: Arc<RwLock<Vec<Service>>>,
    reports: Arc<RwLock<Vec<Report>>>,
    posts: Arc<RwLock<Vec<BlogPost>>>,
}

impl MemoryDirectoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the bundled fixtures
    pub fn seeded() -> Self {
        Self::with_data(
            fixtures::spaces(),
            fixtures::pricing_packages(),
            fixtures::services(),
            fixtures::posts(),
        )
    }

    pub fn with_data(
        spaces: Vec<Space>,
        pricing: Vec<PricingPackage>,
        services: Vec<Service>,
        posts: Vec<BlogPost>,
    ) -> Self {
        Self {
            spaces: Arc::new(RwLock::new(spaces)),
            pricing: Arc::new(RwLock::new(pricing)),
            services: Arc::new(RwLock::new(services)),
            reports: Arc::new(RwLock::new(Vec::new())),
            posts: Arc::new(RwLock::new(posts)),
        }
    }

    /// Reports submitted during this process lifetime
    pub fn reports(&self) -> Result<Vec<Report>> {
        Ok(read(&self.reports)?.clone())
    }

    /// Spaces with their pricing packages attached
    fn joined_spaces(&self) -> Result<Vec<Space>> {
        let spaces = read(&self.spaces)?;
        let pricing = read(&self.pricing)?;

        Ok(spaces.iter().map(|space| with_pricing(space.clone(), &pricing)).collect())
    }
}

fn with_pricing(mut space: Space, pricing: &[PricingPackage]) -> Space {
    let mut packages: Vec<PricingPackage> =
        pricing.iter().filter(|p| p.space_id == space.id).cloned().collect();
    packages.sort_by_key(|p| p.id);
    space.pricing_packages = packages;
    space
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| CoworkError::Storage("fixture store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| CoworkError::Storage("fixture store lock poisoned".to_string()))
}

#[async_trait]
impl DirectoryStore for MemoryDirectoryStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Fixture
    }

    async fn list_spaces(&self, query: &SpaceQuery) -> Result<SpacePage> {
        let matches: Vec<Space> =
            self.joined_spaces()?.into_iter().filter(|space| query.matches(space)).collect();
        paginate(matches, query)
    }

    async fn get_space(&self, id: SpaceId) -> Result<Option<Space>> {
        let space = read(&self.spaces)?.iter().find(|s| s.id == id).cloned();
        match space {
            Some(space) => Ok(Some(with_pricing(space, &read(&self.pricing)?))),
            None => Ok(None),
        }
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(read(&self.services)?.clone())
    }

    async fn services_for_space(&self, id: SpaceId) -> Result<Vec<Service>> {
        let Some(space) = read(&self.spaces)?.iter().find(|s| s.id == id).cloned() else {
            return Ok(Vec::new());
        };
        Ok(SpaceDetail::resolve(space, &read(&self.services)?).services)
    }

    async fn pricing_for_space(&self, id: SpaceId) -> Result<Vec<PricingPackage>> {
        let mut packages: Vec<PricingPackage> =
            read(&self.pricing)?.iter().filter(|p| p.space_id == id).cloned().collect();
        packages.sort_by_key(|p| p.id);
        Ok(packages)
    }

    async fn create_report(&self, report: NewReport) -> Result<Report> {
        let report = Report::from_new(report);
        write(&self.reports)?.push(report.clone());
        Ok(report)
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        let mut posts = read(&self.posts)?.clone();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn get_post(&self, slug: &str) -> Result<Option<BlogPost>> {
        Ok(read(&self.posts)?.iter().find(|p| p.slug == slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cowork_core::models::{ChangeType, FilterCriteria, MapBounds, MinRating, ReportStatus};

    fn berlin() -> MapBounds {
        MapBounds::new(52.7, 52.3, 13.8, 13.0).unwrap()
    }

    fn ids(page: &SpacePage) -> Vec<i64> {
        page.spaces.iter().map(|s| s.id.0).collect()
    }

    #[tokio::test]
    async fn test_list_without_filters_returns_every_space_with_pricing() {
        let store = MemoryDirectoryStore::seeded();

        let page = store.list_spaces(&SpaceQuery::default()).await.unwrap();

        assert_eq!(page.total, fixtures::spaces().len());
        assert_eq!(page.spaces.len(), page.total);
        let popup = page.spaces.iter().find(|s| s.id == SpaceId(8)).unwrap();
        assert!(popup.pricing_packages.is_empty());
        let factory = page.spaces.iter().find(|s| s.id == SpaceId(1)).unwrap();
        assert_eq!(factory.pricing_packages.len(), 3);
    }

    #[tokio::test]
    async fn test_list_applies_bounds() {
        let store = MemoryDirectoryStore::seeded();
        let query = SpaceQuery::new(FilterCriteria::new(), Some(berlin()));

        let page = store.list_spaces(&query).await.unwrap();

        assert_eq!(ids(&page), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let store = MemoryDirectoryStore::seeded();

        let rated = SpaceQuery::new(FilterCriteria::new().with_min_rating(MinRating::Four), None);
        let page = store.list_spaces(&rated).await.unwrap();
        assert!(page.spaces.iter().all(|s| s.rating >= 4.0));
        assert!(!ids(&page).contains(&4));

        let cheap = SpaceQuery::new(FilterCriteria::new().with_price_range(None, Some(15.0)), None);
        assert_eq!(ids(&store.list_spaces(&cheap).await.unwrap()), vec![4, 5]);

        let parking = SpaceQuery::new(FilterCriteria::new().with_service("parking"), None);
        assert_eq!(ids(&store.list_spaces(&parking).await.unwrap()), vec![5]);

        let lisbon = SpaceQuery::new(FilterCriteria::new().with_location("lisboa"), None);
        assert_eq!(ids(&store.list_spaces(&lisbon).await.unwrap()), vec![3, 4]);
    }

    #[tokio::test]
    async fn test_get_space() {
        let store = MemoryDirectoryStore::seeded();

        let space = store.get_space(SpaceId(3)).await.unwrap().unwrap();
        assert_eq!(space.name, "Second Home Lisboa");
        assert_eq!(space.pricing_packages.len(), 2);

        assert!(store.get_space(SpaceId(999_999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_services_for_space() {
        let store = MemoryDirectoryStore::seeded();

        let services = store.services_for_space(SpaceId(4)).await.unwrap();
        let tags: Vec<_> = services.iter().map(|s| s.service_id.as_str()).collect();
        assert_eq!(tags, vec!["wifi", "kitchen"]);

        assert!(store.services_for_space(SpaceId(42)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pricing_for_space() {
        let store = MemoryDirectoryStore::seeded();
        let pricing = store.pricing_for_space(SpaceId(7)).await.unwrap();
        assert_eq!(pricing.len(), 3);
        assert!(pricing.iter().all(|p| p.space_id == SpaceId(7)));
        assert!(store.pricing_for_space(SpaceId(8)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reports_are_pending_and_not_deduplicated() {
        let store = MemoryDirectoryStore::seeded();
        let submission = NewReport::new(SpaceId(2), ChangeType::Hours);

        let first = store.create_report(submission.clone()).await.unwrap();
        let second = store.create_report(submission).await.unwrap();

        assert_eq!(first.status, ReportStatus::Pending);
        assert_ne!(first.id, second.id);
        assert_eq!(store.reports().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_posts_newest_first() {
        let store = MemoryDirectoryStore::seeded();

        let posts = store.list_posts().await.unwrap();
        assert_eq!(posts[0].slug, "working-remotely-from-lisbon");
        assert!(posts.windows(2).all(|w| w[0].published_at >= w[1].published_at));

        assert!(store.get_post("day-pass-vs-monthly").await.unwrap().is_some());
        assert!(store.get_post("no-such-post").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryDirectoryStore::seeded();
        let clone = store.clone();

        clone.create_report(NewReport::new(SpaceId(1), ChangeType::Other)).await.unwrap();

        assert_eq!(store.reports().unwrap().len(), 1);
    }
}
