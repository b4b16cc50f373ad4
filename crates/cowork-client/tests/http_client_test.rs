use std::sync::Arc;
use std::time::Duration;

use cowork_api::{create_router, AppState};
use cowork_client::{
    ClientError, DetailFetcher, DetailStatus, DirectoryApi, FilterStore, HttpDirectoryClient,
    SpaceQueryCoordinator, ViewportTracker,
};
use cowork_core::models::{ChangeType, FilterCriteria, MapBounds, MinRating, NewReport, SpaceId};
use cowork_core::query::SpaceQuery;

/// Serve the fixture-backed API on an ephemeral port
async fn serve(base_path: Option<&'static str>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(Arc::new(AppState::fixtures()), base_path);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}{}", addr, base_path.unwrap_or(""))
}

fn berlin() -> MapBounds {
    MapBounds::new(52.7, 52.3, 13.8, 13.0).unwrap()
}

#[tokio::test]
async fn test_list_spaces_over_http() {
    let client = HttpDirectoryClient::new(&serve(None).await).unwrap();

    let all = client.list_spaces(&SpaceQuery::default()).await.unwrap();
    assert_eq!(all.total, Some(8));

    let filters = FilterCriteria::new().with_min_rating(MinRating::Four).with_service("wifi");
    let query = SpaceQuery::new(filters, Some(berlin()));
    let listing = client.list_spaces(&query).await.unwrap();
    let ids: Vec<i64> = listing.spaces.iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_paging_round_trip() {
    let client = HttpDirectoryClient::new(&serve(None).await).unwrap();

    let first = client.list_spaces(&SpaceQuery::default().with_page(3, None)).await.unwrap();
    assert_eq!(first.spaces.len(), 3);
    assert!(first.total.is_none());

    let next = SpaceQuery::default().with_page(3, first.last_key);
    let second = client.list_spaces(&next).await.unwrap();
    assert_eq!(second.spaces[0].id, SpaceId(4));
}

#[tokio::test]
async fn test_not_found_and_bad_request_are_distinct() {
    let client = HttpDirectoryClient::new(&serve(None).await).unwrap().with_retries(2);

    let err = client.get_space(SpaceId(999_999)).await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.get_post("missing").await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.submit_report(&NewReport::new(SpaceId(999_999), ChangeType::Closed)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_detail_report_and_catalog() {
    let client = HttpDirectoryClient::new(&serve(None).await).unwrap().with_api_key("test-key");

    let detail = client.get_space(SpaceId(3)).await.unwrap();
    assert_eq!(detail.space.city, "Lisbon");
    assert_eq!(detail.services.len(), 5);

    assert_eq!(client.list_services().await.unwrap().len(), 10);
    assert_eq!(client.services_for_space(SpaceId(4)).await.unwrap().len(), 2);
    assert_eq!(client.pricing_for_space(SpaceId(7)).await.unwrap().len(), 3);

    let mut report = NewReport::new(SpaceId(3), ChangeType::Pricing);
    report.corrected_info = Some("Day pass is now 32 EUR".to_string());
    let stored = client.submit_report(&report).await.unwrap();
    assert_eq!(stored.space_id, SpaceId(3));
    assert_eq!(stored.corrected_info.as_deref(), Some("Day pass is now 32 EUR"));

    let posts = client.list_posts().await.unwrap();
    assert_eq!(posts.len(), 3);
    let health = client.health().await.unwrap();
    assert_eq!(health.storage, "fixture");
}

#[tokio::test]
async fn test_base_path_is_kept() {
    let client = HttpDirectoryClient::new(&serve(Some("/prod")).await).unwrap();
    assert_eq!(client.health().await.unwrap().message, "API is running");
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpDirectoryClient::new(&format!("http://{}", addr)).unwrap();
    let err = client.list_services().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn test_discovery_components_against_server() {
    let api: Arc<dyn DirectoryApi> = Arc::new(HttpDirectoryClient::new(&serve(None).await).unwrap());
    let filters = FilterStore::with_auto_apply(Duration::from_millis(50));
    let viewport = ViewportTracker::new();
    let coordinator = SpaceQueryCoordinator::new(Arc::clone(&api));
    coordinator.attach(&filters, &viewport);

    let mut results = coordinator.subscribe();
    viewport.map_ready(berlin());

    let loaded = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            results.changed().await.unwrap();
            let current = results.borrow_and_update().clone();
            if current.is_enabled() && !current.is_loading {
                return current;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(loaded.spaces.len(), 2);
    assert!(loaded.error.is_none());

    let detail = DetailFetcher::new(api);
    let mut status = detail.subscribe();
    detail.open(Some(SpaceId(1)));
    let loaded = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            status.changed().await.unwrap();
            let current = status.borrow_and_update().clone();
            if !matches!(current, DetailStatus::Loading(_)) {
                return current;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(loaded.detail().unwrap().space.name, "Factory Görlitzer Park");
}
