//! Space query coordination
//!
//! Combines the applied filters with the debounced map bounds into a space
//! query, serves repeated keys from cache and makes sure that only the
//! response to the newest request is ever published.

use cowork_core::models::{FilterCriteria, MapBounds, Space};
use cowork_core::query::{ContinuationToken, QueryKey, SpaceQuery};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{DirectoryApi, SpaceListing};
use crate::debounce::Debouncer;
use crate::error::{ClientError, Result};
use crate::filters::FilterStore;
use crate::viewport::ViewportTracker;

/// Delay between the last bounds change and the query it triggers
pub const DEFAULT_BOUNDS_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Tuning knobs of a coordinator
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    pub bounds_debounce: Duration,

    /// Page size sent with every query; `None` requests unpaged listings
    pub page_limit: Option<usize>,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self { bounds_debounce: DEFAULT_BOUNDS_DEBOUNCE, page_limit: None }
    }
}

/// Published state of the space query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceResults {
    /// Key of the query these results belong to; `None` while disabled
    pub key: Option<QueryKey>,
    pub spaces: Vec<Space>,
    pub total: Option<usize>,
    pub last_key: Option<ContinuationToken>,
    pub is_loading: bool,
    pub error: Option<ClientError>,
}

impl SpaceResults {
    fn loaded(key: QueryKey, listing: SpaceListing) -> Self {
        Self {
            key: Some(key),
            spaces: listing.spaces,
            total: listing.total,
            last_key: listing.last_key,
            is_loading: false,
            error: None,
        }
    }

    fn failed(key: QueryKey, error: ClientError) -> Self {
        Self { key: Some(key), error: Some(error), ..Self::default() }
    }

    /// False until the first bounds arrive
    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }
}

#[derive(Debug, Default)]
struct CoordinatorState {
    filters: FilterCriteria,
    bounds: Option<MapBounds>,
    cache: HashMap<QueryKey, SpaceListing>,
    in_flight: Option<QueryKey>,

    /// Bumped whenever the published query changes; responses carrying an
    /// older value are cached but not published
    sequence: u64,
}

struct Inner {
    api: Arc<dyn DirectoryApi>,
    page_limit: Option<usize>,
    state: Mutex<CoordinatorState>,
    results_tx: watch::Sender<SpaceResults>,
    bounds_debounce: Debouncer,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_filters(self: &Arc<Self>, filters: FilterCriteria) {
        self.lock().filters = filters;
        self.refresh();
    }

    fn schedule_bounds(self: &Arc<Self>, bounds: MapBounds) {
        let inner: Weak<Inner> = Arc::downgrade(self);
        self.bounds_debounce.schedule(async move {
            if let Some(inner) = inner.upgrade() {
                inner.apply_bounds(bounds);
            }
        });
    }

    fn apply_bounds(self: &Arc<Self>, bounds: MapBounds) {
        tracing::debug!(%bounds, "Applying settled bounds");
        self.lock().bounds = Some(bounds);
        self.refresh();
    }

    fn refetch(self: &Arc<Self>) {
        {
            let mut state = self.lock();
            if let Some(bounds) = state.bounds {
                let key = QueryKey::new(&state.filters, &bounds);
                state.cache.remove(&key);
                state.in_flight = None;
            }
        }
        self.refresh();
    }

    fn refresh(self: &Arc<Self>) {
        let (query, key, sequence) = {
            let mut state = self.lock();

            let Some(bounds) = state.bounds else {
                self.results_tx.send_replace(SpaceResults::default());
                return;
            };

            let key = QueryKey::new(&state.filters, &bounds);

            if let Some(listing) = state.cache.get(&key).cloned() {
                state.sequence += 1;
                state.in_flight = None;
                tracing::debug!(%key, "Serving spaces from cache");
                self.results_tx.send_replace(SpaceResults::loaded(key, listing));
                return;
            }

            if state.in_flight.as_ref() == Some(&key) {
                return;
            }

            state.sequence += 1;
            state.in_flight = Some(key.clone());

            let mut query = SpaceQuery::new(state.filters.clone(), Some(bounds));
            if let Some(limit) = self.page_limit {
                query = query.with_page(limit, None);
            }

            self.results_tx.send_modify(|results| {
                results.key = Some(key.clone());
                results.is_loading = true;
                results.error = None;
            });

            (query, key, state.sequence)
        };

        tracing::debug!(%key, sequence, "Fetching spaces");
        let api = Arc::clone(&self.api);
        let inner = Arc::downgrade(self);
        tokio::spawn(async move {
            let result = api.list_spaces(&query).await;
            if let Some(inner) = inner.upgrade() {
                inner.complete(sequence, key, result);
            }
        });
    }

    fn complete(&self, sequence: u64, key: QueryKey, result: Result<SpaceListing>) {
        let mut state = self.lock();

        if let Ok(listing) = &result {
            state.cache.insert(key.clone(), listing.clone());
        }

        if state.sequence != sequence {
            tracing::debug!(%key, sequence, "Discarding superseded space results");
            return;
        }
        state.in_flight = None;

        let results = match result {
            Ok(listing) => SpaceResults::loaded(key, listing),
            Err(error) => {
                tracing::warn!(%key, %error, "Space query failed");
                SpaceResults::failed(key, error)
            }
        };
        self.results_tx.send_replace(results);
    }
}

/// Turns applied filters and map bounds into published space results
pub struct SpaceQueryCoordinator {
    inner: Arc<Inner>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl SpaceQueryCoordinator {
    pub fn new(api: Arc<dyn DirectoryApi>) -> Self {
        Self::with_options(api, CoordinatorOptions::default())
    }

    pub fn with_options(api: Arc<dyn DirectoryApi>, options: CoordinatorOptions) -> Self {
        let (results_tx, _) = watch::channel(SpaceResults::default());
        Self {
            inner: Arc::new(Inner {
                api,
                page_limit: options.page_limit,
                state: Mutex::new(CoordinatorState::default()),
                results_tx,
                bounds_debounce: Debouncer::new(options.bounds_debounce),
            }),
            driver: Mutex::new(None),
        }
    }

    /// Use new applied filters right away
    pub fn set_filters(&self, filters: FilterCriteria) {
        self.inner.set_filters(filters);
    }

    /// Use new bounds once they have been stable for the debounce delay
    pub fn set_bounds(&self, bounds: MapBounds) {
        self.inner.schedule_bounds(bounds);
    }

    /// Drop the cached entry for the current key and query again
    pub fn refetch(&self) {
        self.inner.refetch();
    }

    /// Bounds currently used for queries
    pub fn bounds(&self) -> Option<MapBounds> {
        self.inner.lock().bounds
    }

    pub fn results(&self) -> SpaceResults {
        self.inner.results_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SpaceResults> {
        self.inner.results_tx.subscribe()
    }

    /// Follow a filter store and a viewport tracker.
    ///
    /// Current values are taken immediately; later ones are picked up by a
    /// background task that runs until either source or the coordinator is
    /// dropped. Attaching again replaces the previous sources.
    pub fn attach(&self, filters: &FilterStore, viewport: &ViewportTracker) {
        let mut filters_rx = filters.subscribe();
        let mut bounds_rx = viewport.subscribe();

        let criteria = filters_rx.borrow_and_update().criteria.clone();
        let bounds = *bounds_rx.borrow_and_update();
        self.inner.set_filters(criteria);
        if let Some(bounds) = bounds {
            self.inner.schedule_bounds(bounds);
        }

        let inner = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = filters_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let criteria = filters_rx.borrow_and_update().criteria.clone();
                        let Some(inner) = inner.upgrade() else { break };
                        inner.set_filters(criteria);
                    }
                    changed = bounds_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let bounds = *bounds_rx.borrow_and_update();
                        let Some(inner) = inner.upgrade() else { break };
                        if let Some(bounds) = bounds {
                            inner.schedule_bounds(bounds);
                        }
                    }
                }
            }
            tracing::debug!("Space query driver stopped");
        });

        let previous = self.driver.lock().unwrap_or_else(PoisonError::into_inner).replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

impl Drop for SpaceQueryCoordinator {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.lock().unwrap_or_else(PoisonError::into_inner).take() {
            driver.abort();
        }
    }
}
