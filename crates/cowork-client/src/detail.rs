//! Single space loading with a freshness window

use cowork_core::models::{SpaceDetail, SpaceId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::api::DirectoryApi;
use crate::error::{ClientError, Result};

/// How long a loaded space is served without asking the API again
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5 * 60);

/// What the detail view should show
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailStatus {
    /// No space selected
    #[default]
    Idle,
    Loading(SpaceId),
    Loaded(Box<SpaceDetail>),
    NotFound(SpaceId),
    Failed { id: SpaceId, error: ClientError },
}

impl DetailStatus {
    pub fn detail(&self) -> Option<&SpaceDetail> {
        match self {
            DetailStatus::Loaded(detail) => Some(detail),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct DetailState {
    cache: HashMap<SpaceId, (Instant, SpaceDetail)>,
    sequence: u64,
}

struct Inner {
    api: Arc<dyn DirectoryApi>,
    freshness: Duration,
    state: Mutex<DetailState>,
    status_tx: watch::Sender<DetailStatus>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, DetailState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, sequence: u64, id: SpaceId, result: Result<SpaceDetail>) {
        let mut state = self.lock();

        if let Ok(detail) = &result {
            state.cache.insert(id, (Instant::now(), detail.clone()));
        }
        if state.sequence != sequence {
            tracing::debug!(%id, "Discarding superseded space detail");
            return;
        }

        let status = match result {
            Ok(detail) => DetailStatus::Loaded(Box::new(detail)),
            Err(error) if error.is_not_found() => DetailStatus::NotFound(id),
            Err(error) => {
                tracing::warn!(%id, %error, "Failed to load space");
                DetailStatus::Failed { id, error }
            }
        };
        self.status_tx.send_replace(status);
    }
}

/// Loads the selected space, last selection wins
pub struct DetailFetcher {
    inner: Arc<Inner>,
}

impl DetailFetcher {
    pub fn new(api: Arc<dyn DirectoryApi>) -> Self {
        Self::with_freshness(api, DEFAULT_FRESHNESS)
    }

    pub fn with_freshness(api: Arc<dyn DirectoryApi>, freshness: Duration) -> Self {
        let (status_tx, _) = watch::channel(DetailStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                api,
                freshness,
                state: Mutex::new(DetailState::default()),
                status_tx,
            }),
        }
    }

    /// Select a space, or clear the selection with `None`
    pub fn open(&self, id: Option<SpaceId>) {
        let sequence = {
            let mut state = self.inner.lock();
            state.sequence += 1;

            let Some(id) = id else {
                self.inner.status_tx.send_replace(DetailStatus::Idle);
                return;
            };

            if let Some((loaded_at, detail)) = state.cache.get(&id) {
                if loaded_at.elapsed() < self.inner.freshness {
                    tracing::debug!(%id, "Serving space detail from cache");
                    self.inner.status_tx.send_replace(DetailStatus::Loaded(Box::new(detail.clone())));
                    return;
                }
            }

            self.inner.status_tx.send_replace(DetailStatus::Loading(id));
            state.sequence
        };

        let Some(id) = id else { return };
        let api = Arc::clone(&self.inner.api);
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let result = api.get_space(id).await;
            if let Some(inner) = inner.upgrade() {
                inner.complete(sequence, id, result);
            }
        });
    }

    /// Forget a cached space so the next open fetches it again
    pub fn invalidate(&self, id: SpaceId) {
        self.inner.lock().cache.remove(&id);
    }

    pub fn status(&self) -> DetailStatus {
        self.inner.status_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailStatus> {
        self.inner.status_tx.subscribe()
    }
}
