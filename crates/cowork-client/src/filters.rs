//! Draft and applied filter state
//!
//! Edits land in the draft. A commit, either explicit or fired by the
//! auto-apply timer, promotes the draft to applied and publishes it. Only
//! applied filters reach the space query.

use cowork_core::models::{FilterCriteria, FilterField};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;

use crate::debounce::Debouncer;

/// Default delay between the last edit and the automatic commit
pub const DEFAULT_AUTO_APPLY_DELAY: Duration = Duration::from_millis(500);

/// Applied filters as seen by subscribers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedFilters {
    pub criteria: FilterCriteria,

    /// Number of commits and resets so far
    pub revision: u64,
}

#[derive(Debug, Default)]
struct FilterState {
    draft: FilterCriteria,
    applied: AppliedFilters,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<FilterState>,
    applied_tx: watch::Sender<AppliedFilters>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, FilterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(&self) -> AppliedFilters {
        let applied = {
            let mut state = self.lock();
            state.applied = AppliedFilters {
                criteria: state.draft.clone(),
                revision: state.applied.revision + 1,
            };
            state.applied.clone()
        };
        tracing::debug!(revision = applied.revision, "Committed filters");
        self.applied_tx.send_replace(applied.clone());
        applied
    }
}

/// Filter state store with debounced auto-apply
#[derive(Debug)]
pub struct FilterStore {
    shared: Arc<Shared>,
    auto_apply: Debouncer,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::with_auto_apply(DEFAULT_AUTO_APPLY_DELAY)
    }

    /// A zero delay disables auto-apply; only [`commit`](Self::commit) applies edits
    pub fn with_auto_apply(delay: Duration) -> Self {
        let (applied_tx, _) = watch::channel(AppliedFilters::default());
        Self {
            shared: Arc::new(Shared { state: Mutex::new(FilterState::default()), applied_tx }),
            auto_apply: Debouncer::new(delay),
        }
    }

    pub fn draft(&self) -> FilterCriteria {
        self.shared.lock().draft.clone()
    }

    pub fn applied(&self) -> FilterCriteria {
        self.shared.lock().applied.criteria.clone()
    }

    pub fn revision(&self) -> u64 {
        self.shared.lock().applied.revision
    }

    /// Replace one draft field and reschedule the automatic commit
    pub fn set_field(&self, field: FilterField) {
        {
            let mut state = self.shared.lock();
            state.draft = state.draft.with_field(field);
        }

        if !self.auto_apply.delay().is_zero() {
            let shared: Weak<Shared> = Arc::downgrade(&self.shared);
            self.auto_apply.schedule(async move {
                if let Some(shared) = shared.upgrade() {
                    shared.commit();
                }
            });
        }
    }

    /// Add the service tag to the draft, or remove it if already selected
    pub fn toggle_service(&self, tag: &str) {
        let field = self.shared.lock().draft.toggled_service(tag);
        self.set_field(field);
    }

    /// Promote the draft to applied and publish it
    pub fn commit(&self) -> AppliedFilters {
        self.auto_apply.cancel();
        self.shared.commit()
    }

    /// Restore defaults in both draft and applied, publishing immediately
    pub fn reset(&self) -> AppliedFilters {
        self.auto_apply.cancel();
        let applied = {
            let mut state = self.shared.lock();
            state.draft = FilterCriteria::default();
            state.applied = AppliedFilters {
                criteria: FilterCriteria::default(),
                revision: state.applied.revision + 1,
            };
            state.applied.clone()
        };
        tracing::debug!(revision = applied.revision, "Reset filters");
        self.shared.applied_tx.send_replace(applied.clone());
        applied
    }

    /// True while an automatic commit is scheduled
    pub fn has_pending_commit(&self) -> bool {
        self.auto_apply.is_pending()
    }

    /// Receive every published applied value
    pub fn subscribe(&self) -> watch::Receiver<AppliedFilters> {
        self.shared.applied_tx.subscribe()
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cowork_core::models::MinRating;

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_commits_once_with_latest_draft() {
        let store = FilterStore::with_auto_apply(DELAY);
        let mut rx = store.subscribe();

        store.set_field(FilterField::Location(Some("Berl".to_string())));
        tokio::time::sleep(Duration::from_millis(100)).await;
        store.set_field(FilterField::Location(Some("Berlin".to_string())));
        tokio::time::sleep(Duration::from_millis(100)).await;
        store.set_field(FilterField::MinRating(Some(MinRating::Four)));

        assert_eq!(store.applied(), FilterCriteria::default());
        assert!(store.has_pending_commit());

        tokio::time::sleep(DELAY * 2).await;

        assert_eq!(store.revision(), 1);
        let applied = rx.borrow_and_update().clone();
        assert_eq!(applied.revision, 1);
        assert_eq!(applied.criteria.location.as_deref(), Some("Berlin"));
        assert_eq!(applied.criteria.min_rating, Some(MinRating::Four));
        assert_eq!(store.applied(), store.draft());
    }

    #[tokio::test(start_paused = true)]
    async fn test_draft_edits_do_not_publish_before_delay() {
        let store = FilterStore::with_auto_apply(DELAY);
        let rx = store.subscribe();

        store.toggle_service("wifi");
        tokio::time::sleep(DELAY / 2).await;

        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.draft().services, vec!["wifi"]);
        assert!(store.applied().services.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_commit_cancels_timer() {
        let store = FilterStore::with_auto_apply(DELAY);

        store.toggle_service("coffee");
        let applied = store.commit();
        assert_eq!(applied.criteria.services, vec!["coffee"]);
        assert!(!store.has_pending_commit());

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(store.revision(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_is_synchronous_and_cancels_pending_commit() {
        let store = FilterStore::with_auto_apply(DELAY);
        store.set_field(FilterField::PriceMax(Some(50.0)));
        store.commit();
        store.toggle_service("parking");

        let applied = store.reset();

        assert_eq!(applied.criteria, FilterCriteria::default());
        assert_eq!(store.applied(), FilterCriteria::default());
        assert_eq!(store.draft(), FilterCriteria::default());
        assert_eq!(*store.subscribe().borrow(), applied);

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(store.applied(), FilterCriteria::default());
        assert_eq!(store.revision(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_service_twice_removes_it() {
        let store = FilterStore::with_auto_apply(Duration::ZERO);
        store.toggle_service("lockers");
        store.toggle_service("lockers");
        assert!(store.draft().services.is_empty());
        assert!(!store.has_pending_commit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_store_cancels_auto_apply() {
        let store = FilterStore::with_auto_apply(DELAY);
        let rx = store.subscribe();
        store.toggle_service("wifi");
        drop(store);

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(rx.borrow().revision, 0);
    }
}
