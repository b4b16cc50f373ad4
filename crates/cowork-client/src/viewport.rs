//! Map viewport tracking
//!
//! The tracker is a pure observer of the map. It publishes the bounds once
//! when the map first renders and once per settled camera gesture.
//! Intermediate frames are recorded but never published, and nothing here
//! is debounced.

use cowork_core::models::MapBounds;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;

#[derive(Debug)]
pub struct ViewportTracker {
    bounds_tx: watch::Sender<Option<MapBounds>>,
    live: Mutex<Option<MapBounds>>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        let (bounds_tx, _) = watch::channel(None);
        Self { bounds_tx, live: Mutex::new(None) }
    }

    /// Last published bounds; `None` until the map has rendered
    pub fn bounds(&self) -> Option<MapBounds> {
        *self.bounds_tx.borrow()
    }

    /// Most recent frame, including unsettled ones
    pub fn live_bounds(&self) -> Option<MapBounds> {
        *self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The map rendered for the first time
    pub fn map_ready(&self, bounds: MapBounds) {
        tracing::debug!(%bounds, "Map ready");
        self.publish(bounds);
    }

    /// An intermediate frame of an ongoing gesture
    pub fn camera_moved(&self, bounds: MapBounds) {
        *self.live.lock().unwrap_or_else(PoisonError::into_inner) = Some(bounds);
    }

    /// A pan or zoom gesture came to rest
    pub fn camera_settled(&self, bounds: MapBounds) {
        self.publish(bounds);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<MapBounds>> {
        self.bounds_tx.subscribe()
    }

    fn publish(&self, bounds: MapBounds) {
        *self.live.lock().unwrap_or_else(PoisonError::into_inner) = Some(bounds);
        self.bounds_tx.send_replace(Some(bounds));
    }
}

impl Default for ViewportTracker {
    fn default() -> Self {
        Self::new()
    }
}
