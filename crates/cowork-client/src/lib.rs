//! Cowork Client - Discovery state and directory API access
//!
//! The state components mirror what a map-driven browsing UI needs:
//!
//! - [`FilterStore`] holds draft and applied filters and auto-applies edits
//! - [`ViewportTracker`] reports settled map bounds
//! - [`SpaceQueryCoordinator`] turns applied filters and bounds into cached,
//!   last-request-wins space listings
//! - [`DetailFetcher`] loads single spaces with a freshness window
//!
//! All of them run on a tokio runtime and talk to the directory through the
//! [`DirectoryApi`] port, implemented over HTTP by [`HttpDirectoryClient`].

pub mod api;
pub mod coordinator;
pub mod debounce;
pub mod detail;
pub mod error;
pub mod filters;
pub mod http;
pub mod viewport;

#[cfg(test)]
pub(crate) mod mock;

pub use api::{DirectoryApi, HealthStatus, SpaceListing};
pub use coordinator::{SpaceQueryCoordinator, SpaceResults};
pub use detail::{DetailFetcher, DetailStatus};
pub use error::{ClientError, Result};
pub use filters::{AppliedFilters, FilterStore};
pub use http::HttpDirectoryClient;
pub use viewport::ViewportTracker;
