//! Cowork Store - Storage port and adapters
//!
//! This crate defines the directory storage port and provides a fixture
//! (in-memory) adapter, a PostgreSQL table-backed adapter and the factory
//! that picks one at process start.

pub mod factory;
pub mod fixtures;
pub mod memory;
pub mod pagination;
pub mod ports;
pub mod postgres;

pub use factory::{open_store, StoreSelection};
pub use memory::MemoryDirectoryStore;
pub use ports::{DirectoryStore, SpacePage, StorageBackend};
