use cowork_store::{DirectoryStore, MemoryDirectoryStore, StorageBackend, StoreSelection};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DirectoryStore>,
    pub backend: StorageBackend,
}

impl AppState {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        let backend = store.backend();
        Self { store, backend }
    }

    pub fn from_selection(selection: StoreSelection) -> Self {
        Self { store: selection.store, backend: selection.backend }
    }

    /// State backed by the seeded fixture store
    pub fn fixtures() -> Self {
        Self::new(Arc::new(MemoryDirectoryStore::seeded()))
    }
}
