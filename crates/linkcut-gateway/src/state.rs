use linkcut_core::Storage;
use std::sync::Arc;

/// Shared handler state: the one storage backend selected at startup.
#[derive(Clone)]
pub struct AppState {
    storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}
