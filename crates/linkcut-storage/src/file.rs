use crate::memory::user_urls;
use crate::tables::Tables;
use async_trait::async_trait;
use linkcut_core::{BaseUrl, Result, Storage, StorageError, UserUrl};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// One persisted URL mapping. Field names are the on-disk wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileEntry {
    #[serde(rename = "fullURL")]
    full_url: String,
    #[serde(rename = "shortenURL")]
    shorten_url: i64,
    #[serde(rename = "user")]
    user: String,
}

#[derive(Debug)]
struct FileState {
    tables: Tables,
    entries: Vec<FileEntry>,
}

/// File-backed implementation of the storage contract.
///
/// Serves every read from the same in-memory structures as
/// [`crate::MemoryStorage`]; each new allocation rewrites the complete entry
/// list to disk before the in-memory state is touched, so a failed write
/// leaves the store exactly as it was. The rewrite is O(n) per new URL, an
/// accepted trade-off for a format that always reconstructs the full state.
#[derive(Debug)]
pub struct FileStorage {
    base_url: BaseUrl,
    path: PathBuf,
    state: Mutex<FileState>,
}

impl FileStorage {
    /// Opens (or creates) the backing file and replays its entries.
    ///
    /// Reconciliation completes before this returns: all lookup maps are
    /// rebuilt and the id counter is set to the maximum id seen, so a
    /// restarted store continues allocating where the previous process
    /// stopped.
    pub fn open(base_url: BaseUrl, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let bytes = fs::read(&path).map_err(|e| StorageError::Io(e.to_string()))?;
            if bytes.is_empty() {
                Vec::new()
            } else {
                serde_json::from_slice::<Vec<FileEntry>>(&bytes)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?
            }
        } else {
            fs::File::create(&path).map_err(|e| StorageError::Io(e.to_string()))?;
            Vec::new()
        };

        let mut tables = Tables::new();
        for entry in &entries {
            tables.record(&entry.full_url, &entry.user, entry.shorten_url);
        }
        if !entries.is_empty() {
            info!(path = %path.display(), count = entries.len(), "restored urls from file");
        }

        Ok(Self {
            base_url,
            path,
            state: Mutex::new(FileState { tables, entries }),
        })
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn add_url(&self, url: &str, user: &str) -> Result<String> {
        let mut state = self.state.lock();

        if let Some(id) = state.tables.id_for(url) {
            return Ok(self.base_url.join(id));
        }

        let id = state.tables.next_id();
        let mut entries = state.entries.clone();
        entries.push(FileEntry {
            full_url: url.to_owned(),
            shorten_url: id,
            user: user.to_owned(),
        });

        // Persist first; memory is only mutated once the file holds the
        // complete new list.
        let json = serde_json::to_vec(&entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StorageError::Io(e.to_string()))?;

        state.entries = entries;
        state.tables.record(url, user, id);
        Ok(self.base_url.join(id))
    }

    async fn search_url(&self, id: i64) -> Result<String> {
        self.state
            .lock()
            .tables
            .lookup(id)
            .map(str::to_owned)
            .ok_or(StorageError::NotFound(id))
    }

    async fn urls_for_user(&self, user: &str) -> Result<Vec<UserUrl>> {
        user_urls(&self.state.lock().tables, &self.base_url, user)
    }

    async fn ping(&self) -> Result<()> {
        Err(StorageError::NoDatabase)
    }
}
