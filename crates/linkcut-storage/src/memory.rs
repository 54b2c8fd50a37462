use crate::tables::Tables;
use async_trait::async_trait;
use linkcut_core::{BaseUrl, Result, Storage, StorageError, UserUrl};
use parking_lot::Mutex;

/// Purely in-memory implementation of the storage contract.
///
/// All four lookup structures live behind one coarse mutex; every operation
/// holds the lock for its full duration. Contention is not a design driver
/// here, so no finer granularity is attempted.
#[derive(Debug)]
pub struct MemoryStorage {
    base_url: BaseUrl,
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            tables: Mutex::new(Tables::new()),
        }
    }
}

pub(crate) fn user_urls(tables: &Tables, base_url: &BaseUrl, user: &str) -> Result<Vec<UserUrl>> {
    let ids = tables.urls_for(user);
    if ids.is_empty() {
        return Err(StorageError::NoContent(user.to_owned()));
    }

    let mut entries = Vec::with_capacity(ids.len());
    for &id in ids {
        let original_url = tables.lookup(id).ok_or_else(|| {
            StorageError::InvalidData(format!("id {id} is indexed for a user but has no url"))
        })?;
        entries.push(UserUrl {
            short_url: base_url.join(id),
            original_url: original_url.to_owned(),
        });
    }
    Ok(entries)
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn add_url(&self, url: &str, user: &str) -> Result<String> {
        let mut tables = self.tables.lock();
        let id = match tables.id_for(url) {
            Some(id) => id,
            None => tables.insert(url, user),
        };
        Ok(self.base_url.join(id))
    }

    async fn search_url(&self, id: i64) -> Result<String> {
        self.tables
            .lock()
            .lookup(id)
            .map(str::to_owned)
            .ok_or(StorageError::NotFound(id))
    }

    async fn urls_for_user(&self, user: &str) -> Result<Vec<UserUrl>> {
        user_urls(&self.tables.lock(), &self.base_url, user)
    }

    async fn ping(&self) -> Result<()> {
        Err(StorageError::NoDatabase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store() -> MemoryStorage {
        MemoryStorage::new(BaseUrl::new("http://localhost:8080/").unwrap())
    }

    #[tokio::test]
    async fn first_id_is_one_thousand() {
        let store = store();

        let short = store.add_url("https://example.com", "").await.unwrap();
        assert_eq!(short, "http://localhost:8080/1000");
    }

    #[tokio::test]
    async fn resubmission_is_idempotent() {
        let store = store();

        let first = store.add_url("https://example.com", "").await.unwrap();
        let second = store.add_url("https://example.com", "").await.unwrap();
        assert_eq!(first, second);

        // The counter did not advance for the duplicate.
        let next = store.add_url("https://other.example", "").await.unwrap();
        assert_eq!(next, "http://localhost:8080/1001");
    }

    #[tokio::test]
    async fn search_round_trips() {
        let store = store();

        store.add_url("https://example.com", "").await.unwrap();
        let url = store.search_url(1000).await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn search_unknown_id_is_not_found() {
        let store = store();

        let err = store.search_url(1).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(1)));
    }

    #[tokio::test]
    async fn ids_are_strictly_increasing() {
        let store = store();

        for (i, url) in ["https://a.example", "https://b.example", "https://c.example"]
            .iter()
            .enumerate()
        {
            let short = store.add_url(url, "").await.unwrap();
            assert_eq!(short, format!("http://localhost:8080/{}", 1000 + i as i64));
        }
    }

    #[tokio::test]
    async fn urls_for_user_in_submission_order() {
        let store = store();

        store.add_url("https://a.example", "u1").await.unwrap();
        store.add_url("https://b.example", "u2").await.unwrap();
        store.add_url("https://c.example", "u1").await.unwrap();

        let urls = store.urls_for_user("u1").await.unwrap();
        assert_eq!(
            urls,
            vec![
                UserUrl {
                    short_url: "http://localhost:8080/1000".to_string(),
                    original_url: "https://a.example".to_string(),
                },
                UserUrl {
                    short_url: "http://localhost:8080/1002".to_string(),
                    original_url: "https://c.example".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn urls_for_unknown_user_is_no_content() {
        let store = store();

        let err = store.urls_for_user("nobody").await.unwrap_err();
        assert!(matches!(err, StorageError::NoContent(_)));
    }

    #[tokio::test]
    async fn ping_reports_no_database() {
        let err = store().ping().await.unwrap_err();
        assert!(matches!(err, StorageError::NoDatabase));
    }

    #[tokio::test]
    async fn concurrent_duplicate_submissions_allocate_once() {
        let store = Arc::new(store());
        let mut handles = vec![];

        for _ in 0..10 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.add_url("https://example.com", "").await.unwrap()
            }));
        }

        let mut results = vec![];
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        assert!(results.iter().all(|r| r == &results[0]));

        // Exactly one id was consumed by the ten submissions.
        let next = store.add_url("https://other.example", "").await.unwrap();
        assert_eq!(next, "http://localhost:8080/1001");
    }
}
