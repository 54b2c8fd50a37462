use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of a per-user URL listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUrl {
    /// The fully qualified shortened URL.
    pub short_url: String,
    /// The original URL behind it.
    pub original_url: String,
}

/// The storage contract implemented by every backend.
///
/// A backend owns the id allocation for the URLs it stores: ids come from a
/// single monotonic counter, a given URL is assigned exactly one id for the
/// lifetime of the store, and `add_url` for an already-known URL returns the
/// existing shortened URL without mutating anything.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Shortens `url` for `user` and returns the fully qualified short URL.
    ///
    /// `url` is an arbitrary non-empty string and is not validated as a
    /// well-formed URL. `user` may be empty, meaning "no owner".
    /// Resubmitting a known URL returns the existing short URL.
    async fn add_url(&self, url: &str, user: &str) -> Result<String>;

    /// Resolves a previously issued id back to the original URL.
    /// Returns `Err(NotFound)` if no record has this id.
    async fn search_url(&self, id: i64) -> Result<String>;

    /// Lists every URL submitted by `user`, in creation order.
    /// Returns `Err(NoContent)` if the user has no submissions.
    async fn urls_for_user(&self, user: &str) -> Result<Vec<UserUrl>>;

    /// Health signal. Backends without a database report `NoDatabase`;
    /// the database backend forwards a live round trip.
    async fn ping(&self) -> Result<()>;
}
