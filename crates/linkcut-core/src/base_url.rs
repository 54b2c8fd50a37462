use crate::error::StorageError;
use std::fmt::Display;

/// The public base prefix prepended to every emitted short id.
///
/// Always ends with a trailing `/`, so a short URL is rendered as
/// `<base><decimal id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a `BaseUrl`, appending a trailing `/` when missing.
    pub fn new(base: impl Into<String>) -> std::result::Result<Self, StorageError> {
        let mut base = base.into();
        if base.is_empty() {
            return Err(StorageError::InvalidData(
                "base url must not be empty".to_string(),
            ));
        }
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self(base))
    }

    /// Renders the full shortened URL for an id.
    pub fn join(&self, id: i64) -> String {
        format!("{}{}", self.0, id)
    }

    /// Returns the base prefix as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
