//! Error types for the cost accounting subsystem.

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

/// Errors surfaced by the disk cache, the ledger and the transcript scanner.
#[derive(Error, Debug)]
pub enum CostError {
    /// No cache entry exists for the key
    #[error("cache miss for key {key:?}")]
    NotFound { key: String },

    /// Entry exists but is older than the caller's TTL
    #[error("cache entry expired (age: {age}, ttl: {ttl})")]
    Expired { age: Duration, ttl: Duration },

    /// Filesystem failure: cannot create, open, read, write or rename
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, number or timestamp
    #[error("parse error: {0}")]
    Parse(String),
}

impl CostError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CostError::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CostError::NotFound { .. })
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, CostError::Expired { .. })
    }

    /// True for the two expected cache outcomes that are not failures.
    pub fn is_miss(&self) -> bool {
        self.is_not_found() || self.is_expired()
    }
}

impl From<serde_json::Error> for CostError {
    fn from(e: serde_json::Error) -> Self {
        CostError::Parse(e.to_string())
    }
}

/// Result type for cost accounting operations.
pub type Result<T> = std::result::Result<T, CostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_predicates() {
        let nf = CostError::NotFound { key: "k".into() };
        assert!(nf.is_not_found() && nf.is_miss() && !nf.is_expired());

        let ex = CostError::Expired {
            age: Duration::minutes(10),
            ttl: Duration::minutes(5),
        };
        assert!(ex.is_expired() && ex.is_miss());

        let io = CostError::storage(
            "/tmp/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io.is_miss());
        assert!(io.to_string().contains("/tmp/x"));
    }
}
