//! # Cache Module
//!
//! On-disk TTL cache shared by statusline invocations.
//!
//! Each entry is one regular file named by the hex SHA-256 of its key, holding
//! the raw value bytes. The file's modification time is the only freshness
//! signal, and the TTL is supplied by the reader, so the same bytes can be
//! fresh for one caller and stale for another.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{CostError, Result};

#[derive(Clone, Debug)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let hash = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{:x}", hash))
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// The TTL is accepted for symmetry with [`DiskCache::get`] but freshness
    /// is decided at read time.
    pub fn set(&self, key: &str, value: &[u8], _ttl: Duration) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CostError::storage(parent, e))?;
        }
        fs::write(&path, value).map_err(|e| CostError::storage(&path, e))
    }

    /// Read the entry for `key` if it is no older than `ttl`.
    pub fn get(&self, key: &str, ttl: Duration) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CostError::NotFound {
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(CostError::storage(&path, e)),
        };
        let modified = meta
            .modified()
            .map_err(|e| CostError::storage(&path, e))?;
        let age = Utc::now() - DateTime::<Utc>::from(modified);
        if age > ttl {
            return Err(CostError::Expired { age, ttl });
        }
        match fs::read(&path) {
            Ok(data) => Ok(data),
            // Pruned between stat and read
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CostError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(CostError::storage(&path, e)),
        }
    }

    /// Remove every entry older than `max_age`.
    ///
    /// Failing to list the cache directory is reported; failures on individual
    /// entries are ignored so one bad file never blocks the rest. Returns the
    /// number of entries removed.
    pub fn prune(&self, max_age: Duration) -> Result<usize> {
        let entries = fs::read_dir(&self.dir).map_err(|e| CostError::storage(&self.dir, e))?;
        let cutoff = Utc::now() - max_age;
        let mut removed = 0;
        for entry in entries.flatten() {
            let meta = match entry.metadata() {
                Ok(m) => m,
                Err(_) => continue,
            };
            if meta.is_dir() {
                continue;
            }
            let mtime: DateTime<Utc> = match meta.modified() {
                Ok(t) => t.into(),
                Err(_) => continue,
            };
            if mtime < cutoff && fs::remove_file(entry.path()).is_ok() {
                removed += 1;
            }
        }
        tracing::debug!(dir = %self.dir.display(), removed, "pruned cache");
        Ok(removed)
    }
}
