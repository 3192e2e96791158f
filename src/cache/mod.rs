//! Local key-value cache mirroring the note list, drafts and session.

mod keys;
mod memory;
mod sqlite;

pub use keys::{ACCESS_TOKEN, NOTES, USER_ID, draft_content_key, draft_title_key};
pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A database error occurred.
    #[error("cache database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cached value could not be encoded or decoded.
    #[error("cache entry '{key}' is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// A persistent string key-value store.
///
/// Values are opaque strings; structured values are stored as JSON by the
/// callers. Implementations must be synchronous: writes are visible to the
/// next `get` on the same instance.
pub trait LocalCache {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any existing value.
    fn set(&mut self, key: &str, value: &str) -> CacheResult<()>;

    /// Removes `key` (idempotent).
    fn remove(&mut self, key: &str) -> CacheResult<()>;

    /// Decodes the JSON value under `key`.
    fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| CacheError::Json {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it under `key`.
    fn set_json<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) -> CacheResult<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value).map_err(|source| CacheError::Json {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }
}

impl<C: LocalCache + ?Sized> LocalCache for &mut C {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> CacheResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> CacheResult<()> {
        (**self).remove(key)
    }
}
