//! Key-Value Cache Module
//!
//! This module contains the key-value seam used for session state:
//! - The `KvStore` operations (get, set with expiry, delete, prefix scan, increment)
//! - An in-memory store with per-key expiry
//! - The lazily connected, process-wide `CacheHandle`
//! - Key naming for carts and wishlists

pub mod handle;
pub mod keys;
pub mod memory;

use crate::error::ToolError;
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use thiserror::Error;

pub use handle::{CacheConnector, CacheHandle};
pub use memory::{MemoryConnector, MemoryStore};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{0}")]
    Unavailable(String),

    #[error("cache connection has been closed")]
    Closed,

    #[error("value at `{key}` could not be decoded: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("value at `{0}` is not an integer")]
    WrongType(String),

    #[error("expiry of {0:?} is out of range")]
    InvalidTtl(Duration),
}

impl From<CacheError> for ToolError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Unavailable(_) | CacheError::Closed => {
                ToolError::CacheUnavailable(err.to_string())
            }
            CacheError::Codec { .. } | CacheError::WrongType(_) | CacheError::InvalidTtl(_) => {
                ToolError::Internal(err.to_string())
            }
        }
    }
}

/// Operations the session layer needs from a key-value store.
///
/// Every write carries an expiry; there are no persistent keys.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Deletes the given keys, returning how many existed
    async fn del(&self, keys: &[String]) -> Result<u64, CacheError>;

    /// Live keys starting with `prefix`, in no particular order
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError>;

    /// Increments an integer counter (missing counts as 0) and refreshes its expiry
    async fn incr(&self, key: &str, ttl: Duration) -> Result<i64, CacheError>;

    /// Releases the connection; later calls fail with `CacheError::Closed`
    async fn close(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

pub type SharedStore = Arc<dyn KvStore>;
