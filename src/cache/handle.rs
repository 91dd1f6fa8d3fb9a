//! Process-wide cache connection
//!
//! The connection is established by the first operation that needs it and
//! reused afterwards. `shutdown` is the teardown hook run when the server stops.

use super::{CacheError, MemoryConnector, SharedStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Opens a connection to a concrete store
#[async_trait]
pub trait CacheConnector: Send + Sync {
    async fn connect(&self) -> Result<SharedStore, CacheError>;
}

struct Inner {
    url: String,
    connector: Arc<dyn CacheConnector>,
    store: OnceCell<SharedStore>,
}

/// Cheap to clone; all clones share one lazily opened connection
#[derive(Clone)]
pub struct CacheHandle {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheHandle")
            .field("url", &self.inner.url)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl CacheHandle {
    pub fn new(url: impl Into<String>, connector: Arc<dyn CacheConnector>) -> Self {
        Self {
            inner: Arc::new(Inner {
                url: url.into(),
                connector,
                store: OnceCell::new(),
            }),
        }
    }

    /// Picks a connector from the URL scheme. Only `memory://` is built in.
    pub fn from_url(url: &str) -> Result<Self, CacheError> {
        match url.split_once("://") {
            Some(("memory", _)) => Ok(Self::new(url, Arc::new(MemoryConnector))),
            _ => Err(CacheError::Unavailable(format!(
                "no cache driver for `{url}`"
            ))),
        }
    }

    /// Returns the shared store, connecting on first use.
    ///
    /// A failed attempt is not cached, so the next call retries.
    pub async fn store(&self) -> Result<SharedStore, CacheError> {
        let store = self
            .inner
            .store
            .get_or_try_init(|| async {
                tracing::info!(url = %self.inner.url, "Connecting to cache");
                self.inner.connector.connect().await
            })
            .await?;
        Ok(Arc::clone(store))
    }

    pub fn is_connected(&self) -> bool {
        self.inner.store.initialized()
    }

    /// Closes the connection if one was ever opened
    pub async fn shutdown(&self) -> Result<(), CacheError> {
        if let Some(store) = self.inner.store.get() {
            tracing::info!(url = %self.inner.url, "Closing cache connection");
            store.close().await?;
        }
        Ok(())
    }
}
