//! In-memory key-value store
//!
//! An expired entry is dropped the next time it is touched. Entries nobody
//! touches again are reclaimed by a periodic background sweep.

use super::{CacheConnector, CacheError, KvStore, SharedStore};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Period of the background sweep started by `MemoryConnector`
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

fn expiry(now: Instant, ttl: Duration) -> Result<Instant, CacheError> {
    now.checked_add(ttl).ok_or(CacheError::InvalidTtl(ttl))
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Instant,
}

impl StoredValue {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Process-local store; DashMap shards give per-key atomicity for `incr`
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, StoredValue>,
    closed: AtomicBool,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sweeps expired entries every `period` until the store is closed or dropped
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) {
        let weak = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(store) = weak.upgrade() else { break };
                if store.closed.load(Ordering::Acquire) {
                    break;
                }
                let purged = store.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "Swept expired cache entries");
                }
            }
        });
        if let Ok(mut slot) = self.sweeper.lock() {
            if let Some(previous) = slot.replace(task) {
                previous.abort();
            }
        }
    }

    /// Drops every expired entry, returning how many were removed
    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, v| v.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    fn ensure_open(&self) -> Result<(), CacheError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.ensure_open()?;
        let now = Instant::now();
        let removed = self.entries.remove_if(key, |_, v| !v.is_live(now));
        if removed.is_some() {
            return Ok(None);
        }
        Ok(self.entries.get(key).map(|v| v.value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.ensure_open()?;
        let expires_at = expiry(Instant::now(), ttl)?;
        self.entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<u64, CacheError> {
        self.ensure_open()?;
        let now = Instant::now();
        let mut deleted = 0;
        for key in keys {
            if let Some((_, v)) = self.entries.remove(key) {
                if v.is_live(now) {
                    deleted += 1;
                }
            }
        }
        Ok(deleted)
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        self.ensure_open()?;
        let now = Instant::now();
        Ok(self
            .entries
            .iter()
            .filter(|e| e.key().starts_with(prefix) && e.value().is_live(now))
            .map(|e| e.key().clone())
            .collect())
    }

    async fn incr(&self, key: &str, ttl: Duration) -> Result<i64, CacheError> {
        self.ensure_open()?;
        let now = Instant::now();
        let expires_at = expiry(now, ttl)?;
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let current = if occupied.get().is_live(now) {
                    occupied
                        .get()
                        .value
                        .parse::<i64>()
                        .map_err(|_| CacheError::WrongType(key.to_string()))?
                } else {
                    0
                };
                let next = current + 1;
                occupied.insert(StoredValue {
                    value: next.to_string(),
                    expires_at,
                });
                Ok(next)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue {
                    value: "1".to_string(),
                    expires_at,
                });
                Ok(1)
            }
        }
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.closed.store(true, Ordering::Release);
        if let Ok(mut slot) = self.sweeper.lock() {
            if let Some(sweeper) = slot.take() {
                sweeper.abort();
            }
        }
        self.entries.clear();
        Ok(())
    }
}

/// Connects to a fresh `MemoryStore` (`memory://`)
#[derive(Debug, Default)]
pub struct MemoryConnector;

#[async_trait]
impl CacheConnector for MemoryConnector {
    async fn connect(&self) -> Result<SharedStore, CacheError> {
        let store = Arc::new(MemoryStore::new());
        store.spawn_sweeper(SWEEP_INTERVAL);
        Ok(store)
    }
}
