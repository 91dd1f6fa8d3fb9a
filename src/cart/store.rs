//! Session cart and wishlist store
//!
//! The only component that reads or writes cart and wishlist records in the
//! cache. Records are JSON documents written with an expiry.
//!
//! Every mutation is a read-modify-write. Within this process, mutations of
//! the same record are serialized with a per-key lock. Several processes
//! sharing one cache can still interleave and the last writer wins.

use super::helpers::{merge_item, normalize_identity};
use super::models::{
    CartAuditEntry, CartItem, CartRecord, ClearReport, WishlistOutcome, WishlistRecord,
};
use crate::cache::{keys, CacheError, CacheHandle, SharedStore};
use crate::catalog::models::Product;
use crate::error::ToolError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub struct SessionStore {
    cache: CacheHandle,
    locks: DashMap<String, Arc<Mutex<()>>>,
    cart_ttl: Duration,
    wishlist_ttl: Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("cache", &self.cache)
            .field("cart_ttl", &self.cart_ttl)
            .field("wishlist_ttl", &self.wishlist_ttl)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(cache: CacheHandle, cart_ttl: Duration, wishlist_ttl: Duration) -> Self {
        Self {
            cache,
            locks: DashMap::new(),
            cart_ttl,
            wishlist_ttl,
        }
    }

    async fn store(&self) -> Result<SharedStore, ToolError> {
        Ok(self.cache.store().await?)
    }

    /// Exclusive access to one record key for the duration of a mutation
    async fn lock(&self, record_key: &str) -> RecordLock<'_> {
        let lock = self
            .locks
            .entry(record_key.to_string())
            .or_default()
            .clone();
        RecordLock {
            locks: &self.locks,
            key: record_key.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    fn expiry(ttl: Duration, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        chrono::Duration::from_std(ttl).ok().map(|d| now + d)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds `quantity` of `product`, merging with an existing line for the
    /// same product id. Refreshes the cart's expiry.
    pub async fn add_to_cart(
        &self,
        session_key: &str,
        product: &Product,
        quantity: u32,
    ) -> Result<CartRecord, ToolError> {
        if quantity < 1 {
            return Err(ToolError::validation("quantity", "must be at least 1"));
        }

        let cart_key = keys::cart(session_key);
        let _guard = self.lock(&cart_key).await;
        let store = self.store().await?;
        let now = Utc::now();

        let mut cart = load::<CartRecord>(&store, &cart_key)
            .await?
            .unwrap_or_else(|| CartRecord::empty(session_key, now));
        merge_item(&mut cart.items, CartItem::from_product(product, quantity));
        cart.expires_at = Self::expiry(self.cart_ttl, now);
        save(&store, &cart_key, &cart, self.cart_ttl).await?;

        // The cart is saved; audit bookkeeping must not turn that into a failure
        let entry = CartAuditEntry {
            product_id: product.id,
            name: product.name.clone(),
            quantity,
            added_at: now,
        };
        if let Err(e) = self.record_add(&store, session_key, &entry).await {
            tracing::warn!(session_key, error = %e, "Cart saved but audit entry was not written");
        }

        tracing::debug!(
            session_key,
            product_id = product.id,
            quantity,
            lines = cart.items.len(),
            "Added to cart"
        );
        Ok(cart)
    }

    /// Bumps the add counter and writes one audit entry
    async fn record_add(
        &self,
        store: &SharedStore,
        session_key: &str,
        entry: &CartAuditEntry,
    ) -> Result<(), ToolError> {
        let seq = store
            .incr(&keys::cart_count(session_key), self.cart_ttl)
            .await?;
        let key = keys::cart_item(session_key, entry.added_at.timestamp_millis(), seq);
        save(store, &key, entry, self.cart_ttl).await
    }

    /// The current cart; a missing or expired record reads as empty
    pub async fn view_cart(&self, session_key: &str) -> Result<CartRecord, ToolError> {
        let store = self.store().await?;
        Ok(load::<CartRecord>(&store, &keys::cart(session_key))
            .await?
            .unwrap_or_else(|| CartRecord::empty(session_key, Utc::now())))
    }

    /// Removes one line by its key
    pub async fn remove_item(
        &self,
        session_key: &str,
        item_key: &str,
    ) -> Result<(CartItem, CartRecord), ToolError> {
        let cart_key = keys::cart(session_key);
        let _guard = self.lock(&cart_key).await;
        let store = self.store().await?;

        let missing = || {
            ToolError::NotFound(format!(
                "no item with key \"{}\" in cart \"{}\"",
                item_key.trim(),
                session_key
            ))
        };
        let mut cart = load::<CartRecord>(&store, &cart_key)
            .await?
            .ok_or_else(missing)?;
        let position = cart
            .items
            .iter()
            .position(|i| i.key == item_key.trim())
            .ok_or_else(missing)?;

        let removed = cart.items.remove(position);
        cart.expires_at = Self::expiry(self.cart_ttl, Utc::now());
        save(&store, &cart_key, &cart, self.cart_ttl).await?;

        tracing::debug!(session_key, item_key = %removed.key, "Removed from cart");
        Ok((removed, cart))
    }

    /// Deletes the cart, its audit entries and its counter. Safe to repeat.
    pub async fn clear_cart(&self, session_key: &str) -> Result<ClearReport, ToolError> {
        let cart_key = keys::cart(session_key);
        let _guard = self.lock(&cart_key).await;
        let store = self.store().await?;

        let cart_deleted = store.del(&[cart_key]).await?;
        let item_keys = store
            .scan_prefix(&keys::cart_items_prefix(session_key))
            .await?;
        let item_entries_deleted = if item_keys.is_empty() {
            0
        } else {
            store.del(&item_keys).await?
        };
        let counter_deleted = store.del(&[keys::cart_count(session_key)]).await?;

        let report = ClearReport {
            cart_deleted,
            item_entries_deleted,
            counter_deleted,
        };
        tracing::info!(session_key, deleted = report.total(), "Cleared cart");
        Ok(report)
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Adds `product` unless one with the same name is already listed
    pub async fn add_to_wishlist(
        &self,
        identity_key: &str,
        product: &Product,
    ) -> Result<WishlistOutcome, ToolError> {
        let identity = normalize_identity(identity_key);
        let wishlist_key = keys::wishlist(&identity);
        let _guard = self.lock(&wishlist_key).await;
        let store = self.store().await?;

        let mut wishlist = load::<WishlistRecord>(&store, &wishlist_key)
            .await?
            .unwrap_or_else(|| WishlistRecord::empty(identity.clone()));

        if wishlist.contains_name(&product.name) {
            return Ok(WishlistOutcome::AlreadyPresent(wishlist));
        }

        wishlist.items.push(product.clone());
        wishlist.expires_at = Self::expiry(self.wishlist_ttl, Utc::now());
        save(&store, &wishlist_key, &wishlist, self.wishlist_ttl).await?;

        tracing::debug!(identity = %identity, product_id = product.id, "Added to wishlist");
        Ok(WishlistOutcome::Added(wishlist))
    }

    pub async fn view_wishlist(&self, identity_key: &str) -> Result<WishlistRecord, ToolError> {
        let identity = normalize_identity(identity_key);
        let store = self.store().await?;
        Ok(load::<WishlistRecord>(&store, &keys::wishlist(&identity))
            .await?
            .unwrap_or_else(|| WishlistRecord::empty(identity)))
    }
}

/// Held for the duration of one mutation. On release the key's lock entry
/// is dropped from the map unless another task is waiting on it.
struct RecordLock<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RecordLock<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

async fn load<T: DeserializeOwned>(store: &SharedStore, key: &str) -> Result<Option<T>, ToolError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|source| CacheError::Codec {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(value))
}

async fn save<T: Serialize>(
    store: &SharedStore,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<(), ToolError> {
    let raw = serde_json::to_string(value).map_err(|source| CacheError::Codec {
        key: key.to_string(),
        source,
    })?;
    store.set_ex(key, &raw, ttl).await?;
    Ok(())
}
