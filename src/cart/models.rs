//! Shopping Cart Domain Models
//!
//! This module contains the cart and wishlist records kept in the cache.

use crate::catalog::models::Product;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Domain Models
// =============================================================================

/// One line in a session cart. Lines are unique per product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Key used to remove the line (the product id)
    pub key: String,

    pub product_id: i64,

    pub name: String,

    /// Unit price captured when the line was first added
    pub price: Decimal,

    /// Always at least 1
    pub quantity: u32,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            key: product.id.to_string(),
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cart state for one session key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartRecord {
    pub session_key: String,

    pub items: Vec<CartItem>,

    pub created_at: DateTime<Utc>,

    /// `None` until the record has been persisted
    pub expires_at: Option<DateTime<Utc>>,
}

impl CartRecord {
    pub fn empty(session_key: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            session_key: session_key.into(),
            items: Vec::new(),
            created_at: now,
            expires_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities over all lines
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn item(&self, product_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }
}

/// Audit entry written for every add, kept alongside the cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartAuditEntry {
    pub product_id: i64,
    pub name: String,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

/// Keys removed by `clear_cart`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClearReport {
    pub cart_deleted: u64,
    pub item_entries_deleted: u64,
    pub counter_deleted: u64,
}

impl ClearReport {
    pub fn total(&self) -> u64 {
        self.cart_deleted + self.item_entries_deleted + self.counter_deleted
    }
}

// =============================================================================
// Wishlist Domain Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRecord {
    pub identity_key: String,

    /// No two entries share a name (case-insensitive)
    pub items: Vec<Product>,

    pub expires_at: Option<DateTime<Utc>>,
}

impl WishlistRecord {
    pub fn empty(identity_key: impl Into<String>) -> Self {
        Self {
            identity_key: identity_key.into(),
            items: Vec::new(),
            expires_at: None,
        }
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.items.iter().any(|p| p.has_name(name))
    }
}

/// Result of `add_to_wishlist`
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistOutcome {
    Added(WishlistRecord),
    AlreadyPresent(WishlistRecord),
}
