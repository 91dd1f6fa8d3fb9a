//! Shopping Cart Domain Module
//!
//! This module contains the session cart and wishlist logic, including:
//! - Domain models (CartRecord, CartItem, WishlistRecord)
//! - Business logic helpers (merging, formatting)
//! - The cache-backed `SessionStore`
//! - Tool handlers for carts and wishlists

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::CartDeps;
pub use models::{CartItem, CartRecord, ClearReport, WishlistOutcome, WishlistRecord};
pub use store::SessionStore;
