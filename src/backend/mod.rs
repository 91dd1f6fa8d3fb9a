//! Commerce Backend Module
//!
//! This module contains the adapter for the remote commerce service:
//! - Wire models and their conversion to catalog products
//! - The HTTP client with error normalization
//! - Tool handlers for the backend-held store cart

pub mod client;
pub mod handlers;
pub mod models;

pub use client::CommerceClient;
pub use models::{StoreCart, StoreCartItem};
