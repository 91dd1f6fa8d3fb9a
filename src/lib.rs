//! Commerce Tools Library
//!
//! This library exposes catalog, cart and wishlist operations as MCP tools
//! backed by a remote commerce service and a key-value cache.

// Domain modules
pub mod backend;
pub mod cart;
pub mod catalog;
pub mod mcp;

// Infrastructure
pub mod cache;
pub mod config;
pub mod error;
pub mod router;
pub mod state;

pub use error::ToolError;
