//! Product Catalog Module
//!
//! Read-only product lookups behind one trait, answered either from an
//! in-memory collection or by the commerce backend. Callers cannot tell the
//! two apart: inputs, outputs and errors are the same.

pub mod handlers;
pub mod helpers;
pub mod local;
pub mod models;
pub mod remote;

use crate::error::ToolError;
use async_trait::async_trait;
use std::sync::Arc;

pub use local::LocalCatalog;
pub use models::{Page, Product};
pub use remote::RemoteCatalog;

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Case-insensitive substring or keyword search; no match is an empty page
    async fn search(&self, query: &str, page: Page) -> Result<Vec<Product>, ToolError>;

    async fn get_by_id(&self, id: i64) -> Result<Product, ToolError>;

    /// Case-insensitive exact name match
    async fn get_by_exact_name(&self, name: &str) -> Result<Product, ToolError>;

    /// Case-insensitive exact category match
    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, ToolError>;

    async fn list(&self, page: Page) -> Result<Vec<Product>, ToolError>;
}

pub type SharedCatalog = Arc<dyn Catalog>;

/// Resolves the product a cart or wishlist tool refers to: by id when given,
/// otherwise by exact name.
pub async fn resolve_product(
    catalog: &dyn Catalog,
    product_id: Option<i64>,
    name: Option<&str>,
) -> Result<Product, ToolError> {
    match (product_id, name.map(str::trim).filter(|n| !n.is_empty())) {
        (Some(id), _) => catalog.get_by_id(id).await,
        (None, Some(name)) => catalog.get_by_exact_name(name).await,
        (None, None) => Err(ToolError::validation(
            "productId",
            "either productId or name is required",
        )),
    }
}

pub(crate) fn not_found_by_id(id: i64) -> ToolError {
    ToolError::NotFound(format!("no product with id {id}"))
}

pub(crate) fn not_found_by_name(name: &str) -> ToolError {
    ToolError::NotFound(format!("no product named \"{}\"", name.trim()))
}
