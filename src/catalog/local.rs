//! In-memory catalog
//!
//! Holds a product collection loaded once at startup.

use super::models::{Page, Product};
use super::{not_found_by_id, not_found_by_name, Catalog};
use crate::error::ToolError;
use async_trait::async_trait;
use std::path::Path;

/// Product list shipped with the crate, used when no file is configured
const BUNDLED_PRODUCTS: &str = include_str!("../../data/products.json");

#[derive(Debug, Clone, Default)]
pub struct LocalCatalog {
    products: Vec<Product>,
}

impl LocalCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(BUNDLED_PRODUCTS)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub async fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl Catalog for LocalCatalog {
    async fn search(&self, query: &str, page: Page) -> Result<Vec<Product>, ToolError> {
        let matches: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.matches_query(query))
            .cloned()
            .collect();
        Ok(page.apply(&matches))
    }

    async fn get_by_id(&self, id: i64) -> Result<Product, ToolError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found_by_id(id))
    }

    async fn get_by_exact_name(&self, name: &str) -> Result<Product, ToolError> {
        self.products
            .iter()
            .find(|p| p.has_name(name))
            .cloned()
            .ok_or_else(|| not_found_by_name(name))
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, ToolError> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.in_category(category))
            .cloned()
            .collect())
    }

    async fn list(&self, page: Page) -> Result<Vec<Product>, ToolError> {
        Ok(page.apply(&self.products))
    }
}
