//! Catalog answered by the commerce backend

use super::models::{Page, Product, MAX_PER_PAGE};
use super::{not_found_by_id, not_found_by_name, Catalog};
use crate::backend::CommerceClient;
use crate::error::ToolError;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    client: Arc<CommerceClient>,
}

impl RemoteCatalog {
    pub fn new(client: Arc<CommerceClient>) -> Self {
        Self { client }
    }

    /// Widest single page the backend will return
    fn wide_page() -> Page {
        Page {
            page: 1,
            per_page: MAX_PER_PAGE,
        }
    }
}

#[async_trait]
impl Catalog for RemoteCatalog {
    async fn search(&self, query: &str, page: Page) -> Result<Vec<Product>, ToolError> {
        if query.trim().is_empty() {
            return self.client.list_products(page).await;
        }
        self.client.search_products(query.trim(), page).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Product, ToolError> {
        match self.client.get_product(id).await {
            Err(ToolError::Backend {
                status_code: 404, ..
            }) => Err(not_found_by_id(id)),
            other => other,
        }
    }

    /// The backend only does fuzzy search, so the exact match is made here
    async fn get_by_exact_name(&self, name: &str) -> Result<Product, ToolError> {
        self.client
            .search_products(name.trim(), Self::wide_page())
            .await?
            .into_iter()
            .find(|p| p.has_name(name))
            .ok_or_else(|| not_found_by_name(name))
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, ToolError> {
        let products = self
            .client
            .list_products_in_category(category.trim(), Self::wide_page())
            .await?;
        Ok(products
            .into_iter()
            .filter(|p| p.in_category(category))
            .collect())
    }

    async fn list(&self, page: Page) -> Result<Vec<Product>, ToolError> {
        self.client.list_products(page).await
    }
}
