//! Application State
//!
//! Builds the tool registry from configuration and owns the process-wide
//! cache handle so it can be torn down at shutdown.

use crate::backend::{self, CommerceClient};
use crate::cache::{CacheError, CacheHandle};
use crate::cart::{self, CartDeps, SessionStore};
use crate::catalog::{self, LocalCatalog, RemoteCatalog, SharedCatalog};
use crate::config::{AppConfig, CatalogMode, ConfigError};
use crate::error::ToolError;
use crate::mcp::ToolRegistry;
use std::sync::Arc;
use thiserror::Error;

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cache: {0}")]
    Cache(#[from] CacheError),

    #[error("failed to load products: {0}")]
    Catalog(#[from] std::io::Error),

    #[error("bundled products are invalid: {0}")]
    BundledCatalog(#[from] serde_json::Error),

    #[error("tool registration failed: {0}")]
    Registry(#[from] ToolError),
}

/// Registered tools plus the resources they share
#[derive(Debug)]
pub struct AppState {
    pub registry: ToolRegistry,
    pub cache: CacheHandle,
}

impl AppState {
    /// Builds every component the configuration asks for
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let client = Arc::new(CommerceClient::new(
            config.commerce_base_url.clone(),
            config.http_timeout,
            config.credentials.clone(),
        )?);

        let catalog: SharedCatalog = match config.catalog_mode {
            CatalogMode::Remote => Arc::new(RemoteCatalog::new(client.clone())),
            CatalogMode::Local => {
                let local = match &config.products_file {
                    Some(path) => LocalCatalog::from_file(path).await?,
                    None => LocalCatalog::bundled()?,
                };
                if local.is_empty() {
                    tracing::warn!("Local catalog has no products");
                } else {
                    tracing::info!(products = local.len(), "Loaded local catalog");
                }
                Arc::new(local)
            }
        };

        let cache = CacheHandle::from_url(&config.cache_url)?;
        Self::assemble(config, catalog, client, cache)
    }

    /// Registers all tools over the given components
    pub fn assemble(
        config: &AppConfig,
        catalog: SharedCatalog,
        client: Arc<CommerceClient>,
        cache: CacheHandle,
    ) -> Result<Self, StartupError> {
        let sessions = Arc::new(SessionStore::new(
            cache.clone(),
            config.cart_ttl,
            config.wishlist_ttl,
        ));

        let mut registry = ToolRegistry::new();
        catalog::handlers::register(&mut registry, catalog.clone())?;
        cart::handlers::register(
            &mut registry,
            CartDeps {
                catalog,
                sessions,
                default_session_key: Arc::from(config.default_session_key.as_str()),
            },
        )?;
        backend::handlers::register(&mut registry, client)?;

        tracing::info!(tools = ?registry.names(), "Tool registry ready");
        Ok(Self { registry, cache })
    }

    /// Teardown hook: releases the cache connection
    pub async fn shutdown(&self) {
        if let Err(e) = self.cache.shutdown().await {
            tracing::warn!(error = %e, "Cache shutdown failed");
        }
    }
}
