//! Catalog Domain Models

use crate::error::ToolError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest page size any listing accepts
pub const MAX_PER_PAGE: u32 = 100;

/// A product as exposed to tools. Read-only for this service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,

    pub name: String,

    pub price: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Product {
    /// Case-insensitive comparison on the trimmed product name
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.trim().to_lowercase() == category.trim().to_lowercase())
    }

    /// Substring match on the whole query, or every keyword present somewhere
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let haystack = format!(
            "{} {} {}",
            self.name,
            self.description.as_deref().unwrap_or_default(),
            self.category.as_deref().unwrap_or_default()
        )
        .to_lowercase();

        haystack.contains(&query) || query.split_whitespace().all(|term| haystack.contains(term))
    }
}

/// Validated 1-based pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn new(page: u32, per_page: u32) -> Result<Self, ToolError> {
        if page < 1 {
            return Err(ToolError::validation("page", "must be at least 1"));
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(ToolError::validation(
                "perPage",
                format!("must be between 1 and {MAX_PER_PAGE}"),
            ));
        }
        Ok(Self { page, per_page })
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.per_page as usize
    }

    /// The slice of `items` covered by this page
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset())
            .take(self.per_page as usize)
            .cloned()
            .collect()
    }
}
