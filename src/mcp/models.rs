//! MCP Protocol Models and Constants
//!
//! This module contains all data structures and constants related to the
//! Model Context Protocol (MCP) specification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// MCP Constants
// =============================================================================

/// Server identifier
pub const SERVER_NAME: &str = "commerce-tools-rust";
/// Protocol version for MCP
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// =============================================================================
// Tool Names
// =============================================================================

pub const SEARCH_PRODUCTS: &str = "searchProducts";
pub const LIST_PRODUCTS: &str = "listProducts";
pub const GET_PRODUCT: &str = "getProduct";
pub const GET_PRODUCT_BY_NAME: &str = "getProductByName";
pub const LIST_PRODUCTS_BY_CATEGORY: &str = "listProductsByCategory";

pub const ADD_TO_CART: &str = "addToCart";
pub const VIEW_CART: &str = "viewCart";
pub const REMOVE_FROM_CART: &str = "removeFromCart";
pub const CLEAR_CART: &str = "clearCart";
pub const ADD_TO_WISHLIST: &str = "addToWishlist";
pub const VIEW_WISHLIST: &str = "viewWishlist";

pub const VIEW_STORE_CART: &str = "viewStoreCart";
pub const ADD_TO_STORE_CART: &str = "addToStoreCart";
pub const REMOVE_FROM_STORE_CART: &str = "removeFromStoreCart";
pub const CLEAR_STORE_CART: &str = "clearStoreCart";

// =============================================================================
// MCP Protocol Models
// =============================================================================

/// Standard JSON-RPC 2.0 Request envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version (should be "2.0")
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,

    /// Method name to invoke
    pub method: String,

    /// Parameters for the method
    pub params: Option<Value>,

    /// Request identifier
    pub id: Option<Value>,
}

/// Parameters of a `tools/call` request
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,

    #[serde(default)]
    pub arguments: Value,
}

/// One block of tool output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextContent {
    /// Always "text"
    #[serde(rename = "type")]
    pub kind: String,

    pub text: String,
}

/// Uniform tool reply. Failures keep this shape and set `is_error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResponse {
    pub content: Vec<TextContent>,

    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }

    /// Concatenated text of all content blocks
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
