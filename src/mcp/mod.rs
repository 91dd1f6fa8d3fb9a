//! Model Context Protocol (MCP) Module
//!
//! This module contains the tool dispatcher and its protocol surface, including:
//! - Protocol models (JsonRpcRequest, ToolResponse, tool names)
//! - Input schemas and argument validation
//! - The tool registry that validates, dispatches and renders every call
//! - RPC helpers and the JSON-RPC route handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod registry;
pub mod schema;

// Re-export commonly used types and functions
pub use handlers::routes;
pub use models::ToolResponse;
pub use registry::{typed_handler, ToolDescriptor, ToolRegistry};
pub use schema::{FieldSpec, InputSchema};
