//! MCP (Model Context Protocol) route handlers
//!
//! This module implements the JSON-RPC endpoint the hosting gateway talks to.
//! Tool calls are forwarded to the registry; tool failures come back as normal
//! results with `isError` set, never as JSON-RPC errors.

use super::{helpers::*, models::*};
use crate::state::{AppState, SharedState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};

/// Creates routes for MCP-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(handle_mcp))
        .route("/mcp", post(handle_mcp)) // Standard endpoint
        .route("/mcp/", post(handle_mcp)) // Trailing slash safety
}

/// Endpoint: POST /mcp
/// Handles the Model Context Protocol communication for POST requests.
async fn handle_mcp(
    State(state): State<SharedState>,
    body: Result<Json<JsonRpcRequest>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    // Parse JSON-RPC Request (POST)
    let req = match body {
        Ok(Json(r)) => r,
        Err(e) => {
            tracing::warn!(error = %e.body_text(), "JSON parse error");
            return (
                StatusCode::BAD_REQUEST,
                Json(rpc_error(Value::Null, PARSE_ERROR, "Parse error")),
            )
                .into_response();
        }
    };

    let id = req.id.unwrap_or(Value::Null);
    let method_name = req.method.as_str();
    let params = req.params.unwrap_or(Value::Null);

    tracing::debug!(method = method_name, id = %id, "MCP call");

    // Dispatch Method
    let response_body = match method_name {
        "initialize" => rpc_success(id, handle_initialize()),
        "notifications/initialized" => rpc_success(id, json!({})),
        "tools/list" => rpc_success(id, state.registry.listing()),
        "tools/call" => match handle_tool_call(&state, params).await {
            Ok(result) => rpc_success(id, result),
            Err(msg) => rpc_error(id, INVALID_PARAMS, msg),
        },
        "ping" => rpc_success(id, json!({})), // Optional but good for health checks
        _ => {
            tracing::warn!(method = method_name, "Unknown method");
            rpc_error(id, METHOD_NOT_FOUND, "Method not found")
        }
    };

    Json(response_body).into_response()
}

// =============================================================================
// MCP Method Handlers
// =============================================================================

/// Handles `initialize` request (Handshake).
fn handle_initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Handles `tools/call` request.
///
/// Only a malformed request envelope is an `Err`; every tool outcome,
/// including an unknown tool name, is an `Ok` response body.
pub async fn handle_tool_call(state: &AppState, params: Value) -> Result<Value, String> {
    let call: ToolCallParams =
        serde_json::from_value(params).map_err(|e| format!("Invalid params: {}", e))?;

    let response = state.registry.invoke(&call.name, call.arguments).await;
    serde_json::to_value(response).map_err(|e| format!("Unserializable tool response: {}", e))
}
