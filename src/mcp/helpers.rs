//! JSON-RPC envelope helpers

use serde_json::{json, Value};

/// Body was not valid JSON, or not a request object
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
/// `params` did not match what the method expects
pub const INVALID_PARAMS: i32 = -32602;

/// Builds a JSON-RPC 2.0 success response echoing `id`.
pub fn rpc_success(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

/// Builds a JSON-RPC 2.0 error response.
///
/// `id` is `null` when the request could not be read far enough to find one.
pub fn rpc_error(id: Value, code: i32, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        }
    })
}
