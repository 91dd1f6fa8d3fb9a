//! Integration tests for the MCP tool server
//!
//! These tests drive the full router with a local catalog and in-memory cache:
//! - Server initialization and handshake
//! - Tool discovery and listing
//! - Catalog, cart and wishlist tool execution
//! - Error rendering inside the response envelope

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use async_trait::async_trait;
use commerce_tools_rust::backend::CommerceClient;
use commerce_tools_rust::cache::{CacheConnector, CacheError, CacheHandle, SharedStore};
use commerce_tools_rust::catalog::LocalCatalog;
use commerce_tools_rust::config::AppConfig;
use commerce_tools_rust::router::create_app_router;
use commerce_tools_rust::state::AppState;

/// Helper function to create a test app instance
async fn create_test_app() -> axum::Router {
    let state = AppState::from_config(&AppConfig::default())
        .await
        .expect("default configuration builds");
    create_app_router(Arc::new(state))
}

async fn send_raw(app: &axum::Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

/// Helper function to send a JSON-RPC request and get the response
async fn send_jsonrpc_request(
    app: &axum::Router,
    method: &str,
    params: Option<Value>,
    id: i32,
) -> (StatusCode, Value) {
    let request_body = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": id
    });
    send_raw(app, serde_json::to_string(&request_body).unwrap()).await
}

/// Calls a tool and returns `(text, isError)`
async fn call_tool(app: &axum::Router, name: &str, arguments: Value) -> (String, bool) {
    let (status, body) = send_jsonrpc_request(
        app,
        "tools/call",
        Some(json!({ "name": name, "arguments": arguments })),
        7,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 7);

    let result = &body["result"];
    let content = result["content"].as_array().expect("content array");
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["type"], "text");
    (
        content[0]["text"].as_str().unwrap().to_string(),
        result["isError"].as_bool().unwrap_or(false),
    )
}

#[tokio::test]
async fn test_mcp_initialize() {
    let app = create_test_app().await;

    let (status, body) = send_jsonrpc_request(&app, "initialize", None, 1).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], 1);

    let result = &body["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "commerce-tools-rust");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_mcp_tools_list() {
    let app = create_test_app().await;

    let (status, body) = send_jsonrpc_request(&app, "tools/list", None, 2).await;

    assert_eq!(status, StatusCode::OK);
    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 15);

    let add_to_cart = tools.iter().find(|t| t["name"] == "addToCart").unwrap();
    assert!(!add_to_cart["description"].as_str().unwrap().is_empty());
    let props = &add_to_cart["inputSchema"]["properties"];
    assert_eq!(props["productId"]["type"], "integer");
    assert_eq!(props["quantity"]["default"], 1);
    assert!(props["sessionKey"].is_object());

    let search = tools.iter().find(|t| t["name"] == "searchProducts").unwrap();
    assert_eq!(search["inputSchema"]["required"], json!(["query"]));
}

#[tokio::test]
async fn test_mcp_ping_and_unknown_method() {
    let app = create_test_app().await;

    let (status, body) = send_jsonrpc_request(&app, "ping", None, 3).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({}));

    let (status, body) = send_jsonrpc_request(&app, "resources/list", None, 4).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["id"], 4);
}

#[tokio::test]
async fn test_mcp_invalid_json() {
    let app = create_test_app().await;

    let (status, body) = send_raw(&app, "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32700);

    let (status, body) = send_raw(&app, json!({ "method": 5 }).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32700);
}

#[tokio::test]
async fn test_mcp_tool_call_without_name() {
    let app = create_test_app().await;

    let (status, body) =
        send_jsonrpc_request(&app, "tools/call", Some(json!({ "arguments": {} })), 5).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32602);
}

#[tokio::test]
async fn test_unknown_tool_is_rendered_as_error_result() {
    let app = create_test_app().await;

    let (text, is_error) = call_tool(&app, "checkout", json!({})).await;
    assert!(is_error);
    assert_eq!(text, "Error: unknown tool: checkout");
}

#[tokio::test]
async fn test_validation_errors_name_every_field() {
    let app = create_test_app().await;

    let (text, is_error) =
        call_tool(&app, "addToCart", json!({ "productId": "seven", "quantity": 0 })).await;
    assert!(is_error);
    assert!(text.starts_with("Error: invalid arguments:"), "{text}");
    assert!(text.contains("`productId`"), "{text}");
    assert!(text.contains("`quantity`"), "{text}");
}

#[tokio::test]
async fn test_search_products() {
    let app = create_test_app().await;

    let (text, is_error) = call_tool(&app, "searchProducts", json!({ "query": "coffee" })).await;
    assert!(!is_error);
    assert!(text.starts_with("Found 2 products matching \"coffee\""), "{text}");
    assert!(text.contains("#4 Coffee Mug - $12.00 [Kitchen]"), "{text}");
    assert!(text.contains("French Press"), "{text}");

    let (text, is_error) = call_tool(&app, "searchProducts", json!({ "query": "zzz" })).await;
    assert!(!is_error);
    assert_eq!(text, "Found 0 products matching \"zzz\".");
}

#[tokio::test]
async fn test_product_lookups() {
    let app = create_test_app().await;

    let (text, is_error) = call_tool(&app, "getProduct", json!({ "id": 8 })).await;
    assert!(!is_error);
    assert!(text.contains("Desk Lamp"), "{text}");

    let (text, is_error) = call_tool(&app, "getProduct", json!({ "id": 999 })).await;
    assert!(is_error);
    assert_eq!(text, "Error: not found: no product with id 999");

    let (text, is_error) =
        call_tool(&app, "getProductByName", json!({ "name": "yoga mat" })).await;
    assert!(!is_error);
    assert!(text.contains("#7 Yoga Mat"), "{text}");

    let (text, is_error) =
        call_tool(&app, "listProductsByCategory", json!({ "category": "sports" })).await;
    assert!(!is_error);
    assert!(text.contains("Running Shoes") && text.contains("Yoga Mat"), "{text}");
}

#[tokio::test]
async fn test_add_to_cart_merges_same_product() {
    let app = create_test_app().await;

    let (text, is_error) =
        call_tool(&app, "addToCart", json!({ "productId": 7, "sessionKey": "s1" })).await;
    assert!(!is_error, "{text}");
    assert!(text.contains("(now 1 in cart)"), "{text}");

    let (text, is_error) = call_tool(
        &app,
        "addToCart",
        json!({ "name": "Yoga Mat", "quantity": 2, "sessionKey": "s1" }),
    )
    .await;
    assert!(!is_error, "{text}");
    assert_eq!(
        text,
        "Added 2x Yoga Mat to cart \"s1\" (now 3 in cart). Cart: 3x Yoga Mat."
    );

    let (text, _) = call_tool(&app, "viewCart", json!({ "sessionKey": "s1" })).await;
    assert_eq!(
        text,
        "Cart \"s1\" (3 units):\n- [7] 3x Yoga Mat @ $29.99 = $89.97\nTotal: $89.97"
    );
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = create_test_app().await;

    call_tool(&app, "addToCart", json!({ "productId": 1, "sessionKey": "alice" })).await;

    let (text, _) = call_tool(&app, "viewCart", json!({ "sessionKey": "bob" })).await;
    assert_eq!(text, "Cart \"bob\" is empty.");

    // No session key falls back to the default session
    let (text, _) = call_tool(&app, "viewCart", json!({})).await;
    assert_eq!(text, "Cart \"default\" is empty.");
}

#[tokio::test]
async fn test_remove_and_clear_cart() {
    let app = create_test_app().await;

    call_tool(&app, "addToCart", json!({ "productId": 2, "sessionKey": "s2" })).await;
    call_tool(&app, "addToCart", json!({ "productId": 4, "sessionKey": "s2" })).await;

    let (text, is_error) = call_tool(
        &app,
        "removeFromCart",
        json!({ "itemKey": "2", "sessionKey": "s2" }),
    )
    .await;
    assert!(!is_error, "{text}");
    assert_eq!(
        text,
        "Removed 1x Wireless Mouse from cart \"s2\". Cart: 1x Coffee Mug."
    );

    let (text, is_error) = call_tool(
        &app,
        "removeFromCart",
        json!({ "itemKey": "2", "sessionKey": "s2" }),
    )
    .await;
    assert!(is_error);
    assert!(text.starts_with("Error: not found:"), "{text}");

    let (text, is_error) = call_tool(&app, "clearCart", json!({ "sessionKey": "s2" })).await;
    assert!(!is_error);
    assert!(text.starts_with("Cleared cart \"s2\": deleted 1 cart record(s)"), "{text}");

    // Clearing again is not an error
    let (text, is_error) = call_tool(&app, "clearCart", json!({ "sessionKey": "s2" })).await;
    assert!(!is_error);
    assert_eq!(
        text,
        "Cleared cart \"s2\": deleted 0 cart record(s), 0 item entries, 0 counter(s)."
    );
}

#[tokio::test]
async fn test_wishlist_deduplicates_by_name() {
    let app = create_test_app().await;

    let (text, is_error) = call_tool(
        &app,
        "addToWishlist",
        json!({ "email": "Ana@Example.com", "productId": 5 }),
    )
    .await;
    assert!(!is_error, "{text}");
    assert!(text.starts_with("Added #5 French Press"), "{text}");

    let (text, is_error) = call_tool(
        &app,
        "addToWishlist",
        json!({ "email": "ana@example.com ", "name": "french press" }),
    )
    .await;
    assert!(!is_error, "{text}");
    assert_eq!(
        text,
        "French Press is already present in the wishlist of ana@example.com."
    );

    let (text, _) = call_tool(&app, "viewWishlist", json!({ "email": "ANA@example.com" })).await;
    assert!(text.starts_with("Wishlist for ana@example.com (1 item):"), "{text}");
}

#[tokio::test]
async fn test_add_to_cart_unknown_product() {
    let app = create_test_app().await;

    let (text, is_error) =
        call_tool(&app, "addToCart", json!({ "name": "Teapot", "sessionKey": "s3" })).await;
    assert!(is_error);
    assert_eq!(text, "Error: not found: no product named \"Teapot\"");

    let (text, is_error) = call_tool(&app, "addToCart", json!({ "sessionKey": "s3" })).await;
    assert!(is_error);
    assert!(text.contains("either productId or name is required"), "{text}");

    let (text, _) = call_tool(&app, "viewCart", json!({ "sessionKey": "s3" })).await;
    assert_eq!(text, "Cart \"s3\" is empty.");
}

struct RefusingConnector;

#[async_trait]
impl CacheConnector for RefusingConnector {
    async fn connect(&self) -> Result<SharedStore, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn test_unreachable_cache_is_rendered_as_error_result() {
    let config = AppConfig::default();
    let client = CommerceClient::new(
        config.commerce_base_url.clone(),
        config.http_timeout,
        None,
    )
    .unwrap();
    let cache = CacheHandle::new("memory://down", Arc::new(RefusingConnector));
    let state = AppState::assemble(
        &config,
        Arc::new(LocalCatalog::bundled().unwrap()),
        Arc::new(client),
        cache,
    )
    .unwrap();
    let app = create_app_router(Arc::new(state));

    let (text, is_error) = call_tool(&app, "viewCart", json!({ "sessionKey": "s1" })).await;
    assert!(is_error);
    assert_eq!(text, "Error: cache unavailable: connection refused");

    // Catalog tools do not need the cache
    let (_, is_error) = call_tool(&app, "getProduct", json!({ "id": 1 })).await;
    assert!(!is_error);
}

#[tokio::test]
async fn test_colon_session_keys_do_not_collide() {
    let app = create_test_app().await;

    call_tool(&app, "addToCart", json!({ "productId": 1, "sessionKey": "alice" })).await;
    let (text, is_error) =
        call_tool(&app, "viewCart", json!({ "sessionKey": "alice:count" })).await;
    assert!(!is_error, "{text}");
    assert_eq!(text, "Cart \"alice:count\" is empty.");

    call_tool(&app, "addToCart", json!({ "productId": 3, "sessionKey": "c:item:x" })).await;
    let (text, _) = call_tool(&app, "clearCart", json!({ "sessionKey": "c" })).await;
    assert_eq!(
        text,
        "Cleared cart \"c\": deleted 0 cart record(s), 0 item entries, 0 counter(s)."
    );
    let (text, _) = call_tool(&app, "viewCart", json!({ "sessionKey": "c:item:x" })).await;
    assert!(text.contains("1x Mechanical Keyboard"), "{text}");
}
