//! Commerce backend HTTP client
//!
//! Thin typed layer over the backend's REST surface. Every failure, HTTP or
//! transport, comes back as `ToolError::Backend`. There are no retries here.

use super::models::{AddItemRequest, StoreCart, WireProduct};
use crate::catalog::models::{Page, Product};
use crate::config::Credentials;
use crate::error::ToolError;
use reqwest::{header, Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Status reported when the backend could not be reached
pub const TRANSPORT_FAILURE_STATUS: u16 = 502;
/// Status reported when a call exceeded the configured timeout
pub const TIMEOUT_STATUS: u16 = 504;

#[derive(Debug, Clone)]
pub struct CommerceClient {
    http: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl CommerceClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        credentials: Option<Credentials>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ToolError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ToolError::Internal(format!("invalid backend URL `{}`: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ToolError::Internal(format!("backend URL `{}` cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues one request and returns the JSON body, if any.
    ///
    /// A body that is empty or not JSON is reported as `None`.
    pub async fn request(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, ToolError> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        tracing::debug!(%method, %url, "Calling commerce backend");

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(creds) = &self.credentials {
            builder = builder.basic_auth(&creds.key, Some(&creds.secret));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&path, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&path, e))?;
        let json = parse_body(&text);

        if !status.is_success() {
            let message = error_message(status, json.as_ref());
            tracing::warn!(%method, %path, status = status.as_u16(), %message, "Backend call failed");
            return Err(ToolError::backend(status.as_u16(), message));
        }

        Ok(json)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T, ToolError> {
        let json = self.request(method, segments, query, body).await?;
        decode(&segments.join("/"), json)
    }

    pub async fn search_products(&self, query: &str, page: Page) -> Result<Vec<Product>, ToolError> {
        let mut params = page_params(page);
        params.insert(0, ("search", query.to_string()));
        let wire: Vec<WireProduct> = self.call(Method::GET, &["products"], &params, None).await?;
        Ok(wire.into_iter().map(Product::from).collect())
    }

    pub async fn list_products(&self, page: Page) -> Result<Vec<Product>, ToolError> {
        let wire: Vec<WireProduct> = self
            .call(Method::GET, &["products"], &page_params(page), None)
            .await?;
        Ok(wire.into_iter().map(Product::from).collect())
    }

    pub async fn list_products_in_category(
        &self,
        category: &str,
        page: Page,
    ) -> Result<Vec<Product>, ToolError> {
        let mut params = page_params(page);
        params.insert(0, ("category", category.to_string()));
        let wire: Vec<WireProduct> = self.call(Method::GET, &["products"], &params, None).await?;
        Ok(wire.into_iter().map(Product::from).collect())
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, ToolError> {
        let wire: WireProduct = self
            .call(Method::GET, &["products", &id.to_string()], &[], None)
            .await?;
        Ok(wire.into())
    }

    pub async fn get_cart(&self) -> Result<StoreCart, ToolError> {
        self.cart_call(Method::GET, &["cart"], None).await
    }

    pub async fn add_cart_item(&self, id: i64, quantity: u32) -> Result<StoreCart, ToolError> {
        let body = serde_json::to_value(AddItemRequest { id, quantity })
            .map_err(|e| ToolError::Internal(e.to_string()))?;
        self.cart_call(Method::POST, &["cart", "add-item"], Some(&body))
            .await
    }

    pub async fn remove_cart_item(&self, key: &str) -> Result<StoreCart, ToolError> {
        self.cart_call(Method::POST, &["cart", "remove-item", key], None)
            .await
    }

    pub async fn clear_cart_items(&self) -> Result<StoreCart, ToolError> {
        self.cart_call(Method::DELETE, &["cart", "items"], None).await
    }

    /// Cart mutations may answer with an empty body; that reads as an empty cart
    async fn cart_call(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
    ) -> Result<StoreCart, ToolError> {
        match self.request(method, segments, &[], body).await? {
            None => Ok(StoreCart::default()),
            Some(json) => decode(&segments.join("/"), Some(json)),
        }
    }
}

fn page_params(page: Page) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.page.to_string()),
        ("per_page", page.per_page.to_string()),
    ]
}

fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text).ok()
}

/// Picks the message for a failed call: `message`, then `code`, then the status line
pub fn error_message(status: StatusCode, body: Option<&Value>) -> String {
    let field = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    field("message").or_else(|| field("code")).unwrap_or_else(|| {
        format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    })
}

fn transport_error(path: &str, err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        ToolError::backend(TIMEOUT_STATUS, format!("request to {path} timed out"))
    } else {
        ToolError::backend(
            TRANSPORT_FAILURE_STATUS,
            format!("request to {path} failed: {err}"),
        )
    }
}

fn decode<T: DeserializeOwned>(path: &str, json: Option<Value>) -> Result<T, ToolError> {
    let json = json.ok_or_else(|| {
        ToolError::backend(
            TRANSPORT_FAILURE_STATUS,
            format!("empty or non-JSON response from {path}"),
        )
    })?;
    serde_json::from_value(json).map_err(|e| {
        ToolError::backend(
            TRANSPORT_FAILURE_STATUS,
            format!("unexpected response from {path}: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_field_wins() {
        let body = json!({ "code": "woocommerce_rest_invalid_id", "message": "Invalid ID." });
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, Some(&body)),
            "Invalid ID."
        );
    }

    #[test]
    fn code_used_when_message_missing() {
        let body = json!({ "code": "rest_no_route" });
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, Some(&body)),
            "rest_no_route"
        );
    }

    #[test]
    fn status_line_used_without_body() {
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, None),
            "503 Service Unavailable"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, Some(&json!(["not", "an", "object"]))),
            "502 Bad Gateway"
        );
    }

    #[test]
    fn non_json_body_is_absent() {
        assert_eq!(parse_body("<html>oops</html>"), None);
        assert_eq!(parse_body("   "), None);
        assert_eq!(parse_body(r#"{"ok":true}"#), Some(json!({ "ok": true })));
    }

    #[test]
    fn endpoint_escapes_each_segment() {
        let client = CommerceClient::new(
            "http://127.0.0.1:8080/wp-json/commerce/v1/",
            Duration::from_secs(1),
            None,
        )
        .unwrap();

        let url = client.endpoint(&["cart", "remove-item", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/wp-json/commerce/v1/cart/remove-item/a%2Fb%20c"
        );
        assert_eq!(
            client.endpoint(&["products", "7"]).unwrap().path(),
            "/wp-json/commerce/v1/products/7"
        );
    }
}
