//! Store cart tool handlers
//!
//! The store cart lives in the commerce backend itself, not in the cache.

use super::client::CommerceClient;
use super::models::StoreCart;
use crate::catalog::helpers::{format_price, plural};
use crate::error::ToolError;
use crate::mcp::models::{
    ADD_TO_STORE_CART, CLEAR_STORE_CART, REMOVE_FROM_STORE_CART, VIEW_STORE_CART,
};
use crate::mcp::{typed_handler, FieldSpec, InputSchema, ToolDescriptor, ToolRegistry};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddArgs {
    product_id: i64,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveArgs {
    item_key: String,
}

/// Text listing of the backend cart
pub fn format_store_cart(cart: &StoreCart) -> String {
    if cart.items.is_empty() {
        return "Store cart is empty.".to_string();
    }

    let lines: Vec<String> = cart
        .items
        .iter()
        .map(|i| {
            let price = i.price.map(|p| format!(" @ {}", format_price(p))).unwrap_or_default();
            format!("- [{}] {}x {} (#{}){}", i.key, i.quantity, i.name, i.id, price)
        })
        .collect();
    format!(
        "Store cart ({}):\n{}",
        plural(cart.total_quantity() as usize, "unit", "units"),
        lines.join("\n")
    )
}

/// Registers the backend cart tools
pub fn register(registry: &mut ToolRegistry, client: Arc<CommerceClient>) -> Result<(), ToolError> {
    let c = client.clone();
    registry.register(ToolDescriptor::new(
        VIEW_STORE_CART,
        "Show the cart held by the store backend.",
        InputSchema::new(),
        typed_handler(move |_: Value| {
            let client = c.clone();
            async move { Ok(format_store_cart(&client.get_cart().await?)) }
        }),
    ))?;

    let c = client.clone();
    registry.register(ToolDescriptor::new(
        ADD_TO_STORE_CART,
        "Add a product to the cart held by the store backend.",
        InputSchema::new()
            .field("productId", FieldSpec::integer().required())
            .field("quantity", FieldSpec::integer().default_value(json!(1)).min(1)),
        typed_handler(move |args: AddArgs| {
            let client = c.clone();
            async move {
                let cart = client.add_cart_item(args.product_id, args.quantity).await?;
                Ok(format!(
                    "Added {}x product #{} to the store cart.\n{}",
                    args.quantity,
                    args.product_id,
                    format_store_cart(&cart)
                ))
            }
        }),
    ))?;

    let c = client.clone();
    registry.register(ToolDescriptor::new(
        REMOVE_FROM_STORE_CART,
        "Remove a line from the store backend cart by its item key.",
        InputSchema::new().field("itemKey", FieldSpec::string().required()),
        typed_handler(move |args: RemoveArgs| {
            let client = c.clone();
            async move {
                let item_key = args.item_key.trim();
                if item_key.is_empty() {
                    return Err(ToolError::validation("itemKey", "must not be empty"));
                }
                let cart = client.remove_cart_item(item_key).await?;
                Ok(format!(
                    "Removed item {} from the store cart.\n{}",
                    item_key,
                    format_store_cart(&cart)
                ))
            }
        }),
    ))?;

    let c = client;
    registry.register(ToolDescriptor::new(
        CLEAR_STORE_CART,
        "Remove every item from the store backend cart.",
        InputSchema::new(),
        typed_handler(move |_: Value| {
            let client = c.clone();
            async move {
                client.clear_cart_items().await?;
                Ok("Store cart cleared.".to_string())
            }
        }),
    ))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StoreCartItem;
    use rust_decimal::Decimal;

    #[test]
    fn renders_store_cart() {
        let cart = StoreCart {
            items: vec![StoreCartItem {
                key: "9f2c".into(),
                id: 1,
                name: "Laptop".into(),
                quantity: 2,
                price: Some(Decimal::new(99999, 2)),
            }],
            items_count: None,
        };
        assert_eq!(
            format_store_cart(&cart),
            "Store cart (2 units):\n- [9f2c] 2x Laptop (#1) @ $999.99"
        );
        assert_eq!(format_store_cart(&StoreCart::default()), "Store cart is empty.");
    }

    #[tokio::test]
    async fn blank_item_key_is_rejected_before_any_request() {
        // Nothing listens here; reaching the network would give a 502
        let client =
            CommerceClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1), None)
                .unwrap();
        let mut registry = ToolRegistry::new();
        register(&mut registry, Arc::new(client)).unwrap();

        let err = registry
            .try_invoke(REMOVE_FROM_STORE_CART, json!({ "itemKey": "   " }))
            .await
            .unwrap_err();
        let issues = match err {
            ToolError::Validation(issues) => issues,
            other => panic!("expected a validation error, got {other:?}"),
        };
        assert_eq!(issues.fields(), vec!["itemKey"]);
    }
}
