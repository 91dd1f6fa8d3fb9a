//! Commerce Backend Wire Models
//!
//! The backend speaks WooCommerce-flavoured JSON: prices may be strings (or
//! empty), categories come as a list. These types absorb that and convert to
//! the catalog's `Product`.

use crate::catalog::models::Product;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Plain decimal first, then exponent form (`1e21`, `1.5E-7`)
fn parse_decimal(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw))
}

/// Reads a price given as a number, a numeric string, an empty string or null
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => {
            Some(parse_decimal(s.trim()).map_err(serde::de::Error::custom)?)
        }
        Some(Value::Number(n)) => {
            Some(parse_decimal(&n.to_string()).map_err(serde::de::Error::custom)?)
        }
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected a price, found {other}"
            )))
        }
    };
    Ok(parsed)
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireCategory {
    pub name: String,
}

/// Product as returned by `/products` endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct WireProduct {
    pub id: i64,

    pub name: String,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub short_description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub categories: Vec<WireCategory>,
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        let description = wire
            .short_description
            .filter(|d| !d.trim().is_empty())
            .or(wire.description)
            .filter(|d| !d.trim().is_empty());
        let category = wire
            .category
            .or_else(|| wire.categories.into_iter().next().map(|c| c.name));

        Product {
            id: wire.id,
            name: wire.name,
            price: wire.price.unwrap_or_default(),
            description,
            category,
        }
    }
}

/// One line of the backend-held cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreCartItem {
    pub key: String,

    pub id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
}

fn default_quantity() -> u32 {
    1
}

/// Normalized view of the backend cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StoreCart {
    #[serde(default)]
    pub items: Vec<StoreCartItem>,

    #[serde(default)]
    pub items_count: Option<u32>,
}

impl StoreCart {
    pub fn total_quantity(&self) -> u32 {
        self.items_count
            .unwrap_or_else(|| self.items.iter().map(|i| i.quantity).sum())
    }
}

/// Body of `POST /cart/add-item`
#[derive(Debug, Serialize)]
pub struct AddItemRequest {
    pub id: i64,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn woo_product_converts() {
        let wire: WireProduct = serde_json::from_value(json!({
            "id": 11,
            "name": "Hoodie",
            "price": "45.00",
            "description": "<p>Long</p>",
            "short_description": "",
            "categories": [{ "id": 3, "name": "Clothing" }, { "id": 4, "name": "Sale" }]
        }))
        .unwrap();

        let product = Product::from(wire);
        assert_eq!(product.price, Decimal::new(4500, 2));
        assert_eq!(product.category.as_deref(), Some("Clothing"));
        assert_eq!(product.description.as_deref(), Some("<p>Long</p>"));
    }

    #[test]
    fn empty_price_becomes_zero() {
        let wire: WireProduct =
            serde_json::from_value(json!({ "id": 1, "name": "Free", "price": "" })).unwrap();
        assert_eq!(Product::from(wire).price, Decimal::ZERO);
    }

    #[test]
    fn exponent_prices_are_read() {
        let price = |value: Value| {
            let wire: WireProduct =
                serde_json::from_value(json!({ "id": 1, "name": "X", "price": value })).unwrap();
            Product::from(wire).price
        };
        assert_eq!(price(json!(1.5e-7)), Decimal::new(15, 8));
        assert_eq!(price(json!(1e21)), Decimal::from_str("1000000000000000000000").unwrap());
        assert_eq!(price(json!("2.5E3")), Decimal::new(2500, 0));
        assert_eq!(price(json!(12.5)), Decimal::new(125, 1));
    }

    #[test]
    fn cart_quantity_falls_back_to_line_sum() {
        let cart: StoreCart = serde_json::from_value(json!({
            "items": [
                { "key": "a1", "id": 1, "name": "Laptop", "quantity": 2 },
                { "key": "b2", "id": 2, "name": "Mouse" }
            ]
        }))
        .unwrap();
        assert_eq!(cart.total_quantity(), 3);
    }
}
