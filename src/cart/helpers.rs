//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for cart operations and formatting.

use super::models::{CartItem, CartRecord, WishlistRecord};
use crate::catalog::helpers::{format_price, format_product_line, plural};

/// Returns the provided session key, or `default` when it is missing or blank.
pub fn resolve_session_key(session_key: Option<String>, default: &str) -> String {
    session_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Identity keys (emails) compare case-insensitively
pub fn normalize_identity(identity: &str) -> String {
    identity.trim().to_lowercase()
}

/// Merges `incoming` into `cart_items`, aggregating quantities for an existing
/// line of the same product and appending a new line otherwise.
///
/// The existing line keeps its name and price; only quantity changes.
pub fn merge_item(cart_items: &mut Vec<CartItem>, incoming: CartItem) {
    if let Some(existing) = cart_items
        .iter_mut()
        .find(|i| i.product_id == incoming.product_id)
    {
        // Aggregate quantities.
        existing.quantity = existing.quantity.saturating_add(incoming.quantity);
    } else {
        // Insert a brand-new item.
        cart_items.push(incoming);
    }
}

/// Produces a human-readable one-line summary for a list of cart items.
///
/// Example output: `"2x Laptop, 1x Yoga Mat"`.
pub fn format_item_summary(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full cart listing with line keys and total
pub fn format_cart(cart: &CartRecord) -> String {
    if cart.is_empty() {
        return format!("Cart \"{}\" is empty.", cart.session_key);
    }

    let lines: Vec<String> = cart
        .items
        .iter()
        .map(|i| {
            format!(
                "- [{}] {}x {} @ {} = {}",
                i.key,
                i.quantity,
                i.name,
                format_price(i.price),
                format_price(i.line_total())
            )
        })
        .collect();

    format!(
        "Cart \"{}\" ({}):\n{}\nTotal: {}",
        cart.session_key,
        plural(cart.unit_count() as usize, "unit", "units"),
        lines.join("\n"),
        format_price(cart.total())
    )
}

pub fn format_wishlist(wishlist: &WishlistRecord) -> String {
    if wishlist.items.is_empty() {
        return format!("Wishlist for {} is empty.", wishlist.identity_key);
    }

    let lines: Vec<String> = wishlist
        .items
        .iter()
        .map(|p| format!("- {}", format_product_line(p)))
        .collect();
    format!(
        "Wishlist for {} ({}):\n{}",
        wishlist.identity_key,
        plural(wishlist.items.len(), "item", "items"),
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn item(id: i64, name: &str, quantity: u32) -> CartItem {
        CartItem {
            key: id.to_string(),
            product_id: id,
            name: name.into(),
            price: Decimal::new(250, 2),
            quantity,
        }
    }

    #[test]
    fn merge_aggregates_by_product_id() {
        let mut items = vec![item(7, "Yoga Mat", 1)];
        merge_item(&mut items, item(7, "Yoga Mat", 2));
        merge_item(&mut items, item(2, "Wireless Mouse", 1));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(format_item_summary(&items), "3x Yoga Mat, 1x Wireless Mouse");
    }

    #[test]
    fn session_key_falls_back_to_default() {
        assert_eq!(resolve_session_key(None, "default"), "default");
        assert_eq!(resolve_session_key(Some("  ".into()), "default"), "default");
        assert_eq!(resolve_session_key(Some(" abc ".into()), "default"), "abc");
    }

    #[test]
    fn cart_rendering_is_stable() {
        let mut cart = CartRecord::empty("s1", Utc::now());
        assert_eq!(format_cart(&cart), "Cart \"s1\" is empty.");

        cart.items = vec![item(7, "Yoga Mat", 2)];
        assert_eq!(
            format_cart(&cart),
            "Cart \"s1\" (2 units):\n- [7] 2x Yoga Mat @ $2.50 = $5.00\nTotal: $5.00"
        );
    }
}
