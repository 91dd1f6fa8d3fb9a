//! Cache key layout
//!
//! Caller-chosen session and identity keys are escaped so they never contain
//! `:`. A record key therefore cannot equal, or start with, another session's
//! counter or audit key.

/// Escapes `%` and `:` so the result is one colon-free key segment
fn segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            other => out.push(other),
        }
    }
    out
}

pub fn cart(session_key: &str) -> String {
    format!("cart:{}", segment(session_key))
}

pub fn cart_count(session_key: &str) -> String {
    format!("cart:{}:count", segment(session_key))
}

/// Prefix shared by all audit entries of one cart
pub fn cart_items_prefix(session_key: &str) -> String {
    format!("cart:{}:item:", segment(session_key))
}

pub fn cart_item(session_key: &str, timestamp_millis: i64, seq: i64) -> String {
    format!("{}{timestamp_millis}-{seq}", cart_items_prefix(session_key))
}

pub fn wishlist(identity_key: &str) -> String {
    format!("wishlist:{}", segment(identity_key))
}
