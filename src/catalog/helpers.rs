//! Product text rendering
//!
//! Output depends only on the products passed in, so the same data always
//! renders the same text.

use super::models::Product;
use rust_decimal::Decimal;

/// Two-decimal price with a dollar sign, e.g. `$12.00`
pub fn format_price(price: Decimal) -> String {
    format!("${:.2}", price.round_dp(2))
}

/// One-line summary: `#4 Coffee Mug - $12.00 [Kitchen]`
pub fn format_product_line(product: &Product) -> String {
    let mut line = format!(
        "#{} {} - {}",
        product.id,
        product.name,
        format_price(product.price)
    );
    if let Some(category) = &product.category {
        line.push_str(&format!(" [{category}]"));
    }
    line
}

/// Summary line followed by the description, when there is one
pub fn format_product_detail(product: &Product) -> String {
    match product.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => {
            format!("{}\n  {}", format_product_line(product), description)
        }
        _ => format_product_line(product),
    }
}

/// Bulleted list, one product per line
pub fn format_product_list(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| format!("- {}", format_product_line(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
