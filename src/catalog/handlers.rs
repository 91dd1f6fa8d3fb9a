//! Catalog tool handlers
//!
//! Registers the read-only product tools.

use super::helpers::{format_product_detail, format_product_list, plural};
use super::models::{Page, Product, MAX_PER_PAGE};
use super::SharedCatalog;
use crate::error::ToolError;
use crate::mcp::models::{
    GET_PRODUCT, GET_PRODUCT_BY_NAME, LIST_PRODUCTS, LIST_PRODUCTS_BY_CATEGORY, SEARCH_PRODUCTS,
};
use crate::mcp::{typed_handler, FieldSpec, InputSchema, ToolDescriptor, ToolRegistry};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArgs {
    query: String,
    page: u32,
    per_page: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListArgs {
    page: u32,
    per_page: u32,
}

#[derive(Debug, Deserialize)]
struct GetProductArgs {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ByNameArgs {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ByCategoryArgs {
    category: String,
}

fn page_fields(schema: InputSchema) -> InputSchema {
    schema
        .field(
            "page",
            FieldSpec::integer()
                .default_value(json!(1))
                .min(1)
                .describe("1-based page number"),
        )
        .field(
            "perPage",
            FieldSpec::integer()
                .default_value(json!(DEFAULT_PER_PAGE))
                .min(1)
                .max(MAX_PER_PAGE as i64)
                .describe("Products per page"),
        )
}

/// Registers every catalog tool
pub fn register(registry: &mut ToolRegistry, catalog: SharedCatalog) -> Result<(), ToolError> {
    let c = catalog.clone();
    registry.register(ToolDescriptor::new(
        SEARCH_PRODUCTS,
        "Search products by keyword (case-insensitive).",
        page_fields(
            InputSchema::new().field(
                "query",
                FieldSpec::string().required().describe("Words to look for"),
            ),
        ),
        typed_handler(move |args: SearchArgs| {
            let catalog = c.clone();
            async move {
                let page = Page::new(args.page, args.per_page)?;
                let products = catalog.search(&args.query, page).await?;
                Ok(render_search(&args.query, page, &products))
            }
        }),
    ))?;

    let c = catalog.clone();
    registry.register(ToolDescriptor::new(
        LIST_PRODUCTS,
        "List products page by page.",
        page_fields(InputSchema::new()),
        typed_handler(move |args: ListArgs| {
            let catalog = c.clone();
            async move {
                let page = Page::new(args.page, args.per_page)?;
                let products = catalog.list(page).await?;
                if products.is_empty() {
                    return Ok(format!("No products on page {}.", page.page));
                }
                Ok(format!(
                    "Page {} ({}):\n{}",
                    page.page,
                    plural(products.len(), "product", "products"),
                    format_product_list(&products)
                ))
            }
        }),
    ))?;

    let c = catalog.clone();
    registry.register(ToolDescriptor::new(
        GET_PRODUCT,
        "Show one product by its id.",
        InputSchema::new().field("id", FieldSpec::integer().required().describe("Product id")),
        typed_handler(move |args: GetProductArgs| {
            let catalog = c.clone();
            async move {
                let product = catalog.get_by_id(args.id).await?;
                Ok(format_product_detail(&product))
            }
        }),
    ))?;

    let c = catalog.clone();
    registry.register(ToolDescriptor::new(
        GET_PRODUCT_BY_NAME,
        "Show one product by its exact name (case-insensitive).",
        InputSchema::new().field("name", FieldSpec::string().required()),
        typed_handler(move |args: ByNameArgs| {
            let catalog = c.clone();
            async move {
                let product = catalog.get_by_exact_name(&args.name).await?;
                Ok(format_product_detail(&product))
            }
        }),
    ))?;

    let c = catalog;
    registry.register(ToolDescriptor::new(
        LIST_PRODUCTS_BY_CATEGORY,
        "List the products in a category (case-insensitive exact match).",
        InputSchema::new().field("category", FieldSpec::string().required()),
        typed_handler(move |args: ByCategoryArgs| {
            let catalog = c.clone();
            async move {
                let products = catalog.list_by_category(&args.category).await?;
                if products.is_empty() {
                    return Ok(format!("No products in category \"{}\".", args.category));
                }
                Ok(format!(
                    "{} in \"{}\":\n{}",
                    plural(products.len(), "product", "products"),
                    args.category,
                    format_product_list(&products)
                ))
            }
        }),
    ))?;

    Ok(())
}

fn render_search(query: &str, page: Page, products: &[Product]) -> String {
    if products.is_empty() {
        return format!("Found 0 products matching \"{query}\".");
    }
    format!(
        "Found {} matching \"{}\" (page {}):\n{}",
        plural(products.len(), "product", "products"),
        query,
        page.page,
        format_product_list(products)
    )
}
