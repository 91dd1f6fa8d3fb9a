//! Session cart and wishlist tool handlers
//!
//! These tools keep their state in the cache through `SessionStore`; product
//! details are looked up in the catalog first.

use super::helpers::{format_cart, format_item_summary, format_wishlist, resolve_session_key};
use super::models::WishlistOutcome;
use super::store::SessionStore;
use crate::catalog::helpers::format_product_line;
use crate::catalog::{resolve_product, SharedCatalog};
use crate::error::ToolError;
use crate::mcp::models::{
    ADD_TO_CART, ADD_TO_WISHLIST, CLEAR_CART, REMOVE_FROM_CART, VIEW_CART, VIEW_WISHLIST,
};
use crate::mcp::{typed_handler, FieldSpec, InputSchema, ToolDescriptor, ToolRegistry};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Largest quantity a single add accepts
const MAX_QUANTITY: i64 = 999;

/// What the cart tools need at call time
#[derive(Clone)]
pub struct CartDeps {
    pub catalog: SharedCatalog,
    pub sessions: Arc<SessionStore>,
    pub default_session_key: Arc<str>,
}

impl CartDeps {
    fn session(&self, session_key: Option<String>) -> String {
        resolve_session_key(session_key, &self.default_session_key)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartArgs {
    product_id: Option<i64>,
    name: Option<String>,
    quantity: u32,
    session_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionArgs {
    session_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveArgs {
    item_key: String,
    session_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToWishlistArgs {
    email: String,
    product_id: Option<i64>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ViewWishlistArgs {
    email: String,
}

fn session_field(schema: InputSchema) -> InputSchema {
    schema.field(
        "sessionKey",
        FieldSpec::string().describe("Cart to use; the shared default cart when omitted"),
    )
}

fn product_ref_fields(schema: InputSchema) -> InputSchema {
    schema
        .field(
            "productId",
            FieldSpec::integer().describe("Product id (takes precedence over name)"),
        )
        .field(
            "name",
            FieldSpec::string().describe("Exact product name, used when productId is absent"),
        )
}

fn identity(email: &str) -> Result<&str, ToolError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ToolError::validation("email", "must not be empty"));
    }
    Ok(email)
}

/// Registers the session cart and wishlist tools
pub fn register(registry: &mut ToolRegistry, deps: CartDeps) -> Result<(), ToolError> {
    let d = deps.clone();
    registry.register(ToolDescriptor::new(
        ADD_TO_CART,
        "Add a product to the cart by product id or exact name. Adding a product already in the cart increases its quantity.",
        session_field(product_ref_fields(InputSchema::new()).field(
            "quantity",
            FieldSpec::integer()
                .default_value(json!(1))
                .min(1)
                .max(MAX_QUANTITY),
        )),
        typed_handler(move |args: AddToCartArgs| {
            let deps = d.clone();
            async move {
                let product =
                    resolve_product(deps.catalog.as_ref(), args.product_id, args.name.as_deref())
                        .await?;
                let session = deps.session(args.session_key);
                let cart = deps
                    .sessions
                    .add_to_cart(&session, &product, args.quantity)
                    .await?;
                let quantity = cart.item(product.id).map(|i| i.quantity).unwrap_or(args.quantity);
                Ok(format!(
                    "Added {}x {} to cart \"{}\" (now {} in cart). Cart: {}.",
                    args.quantity,
                    product.name,
                    session,
                    quantity,
                    format_item_summary(&cart.items)
                ))
            }
        }),
    ))?;

    let d = deps.clone();
    registry.register(ToolDescriptor::new(
        VIEW_CART,
        "Show the items in the cart.",
        session_field(InputSchema::new()),
        typed_handler(move |args: SessionArgs| {
            let deps = d.clone();
            async move {
                let session = deps.session(args.session_key);
                let cart = deps.sessions.view_cart(&session).await?;
                Ok(format_cart(&cart))
            }
        }),
    ))?;

    let d = deps.clone();
    registry.register(ToolDescriptor::new(
        REMOVE_FROM_CART,
        "Remove one line from the cart by its item key (shown in brackets by viewCart).",
        session_field(InputSchema::new().field("itemKey", FieldSpec::string().required())),
        typed_handler(move |args: RemoveArgs| {
            let deps = d.clone();
            async move {
                let session = deps.session(args.session_key);
                let (removed, cart) = deps.sessions.remove_item(&session, &args.item_key).await?;
                Ok(format!(
                    "Removed {}x {} from cart \"{}\". {}",
                    removed.quantity,
                    removed.name,
                    session,
                    if cart.is_empty() {
                        "The cart is now empty.".to_string()
                    } else {
                        format!("Cart: {}.", format_item_summary(&cart.items))
                    }
                ))
            }
        }),
    ))?;

    let d = deps.clone();
    registry.register(ToolDescriptor::new(
        CLEAR_CART,
        "Empty the cart.",
        session_field(InputSchema::new()),
        typed_handler(move |args: SessionArgs| {
            let deps = d.clone();
            async move {
                let session = deps.session(args.session_key);
                let report = deps.sessions.clear_cart(&session).await?;
                Ok(format!(
                    "Cleared cart \"{}\": deleted {} cart record(s), {} item entries, {} counter(s).",
                    session, report.cart_deleted, report.item_entries_deleted, report.counter_deleted
                ))
            }
        }),
    ))?;

    let d = deps.clone();
    registry.register(ToolDescriptor::new(
        ADD_TO_WISHLIST,
        "Save a product to the wishlist of an email address.",
        product_ref_fields(
            InputSchema::new().field("email", FieldSpec::string().required()),
        ),
        typed_handler(move |args: AddToWishlistArgs| {
            let deps = d.clone();
            async move {
                let email = identity(&args.email)?;
                let product =
                    resolve_product(deps.catalog.as_ref(), args.product_id, args.name.as_deref())
                        .await?;
                match deps.sessions.add_to_wishlist(email, &product).await? {
                    WishlistOutcome::Added(wishlist) => Ok(format!(
                        "Added {} to the wishlist of {} ({} item(s)).",
                        format_product_line(&product),
                        wishlist.identity_key,
                        wishlist.items.len()
                    )),
                    WishlistOutcome::AlreadyPresent(wishlist) => Ok(format!(
                        "{} is already present in the wishlist of {}.",
                        product.name, wishlist.identity_key
                    )),
                }
            }
        }),
    ))?;

    let d = deps;
    registry.register(ToolDescriptor::new(
        VIEW_WISHLIST,
        "Show the wishlist of an email address.",
        InputSchema::new().field("email", FieldSpec::string().required()),
        typed_handler(move |args: ViewWishlistArgs| {
            let deps = d.clone();
            async move {
                let email = identity(&args.email)?;
                let wishlist = deps.sessions.view_wishlist(email).await?;
                Ok(format_wishlist(&wishlist))
            }
        }),
    ))?;

    Ok(())
}
