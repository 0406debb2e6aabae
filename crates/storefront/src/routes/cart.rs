//! Cart route handlers.
//!
//! JSON endpoints over the session cart. Every handler loads the cart from
//! the session, applies at most one mutation (which is written back to the
//! session immediately) and returns the resulting cart.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use cartwheel_core::{
    Buyable, BuyableId, BuyableKind, Cart, CartError, CartItem, CurrencyCode, Price, RowId,
};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::CatalogItem;
use crate::services::{BuyableCatalog, SessionCart};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Add or set request body.
#[derive(Debug, Deserialize)]
pub struct CartLineInput {
    pub kind: BuyableKind,
    pub id: BuyableId,
    /// Defaults to 1.
    pub quantity: Option<u32>,
}

/// Remove request body.
#[derive(Debug, Deserialize)]
pub struct CartTargetInput {
    pub kind: BuyableKind,
    pub id: BuyableId,
}

/// Cart row as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub row_id: String,
    pub kind: BuyableKind,
    pub id: BuyableId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Total units, not rows.
    pub count: u64,
    pub total: String,
    /// ISO code of the currency totals are formatted in.
    pub currency: &'static str,
}

/// Cart count badge.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Cart type code.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartTypeView {
    #[serde(rename = "type")]
    pub type_code: &'static str,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl CartItemView {
    fn new(item: &CartItem<CatalogItem>, currency: CurrencyCode) -> Self {
        let buyable = item.buyable();
        Self {
            row_id: item.row_id().to_string(),
            kind: buyable.kind(),
            id: buyable.id(),
            name: buyable.name.clone(),
            quantity: item.quantity(),
            unit_price: Price::new(item.unit_price(), currency).display(),
            line_total: Price::new(item.total(), currency).display(),
        }
    }
}

impl CartView {
    /// Build the view of `cart`, formatting money in `currency`.
    #[must_use]
    pub fn new(cart: &Cart<CatalogItem>, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .content()
                .iter()
                .map(|item| CartItemView::new(item, currency))
                .collect(),
            count: cart.count(),
            total: Price::new(cart.total(), currency).display(),
            currency: currency.code(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Load the session cart using the shared catalog.
async fn open_cart(state: &AppState, session: Session) -> Result<SessionCart<CatalogItem>> {
    Ok(SessionCart::load(Some(session), &state.catalog()).await?)
}

/// Look up the buyable a request refers to.
async fn resolve(state: &AppState, kind: BuyableKind, id: BuyableId) -> Result<CatalogItem> {
    state
        .catalog()
        .find(kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{kind} {id}")))
}

/// Requested quantity, defaulting to 1. Zero is rejected before any lookup.
fn checked_quantity(quantity: Option<u32>) -> Result<u32> {
    match quantity.unwrap_or(1) {
        0 => Err(CartError::InvalidQuantity(0).into()),
        n => Ok(n),
    }
}

fn view(state: &AppState, cart: &SessionCart<CatalogItem>) -> Json<CartView> {
    Json(CartView::new(cart.cart(), state.config().currency))
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = open_cart(&state, session).await?;
    Ok(view(&state, &cart))
}

/// Add units of a buyable.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CartLineInput>,
) -> Result<Json<CartView>> {
    let quantity = checked_quantity(input.quantity)?;
    let buyable = resolve(&state, input.kind, input.id).await?;
    let row_id = buyable.row_id();

    let mut cart = open_cart(&state, session).await?;
    cart.add(buyable, quantity).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("row_id", row_id.to_string()), ("quantity", quantity.to_string())],
    );
    Ok(view(&state, &cart))
}

/// Set the quantity of a buyable.
#[instrument(skip(state, session))]
pub async fn set(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CartLineInput>,
) -> Result<Json<CartView>> {
    let quantity = checked_quantity(input.quantity)?;
    let buyable = resolve(&state, input.kind, input.id).await?;

    let mut cart = open_cart(&state, session).await?;
    cart.set(buyable, quantity).await?;

    Ok(view(&state, &cart))
}

/// Remove a buyable. Removing something not in the cart succeeds.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CartTargetInput>,
) -> Result<Json<CartView>> {
    let mut cart = open_cart(&state, session).await?;
    cart.remove_row(&RowId::new(input.kind, input.id)).await?;

    Ok(view(&state, &cart))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let mut cart = open_cart(&state, session).await?;
    cart.clear().await?;

    add_breadcrumb("cart", "Cleared cart", &[]);
    Ok(view(&state, &cart))
}

/// Total units in the cart.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CartCountView>> {
    let cart = open_cart(&state, session).await?;
    Ok(Json(CartCountView {
        count: cart.cart().count(),
    }))
}

/// Type code of the cart (kind of its first row). 409 when empty.
#[instrument(skip(state, session))]
pub async fn cart_type(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartTypeView>> {
    let cart = open_cart(&state, session).await?;
    let type_code = cart.cart().type_code()?;

    if cart.cart().kinds().len() > 1 {
        tracing::warn!(type_code, "Cart holds more than one kind");
    }

    Ok(Json(CartTypeView { type_code }))
}
