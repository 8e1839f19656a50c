//! Cart route handlers.
//!
//! The cart is kept in the visitor's session under the `"cart"` key. Each
//! handler restores it, applies one operation, and writes it back. A failed
//! session write is logged and otherwise ignored; the response still reflects
//! the cart as the handler left it.

use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use showroom_core::{CartBadge, CartStore, LineItem, ProductId, ProductInput};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::{SessionSnapshot, session_keys};
use crate::state::AppState;

/// Header that tells the page to refresh its cart badge.
pub const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart item display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_string(),
            quantity: item.quantity(),
            price: item.unit_price().display(),
            line_price: item.line_total().display(),
        }
    }
}

impl From<&SessionCart> for CartView {
    fn from(cart: &SessionCart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.total_count(),
        }
    }
}

/// Remove from cart form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// A cart backed by a snapshot of the session.
pub type SessionCart = CartStore<SessionSnapshot>;

/// Restore the cart from the session.
pub async fn load_cart(state: &AppState, session: &Session) -> SessionCart {
    let snapshot = SessionSnapshot::load(session, &[session_keys::CART]).await;
    CartStore::restore(snapshot).with_policy(state.config().repeat_add)
}

/// Write the cart back to the session.
pub async fn save_cart(session: &Session, cart: SessionCart) {
    let snapshot = cart.into_storage();
    if !snapshot.is_dirty() {
        return;
    }
    if let Err(e) = snapshot.flush(session).await {
        tracing::warn!(error = %e, "Failed to save cart to session");
    }
}

/// Add a line item and respond with the badge the page should show.
pub async fn add_line_item(state: &AppState, session: &Session, item: LineItem) -> Response {
    let mut cart = load_cart(state, session).await;
    let product_id = item.id().clone();
    cart.add_item(item);
    let badge = cart.badge();
    save_cart(session, cart).await;

    tracing::info!(product_id = %product_id, count = badge.count, "Added to cart");
    badge_response(badge)
}

fn badge_response(badge: CartBadge) -> Response {
    (AppendHeaders([CART_UPDATED_TRIGGER]), Json(badge)).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart contents.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let cart = load_cart(&state, &session).await;
    Json(CartView::from(&cart))
}

/// Add an item to the cart.
///
/// Takes the product id, name and price the "add to cart" button carries.
/// Adding a product that is already in the cart bumps its quantity.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductInput>,
) -> Result<Response> {
    let item = LineItem::try_from(form)?;
    Ok(add_line_item(&state, &session, item).await)
}

/// Remove an item from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let product_id = ProductId::parse(&form.product_id)?;

    let mut cart = load_cart(&state, &session).await;
    let removed = cart.remove_item(&product_id);
    let view = CartView::from(&cart);
    save_cart(&session, cart).await;

    if removed {
        Ok((AppendHeaders([CART_UPDATED_TRIGGER]), Json(view)).into_response())
    } else {
        Ok(Json(view).into_response())
    }
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let mut cart = load_cart(&state, &session).await;
    cart.clear();
    let badge = cart.badge();
    save_cart(&session, cart).await;
    badge_response(badge)
}

/// Get cart count badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Json<CartBadge> {
    let cart = load_cart(&state, &session).await;
    Json(cart.badge())
}
