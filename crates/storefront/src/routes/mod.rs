//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Products
//! GET  /products                - Product listing (?category=&q=)
//! GET  /products/{id}           - Product detail
//! POST /products/{id}/add       - Add catalog product to cart (returns badge)
//!
//! # Cart
//! GET  /cart                    - Cart contents
//! POST /cart/add                - Add to cart from product_id/product_name/product_price (returns badge)
//! POST /cart/remove             - Remove item (returns cart)
//! POST /cart/clear              - Empty cart (returns badge)
//! GET  /cart/count              - Cart count badge
//!
//! # Contact
//! POST /contact                 - Validate and accept a contact message
//! ```

pub mod cart;
pub mod contact;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/add", post(products::add_to_cart))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/contact", post(contact::submit))
}
