//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde::{Deserialize, Serialize};
use showroom_core::{CategoryFilter, Product, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::cart::add_line_item;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Category to show; `all` or absent shows every category.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-text search over name and description.
    #[serde(default)]
    pub q: Option<String>,
}

/// Product display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.to_string(),
            price: product.price.display(),
        }
    }
}

/// Product listing display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListView {
    /// Every category in the catalog, for the filter buttons.
    pub categories: Vec<String>,
    /// The active category filter (`all` when unfiltered).
    pub active_category: String,
    pub products: Vec<ProductView>,
}

/// List products, optionally filtered by category and search text.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductListView>> {
    let filter: CategoryFilter = query.category.as_deref().unwrap_or_default().parse()?;
    let term = query.q.as_deref().unwrap_or_default().trim();

    let catalog = state.catalog();
    let products = catalog
        .query(&filter, term)
        .into_iter()
        .map(ProductView::from)
        .collect();

    let active_category = match &filter {
        CategoryFilter::All => "all".to_string(),
        CategoryFilter::Category(category) => category.to_string(),
    };

    Ok(Json(ProductListView {
        categories: catalog.categories().iter().map(ToString::to_string).collect(),
        active_category,
        products,
    }))
}

/// Show one product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let product = find(&state, &id)?;
    Ok(Json(ProductView::from(product)))
}

/// Add a catalog product to the cart by id.
#[instrument(skip(state, session))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let item = find(&state, &id)?.to_line_item().map_err(|e| {
        AppError::Internal(format!("catalog entry {id} cannot be added to a cart: {e}"))
    })?;
    Ok(add_line_item(&state, &session, item).await)
}

fn find<'a>(state: &'a AppState, id: &str) -> Result<&'a Product> {
    let product_id = ProductId::parse(id)?;
    state
        .catalog()
        .get(&product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
}
