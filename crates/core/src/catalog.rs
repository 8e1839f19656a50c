//! Product catalog with category filtering and text search.

use core::str::FromStr;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, LineItem, Price, ProductId, ValidationError};

/// Errors loading a catalog.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The catalog document is not valid JSON or has invalid entries.
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    /// A product could not be put in a cart as listed.
    #[error("product {id} is invalid: {source}")]
    InvalidProduct {
        id: ProductId,
        #[source]
        source: ValidationError,
    },
}

/// A product shown on the catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: CategoryId,
    pub price: Price,
}

impl Product {
    /// The line item an "add to cart" button for this product produces.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName` if the product has a blank name.
    pub fn to_line_item(&self) -> Result<LineItem, ValidationError> {
        LineItem::new(self.id.as_str(), &self.name, self.price)
    }

    /// Case-insensitive match of `needle` (already lowercased) against name
    /// and description.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Category selector for [`Catalog::filter`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(CategoryId),
}

impl FromStr for CategoryFilter {
    type Err = ValidationError;

    /// `"all"` (any case) or a blank string selects everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        CategoryId::parse(trimmed).map(Self::Category)
    }
}

impl CategoryFilter {
    fn admits(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => &product.category == category,
        }
    }
}

/// An ordered list of products with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and products that cannot
    /// become a line item.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidProduct` for a product with a blank name,
    /// or `CatalogError::DuplicateId` on the first repeated id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            product
                .to_line_item()
                .map_err(|source| CatalogError::InvalidProduct {
                    id: product.id.clone(),
                    source,
                })?;
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is malformed, an entry is invalid,
    /// or two entries share an id.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&CategoryId> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| &p.category)
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Products in the selected category.
    #[must_use]
    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.admits(p)).collect()
    }

    /// Products whose name or description contains `term`, ignoring case.
    /// An empty term matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        self.query(&CategoryFilter::All, term)
    }

    /// Category filter and text search combined.
    #[must_use]
    pub fn query(&self, filter: &CategoryFilter, term: &str) -> Vec<&Product> {
        let needle = term.to_lowercase();
        self.products
            .iter()
            .filter(|p| filter.admits(p) && p.matches(&needle))
            .collect()
    }
}
