//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use showroom_core::{Catalog, CatalogError};

use crate::config::StorefrontConfig;

/// Error loading the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Everything in it is read-only;
/// per-visitor state (the cart) lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Create the application state, reading the catalog from `config.catalog_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or parsed.
    pub fn load(config: StorefrontConfig) -> Result<Self, StateError> {
        let json =
            std::fs::read_to_string(&config.catalog_path).map_err(|source| StateError::CatalogIo {
                path: config.catalog_path.clone(),
                source,
            })?;
        let catalog = Catalog::from_json(&json)?;
        tracing::info!(
            products = catalog.len(),
            path = %config.catalog_path.display(),
            "Catalog loaded"
        );
        Ok(Self::new(config, catalog))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }
}
