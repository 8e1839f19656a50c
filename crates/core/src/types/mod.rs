//! Core types for Showroom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod line_item;
pub mod price;
pub mod validation;

pub use email::{Email, EmailError};
pub use id::*;
pub use line_item::{LineItem, ProductInput};
pub use price::Price;
pub use validation::ValidationError;
