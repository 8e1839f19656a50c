//! Validation errors raised at the cart boundary.

use rust_decimal::Decimal;

/// Errors that can occur when building a [`LineItem`](super::LineItem) or any
/// of the values it is made of.
///
/// Raised before the cart is touched, so a rejected input never leaves the
/// cart in a partially updated state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An identifier is empty after trimming.
    #[error("{kind} cannot be empty")]
    EmptyId {
        /// Name of the identifier type.
        kind: &'static str,
    },
    /// The display name is empty after trimming.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The price could not be parsed as a decimal number.
    #[error("price is not a valid number: {0:?}")]
    InvalidPrice(String),
    /// The price is below zero.
    #[error("price cannot be negative (got {0})")]
    NegativePrice(Decimal),
    /// The price has fractions of a cent.
    #[error("price cannot have more than 2 decimal places (got {0})")]
    PriceTooPrecise(Decimal),
    /// The price is above [`Price::MAX`](super::Price::MAX).
    #[error("price cannot exceed {max} (got {got})")]
    PriceTooLarge { got: Decimal, max: Decimal },
    /// The quantity is not a whole number.
    #[error("quantity is not a valid number: {0:?}")]
    InvalidQuantity(String),
    /// The quantity is zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}
