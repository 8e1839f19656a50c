//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] to avoid float rounding in totals, but are
//! written to JSON as plain numbers so a persisted cart reads as
//! `{"price": 49.99}`. A price has at most two decimal places and at most
//! [`Price::MAX`] whole units, which keeps it within the digits an `f64`
//! carries exactly through a save and reload.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ValidationError;

/// A non-negative unit price in whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted price.
    pub const MAX: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

    /// Decimal places a price may carry.
    pub const SCALE: u32 = 2;

    /// Create a new price.
    ///
    /// Trailing zeros are ignored, so `49.990` is the same price as `49.99`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NegativePrice` if `amount` is below zero,
    /// `PriceTooPrecise` if it has more than two decimal places, or
    /// `PriceTooLarge` if it is above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        let amount = amount.normalize();
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::NegativePrice(amount));
        }
        if amount > Self::MAX {
            return Err(ValidationError::PriceTooLarge {
                got: amount,
                max: Self::MAX,
            });
        }
        if amount.scale() > Self::SCALE {
            return Err(ValidationError::PriceTooPrecise(amount));
        }
        Ok(Self(amount))
    }

    /// Parse a price from text such as a form field (`"49.99"`).
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPrice` if the text is not a decimal
    /// number, or `ValidationError::NegativePrice` if it is below zero.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| ValidationError::InvalidPrice(s.to_owned()))?;
        Self::new(amount)
    }

    /// The amount in the currency's standard unit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units. Saturates instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = ValidationError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Price {
    /// Written as the `f64` nearest to the decimal text. With at most twelve
    /// significant digits that float prints back as the same decimal.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let float = f64::from_str(&self.0.to_string()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(float)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
