//! Cart line items and the raw input they are built from.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, ValidationError};

/// One product entry in a cart.
///
/// Always holds a non-empty id and name, a non-negative unit price and a
/// quantity of at least one. Deserialization goes through the same checks, so
/// a tampered session slot cannot produce an invalid item.
///
/// Serialized as `{"id": "...", "name": "...", "price": 49.99, "quantity": 1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLineItem")]
pub struct LineItem {
    id: ProductId,
    name: String,
    #[serde(rename = "price")]
    unit_price: Price,
    quantity: u32,
}

impl LineItem {
    /// Create a line item with a quantity of one.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the id or name is empty after trimming.
    pub fn new(id: &str, name: &str, unit_price: Price) -> Result<Self, ValidationError> {
        let id = ProductId::parse(id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Self {
            id,
            name: name.to_owned(),
            unit_price,
            quantity: 1,
        })
    }

    /// Replace the quantity.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ZeroQuantity` if `quantity` is zero.
    pub fn with_quantity(mut self, quantity: u32) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        self.quantity = quantity;
        Ok(self)
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }

    /// Increase the quantity, saturating at `u32::MAX`.
    pub(crate) fn add_quantity(&mut self, amount: u32) {
        self.quantity = self.quantity.saturating_add(amount);
    }
}

/// Wire shape of a persisted line item, validated into a [`LineItem`].
#[derive(Deserialize)]
struct RawLineItem {
    id: String,
    name: String,
    price: Price,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl TryFrom<RawLineItem> for LineItem {
    type Error = ValidationError;

    fn try_from(raw: RawLineItem) -> Result<Self, Self::Error> {
        Self::new(&raw.id, &raw.name, raw.price)?.with_quantity(raw.quantity)
    }
}

/// Product data as supplied by an "add to cart" affordance.
///
/// Every field arrives as text, the way it is read off the page at click time.
/// Missing fields read as empty, so every malformed input surfaces as a
/// [`ValidationError`] from the conversion into a [`LineItem`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductInput {
    pub product_id: String,
    pub product_name: String,
    pub product_price: String,
    /// Blank or absent means one.
    pub quantity: Option<String>,
}

impl ProductInput {
    /// The requested quantity, one when none was given.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidQuantity` if the text is not a whole
    /// number in `u32` range.
    pub fn parsed_quantity(&self) -> Result<u32, ValidationError> {
        match self.quantity.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(text) => text
                .parse()
                .map_err(|_| ValidationError::InvalidQuantity(text.to_owned())),
        }
    }
}

impl TryFrom<ProductInput> for LineItem {
    type Error = ValidationError;

    fn try_from(input: ProductInput) -> Result<Self, Self::Error> {
        let price = Price::parse(&input.product_price)?;
        let quantity = input.parsed_quantity()?;
        Self::new(&input.product_id, &input.product_name, price)?.with_quantity(quantity)
    }
}
