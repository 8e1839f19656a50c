//! Session cart store.
//!
//! A [`CartStore`] holds the ordered line items a visitor has picked during the
//! current session. Every mutation is mirrored to the `"cart"` slot of a
//! [`SessionStorage`] and announced to count listeners so a header badge can
//! be refreshed.
//!
//! # Invariants
//!
//! - Item ids are pairwise distinct.
//! - Every item has a quantity of at least one.
//! - Items keep the order in which they were first added.
//!
//! Storage failures never touch the in-memory state: the store logs them,
//! remembers the most recent one, and carries on.

use core::fmt;
use core::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::storage::{SessionStorage, StorageError};
use crate::types::{LineItem, Price, ProductId, ProductInput, ValidationError};

/// Storage key of the persisted cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// How a repeated add of an item already in the cart changes its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatAdd {
    /// Every add counts as one more unit, whatever quantity the candidate carries.
    #[default]
    OneUnit,
    /// Add the candidate's own quantity.
    CandidateQuantity,
}

/// Error parsing a [`RepeatAdd`] policy name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown repeat-add policy {0:?} (expected \"one\" or \"quantity\")")]
pub struct ParseRepeatAddError(String);

impl FromStr for RepeatAdd {
    type Err = ParseRepeatAddError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one" | "one_unit" => Ok(Self::OneUnit),
            "quantity" | "candidate_quantity" => Ok(Self::CandidateQuantity),
            _ => Err(ParseRepeatAddError(s.to_owned())),
        }
    }
}

/// Non-fatal problem mirroring the cart to storage.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceWarning {
    /// The storage backend rejected the operation.
    #[error("cart storage failed: {0}")]
    Storage(#[from] StorageError),
    /// The cart could not be serialized.
    #[error("cart could not be serialized: {0}")]
    Serialize(String),
    /// The stored cart could not be read back and was discarded.
    #[error("stored cart is unreadable: {0}")]
    Corrupt(String),
}

/// Header badge state derived from the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartBadge {
    pub count: u32,
    /// Hidden when the cart is empty.
    pub visible: bool,
}

impl CartBadge {
    #[must_use]
    pub const fn from_count(count: u32) -> Self {
        Self {
            count,
            visible: count > 0,
        }
    }
}

type CountListener = Box<dyn FnMut(u32) + Send>;

/// The cart for one browsing session.
pub struct CartStore<S> {
    items: Vec<LineItem>,
    storage: S,
    policy: RepeatAdd,
    listeners: Vec<CountListener>,
    last_warning: Option<PersistenceWarning>,
}

impl<S: SessionStorage> CartStore<S> {
    /// Create an empty cart backed by `storage`.
    ///
    /// Nothing is written until the first mutation.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self {
            items: Vec::new(),
            storage,
            policy: RepeatAdd::OneUnit,
            listeners: Vec::new(),
            last_warning: None,
        }
    }

    /// Rebuild the cart from the `"cart"` slot of `storage`.
    ///
    /// A missing slot gives an empty cart. An unreadable slot also gives an
    /// empty cart, with the reason kept in [`last_warning`](Self::last_warning).
    /// Entries sharing an id are merged by summing their quantities.
    #[must_use]
    pub fn restore(storage: S) -> Self {
        let mut store = Self::new(storage);

        let stored = match store.storage.get_item(CART_STORAGE_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read stored cart");
                store.last_warning = Some(e.into());
                return store;
            }
        };

        let Some(json) = stored else {
            return store;
        };

        match serde_json::from_str::<Vec<LineItem>>(&json) {
            Ok(items) => {
                for item in items {
                    match store.position(item.id()) {
                        Some(index) => {
                            if let Some(existing) = store.items.get_mut(index) {
                                existing.add_quantity(item.quantity());
                            }
                        }
                        None => store.items.push(item),
                    }
                }
                debug!(items = store.items.len(), "Restored cart from storage");
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable stored cart");
                store.last_warning = Some(PersistenceWarning::Corrupt(e.to_string()));
            }
        }

        store
    }

    /// Set the repeat-add policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RepeatAdd) -> Self {
        self.policy = policy;
        self
    }

    /// Register a listener called with the new total after every mutation.
    pub fn on_count_change<F>(&mut self, listener: F)
    where
        F: FnMut(u32) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Add a line item.
    ///
    /// If an item with the same id is already present its quantity grows
    /// according to the [`RepeatAdd`] policy and it keeps its position;
    /// otherwise `candidate` is appended.
    pub fn add_item(&mut self, candidate: LineItem) {
        match self.position(candidate.id()) {
            Some(index) => {
                let increment = match self.policy {
                    RepeatAdd::OneUnit => 1,
                    RepeatAdd::CandidateQuantity => candidate.quantity(),
                };
                if let Some(existing) = self.items.get_mut(index) {
                    existing.add_quantity(increment);
                }
            }
            None => self.items.push(candidate),
        }
        self.commit();
    }

    /// Validate raw product data and add it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the input is malformed. The cart is left
    /// untouched in that case.
    pub fn add_product(&mut self, input: ProductInput) -> Result<(), ValidationError> {
        let item = LineItem::try_from(input)?;
        self.add_item(item);
        Ok(())
    }

    /// Remove the item with `id`. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.items.remove(index);
        self.commit();
        true
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit();
    }

    /// Sum of all item quantities. Zero for an empty cart.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |total, item| total.saturating_add(item.quantity()))
    }

    /// Sum of every line total.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    #[must_use]
    pub fn badge(&self) -> CartBadge {
        CartBadge::from_count(self.total_count())
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Write the full item sequence to the `"cart"` slot.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceWarning` if serialization or the storage write
    /// fails. The in-memory cart is unaffected.
    pub fn persist(&mut self) -> Result<(), PersistenceWarning> {
        let json = serde_json::to_string(&self.items)
            .map_err(|e| PersistenceWarning::Serialize(e.to_string()))?;
        self.storage.set_item(CART_STORAGE_KEY, json)?;
        Ok(())
    }

    /// The most recent persistence problem, cleared by the next successful write.
    #[must_use]
    pub const fn last_warning(&self) -> Option<&PersistenceWarning> {
        self.last_warning.as_ref()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the cart and hand back its storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Persist and notify listeners after a mutation.
    fn commit(&mut self) {
        match self.persist() {
            Ok(()) => self.last_warning = None,
            Err(e) => {
                warn!(error = %e, "Cart kept in memory only");
                self.last_warning = Some(e);
            }
        }

        let count = self.total_count();
        for listener in &mut self.listeners {
            listener(count);
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("storage", &self.storage)
            .field("policy", &self.policy)
            .field("listeners", &self.listeners.len())
            .field("last_warning", &self.last_warning)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::{DisabledStorage, MemoryStorage};

    fn item(id: &str) -> LineItem {
        LineItem::new(id, &format!("Item {id}"), Price::parse("10").unwrap()).unwrap()
    }

    fn ids<S: SessionStorage>(cart: &CartStore<S>) -> Vec<(&str, u32)> {
        cart.items()
            .iter()
            .map(|i| (i.id().as_str(), i.quantity()))
            .collect()
    }

    #[test]
    fn test_empty_cart_baseline() {
        let cart = CartStore::new(MemoryStorage::new());
        assert_eq!(cart.total_count(), 0);
        assert!(cart.items().is_empty());
        assert_eq!(cart.badge(), CartBadge { count: 0, visible: false });
    }

    #[test]
    fn test_repeat_add_merges_identity() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add_item(item("a"));
        cart.add_item(item("a"));
        assert_eq!(ids(&cart), vec![("a", 2)]);
    }

    #[test]
    fn test_order_preserved() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add_item(item("a"));
        cart.add_item(item("b"));
        cart.add_item(item("a"));
        assert_eq!(ids(&cart), vec![("a", 2), ("b", 1)]);
    }

    #[test]
    fn test_total_count() {
        let mut cart = CartStore::new(MemoryStorage::new());
        for _ in 0..3 {
            cart.add_item(item("x"));
        }
        cart.add_item(item("y"));
        assert_eq!(cart.total_count(), 4);
        assert_eq!(cart.badge(), CartBadge { count: 4, visible: true });
    }

    #[test]
    fn test_one_unit_policy_ignores_candidate_quantity() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add_item(item("a").with_quantity(3).unwrap());
        cart.add_item(item("a").with_quantity(5).unwrap());
        assert_eq!(ids(&cart), vec![("a", 4)]);
    }

    #[test]
    fn test_candidate_quantity_policy() {
        let mut cart =
            CartStore::new(MemoryStorage::new()).with_policy(RepeatAdd::CandidateQuantity);
        cart.add_item(item("a").with_quantity(3).unwrap());
        cart.add_item(item("a").with_quantity(5).unwrap());
        assert_eq!(ids(&cart), vec![("a", 8)]);
    }

    #[test]
    fn test_persistence_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut cart = CartStore::new(&mut storage);
        cart.add_item(LineItem::new("p1", "Chair", Price::parse("49.99").unwrap()).unwrap());
        let in_memory = cart.items().to_vec();
        drop(cart);

        let json = storage.get_item(CART_STORAGE_KEY).unwrap().unwrap();
        let restored: Vec<LineItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, in_memory);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"id": "p1", "name": "Chair", "price": 49.99, "quantity": 1}])
        );
    }

    #[test]
    fn test_restore_after_save_keeps_prices() {
        let mut storage = MemoryStorage::new();
        let mut cart = CartStore::new(&mut storage);
        for (id, price) in [("keep", "10"), ("p1", "999999999.99"), ("p2", "0.07")] {
            cart.add_item(LineItem::new(id, "Item", Price::parse(price).unwrap()).unwrap());
        }
        let saved = cart.items().to_vec();
        drop(cart);

        let restored = CartStore::restore(storage);
        assert!(restored.last_warning().is_none());
        assert_eq!(restored.items(), saved.as_slice());
    }

    #[test]
    fn test_add_product_rejects_unstorable_price() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add_item(item("keep"));

        for price in ["12345678901234567.89", "79228162514264337593543950335", "0.001"] {
            let input = ProductInput {
                product_id: "p1".to_string(),
                product_name: "Chair".to_string(),
                product_price: price.to_string(),
                quantity: None,
            };
            assert!(cart.add_product(input).is_err(), "{price}");
        }

        let restored = CartStore::restore(cart.into_storage());
        assert_eq!(ids(&restored), vec![("keep", 1)]);
    }

    #[test]
    fn test_persist_overwrites_after_every_mutation() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add_item(item("a"));
        cart.add_item(item("a"));
        let json = cart.storage().get_item(CART_STORAGE_KEY).unwrap().unwrap();
        let stored: Vec<LineItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(stored.first().map(LineItem::quantity), Some(2));
    }

    #[test]
    fn test_disabled_storage_keeps_memory_authoritative() {
        let mut cart = CartStore::new(DisabledStorage);
        cart.add_item(item("a"));
        cart.add_item(item("a"));
        assert_eq!(cart.total_count(), 2);
        assert_eq!(
            cart.last_warning(),
            Some(&PersistenceWarning::Storage(StorageError::Unavailable))
        );
    }

    #[test]
    fn test_quota_warning_clears_on_success() {
        let mut cart = CartStore::new(MemoryStorage::with_quota(80));
        cart.add_item(item("a"));
        assert!(cart.last_warning().is_none());

        cart.add_item(item("b"));
        assert!(matches!(
            cart.last_warning(),
            Some(PersistenceWarning::Storage(StorageError::QuotaExceeded { .. }))
        ));
        assert_eq!(cart.total_count(), 2);

        assert!(cart.remove_item(&ProductId::parse("b").unwrap()));
        assert!(cart.last_warning().is_none());
    }

    #[test]
    fn test_restore() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                CART_STORAGE_KEY,
                r#"[{"id":"a","name":"A","price":5,"quantity":2},
                    {"id":"b","name":"B","price":1.5,"quantity":1},
                    {"id":"a","name":"A","price":5,"quantity":1}]"#
                    .to_string(),
            )
            .unwrap();

        let cart = CartStore::restore(storage);
        assert_eq!(ids(&cart), vec![("a", 3), ("b", 1)]);
        assert_eq!(cart.subtotal().amount(), Decimal::new(165, 1));
        assert!(cart.last_warning().is_none());
    }

    #[test]
    fn test_restore_missing_slot() {
        let cart = CartStore::restore(MemoryStorage::new());
        assert!(cart.is_empty());
        assert!(cart.last_warning().is_none());
    }

    #[test]
    fn test_restore_corrupt_slot() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(CART_STORAGE_KEY, r#"[{"id":"a","quantity":0}]"#.to_string())
            .unwrap();

        let cart = CartStore::restore(storage);
        assert!(cart.is_empty());
        assert!(matches!(
            cart.last_warning(),
            Some(PersistenceWarning::Corrupt(_))
        ));
    }

    #[test]
    fn test_restore_disabled_storage() {
        let cart = CartStore::restore(DisabledStorage);
        assert!(cart.is_empty());
        assert!(cart.last_warning().is_some());
    }

    #[test]
    fn test_add_product_validation_leaves_cart_untouched() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let bad = ProductInput {
            product_id: "p1".to_string(),
            product_name: "Chair".to_string(),
            product_price: "-4".to_string(),
            quantity: None,
        };
        assert!(matches!(
            cart.add_product(bad),
            Err(ValidationError::NegativePrice(_))
        ));
        assert!(cart.is_empty());
        assert_eq!(cart.storage().get_item(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_add_product() {
        let mut cart = CartStore::new(MemoryStorage::new());
        let input = ProductInput {
            product_id: "p1".to_string(),
            product_name: "Chair".to_string(),
            product_price: "49.99".to_string(),
            quantity: None,
        };
        cart.add_product(input.clone()).unwrap();
        cart.add_product(input).unwrap();
        assert_eq!(ids(&cart), vec![("p1", 2)]);
        assert_eq!(cart.subtotal().display(), "$99.98");
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add_item(item("a"));
        cart.add_item(item("b"));

        assert!(!cart.remove_item(&ProductId::parse("zzz").unwrap()));
        assert!(cart.remove_item(&ProductId::parse("a").unwrap()));
        assert_eq!(ids(&cart), vec![("b", 1)]);

        cart.clear();
        assert!(cart.is_empty());
        let json = cart.storage().get_item(CART_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_count_listeners() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut cart = CartStore::new(MemoryStorage::new());
        cart.on_count_change(move |count| sink.lock().unwrap().push(count));
        cart.add_item(item("a"));
        cart.add_item(item("a"));
        cart.add_item(item("b"));
        cart.clear();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_quantities_never_zero() {
        let mut cart = CartStore::new(MemoryStorage::new());
        for id in ["a", "b", "a", "c", "b", "a"] {
            cart.add_item(item(id));
        }
        cart.remove_item(&ProductId::parse("c").unwrap());
        assert!(cart.items().iter().all(|i| i.quantity() >= 1));
    }

    #[test]
    fn test_repeat_add_policy_parse() {
        assert_eq!("one".parse::<RepeatAdd>().unwrap(), RepeatAdd::OneUnit);
        assert_eq!(
            "Quantity".parse::<RepeatAdd>().unwrap(),
            RepeatAdd::CandidateQuantity
        );
        assert!("twice".parse::<RepeatAdd>().is_err());
    }
}
