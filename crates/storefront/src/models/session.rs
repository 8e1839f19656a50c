//! Session-related types.
//!
//! The cart code talks to a synchronous [`SessionStorage`]; the HTTP session is
//! async. [`SessionSnapshot`] bridges the two: load the slots a handler needs,
//! let the cart read and write them in memory, then flush whatever changed
//! back to the session.

use std::collections::BTreeSet;

use showroom_core::{MemoryStorage, SessionStorage, StorageError};
use tower_sessions::Session;

/// Session keys.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = showroom_core::CART_STORAGE_KEY;
}

/// In-memory copy of selected session slots that tracks writes.
#[derive(Debug, Default)]
pub struct SessionSnapshot {
    slots: MemoryStorage,
    changed: BTreeSet<String>,
}

impl SessionSnapshot {
    /// Read `keys` from the session.
    ///
    /// Slots that cannot be read are treated as empty.
    pub async fn load(session: &Session, keys: &[&str]) -> Self {
        let mut loaded = Vec::with_capacity(keys.len());
        for key in keys {
            match session.get::<String>(key).await {
                Ok(Some(value)) => loaded.push(((*key).to_owned(), value)),
                Ok(None) => {}
                Err(e) => tracing::warn!(key, error = %e, "Failed to read session slot"),
            }
        }

        Self {
            slots: loaded.into_iter().collect(),
            changed: BTreeSet::new(),
        }
    }

    /// Whether any slot was written since loading.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Write changed slots back to the session.
    ///
    /// # Errors
    ///
    /// Returns the session error of the first failing write.
    pub async fn flush(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for key in &self.changed {
            match self.slots.get_item(key) {
                Ok(Some(value)) => session.insert(key, value).await?,
                _ => {
                    session.remove::<String>(key).await?;
                }
            }
        }
        Ok(())
    }
}

impl SessionStorage for SessionSnapshot {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.slots.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.slots.set_item(key, value)?;
        self.changed.insert(key.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove_item(key)?;
        self.changed.insert(key.to_owned());
        Ok(())
    }
}
