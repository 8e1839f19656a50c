//! Session-scoped key/value storage.
//!
//! The cart mirrors itself into a storage slot after every change. What backs
//! that slot depends on the host: an in-memory map in tests, a snapshot of the
//! HTTP session in the storefront. Storage is best-effort; callers treat every
//! error here as a warning, never as a reason to lose in-memory state.

use std::collections::HashMap;

/// Errors reported by a [`SessionStorage`] backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The storage medium is disabled or otherwise unreachable.
    #[error("session storage is unavailable")]
    Unavailable,
    /// The write would exceed the storage quota.
    #[error("session storage quota exceeded ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Bytes the store may hold.
        quota: usize,
    },
}

/// A per-session key/value slot store.
pub trait SessionStorage {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage with an optional byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty store without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that holds at most `quota` bytes of keys and values.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Total bytes of keys and values currently stored.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.slots.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

/// An unbounded store holding the given slots.
impl FromIterator<(String, String)> for MemoryStorage {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
            quota: None,
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let replaced = self.slots.get(key).map_or(0, |old| key.len() + old.len());
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.slots.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Storage that refuses every operation, as in a private browsing window.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStorage;

impl SessionStorage for DisabledStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&mut self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_get_overwrite() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("cart").unwrap(), None);

        storage.set_item("cart", "[]".to_string()).unwrap();
        storage.set_item("cart", "[1]".to_string()).unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_memory_remove() {
        let mut storage = MemoryStorage::new();
        storage.set_item("cart", "[]".to_string()).unwrap();
        storage.remove_item("cart").unwrap();
        storage.remove_item("missing").unwrap();
        assert_eq!(storage.get_item("cart").unwrap(), None);
    }

    #[test]
    fn test_quota_exceeded() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set_item("cart", "123456".to_string()).unwrap();
        assert_eq!(storage.used_bytes(), 10);

        let err = storage.set_item("cart", "1234567".to_string()).unwrap_err();
        assert_eq!(
            err,
            StorageError::QuotaExceeded {
                needed: 11,
                quota: 10
            }
        );
        // Rejected write leaves the old value in place
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("123456"));
    }

    #[test]
    fn test_quota_counts_replacement() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set_item("cart", "123456".to_string()).unwrap();
        storage.set_item("cart", "abcdef".to_string()).unwrap();
        assert_eq!(storage.used_bytes(), 10);
    }

    #[test]
    fn test_collect_from_pairs() {
        let storage: MemoryStorage = [("cart".to_string(), "[]".to_string())]
            .into_iter()
            .collect();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.used_bytes(), 6);
    }

    #[test]
    fn test_disabled_storage() {
        let mut storage = DisabledStorage;
        assert_eq!(storage.get_item("cart"), Err(StorageError::Unavailable));
        assert_eq!(
            storage.set_item("cart", String::new()),
            Err(StorageError::Unavailable)
        );
    }
}
