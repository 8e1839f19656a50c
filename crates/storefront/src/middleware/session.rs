//! Session middleware configuration.
//!
//! Sessions are kept in process memory in a bounded cache. A session is
//! dropped when it has been idle for `session_idle_timeout`, when the cache is
//! full and it is the least likely to be used again, or when the server
//! restarts. The browser forgets the cookie at the end of its own session.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::session::{Id, Record};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore, session_store};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "showroom_session";

/// In-memory session store with idle eviction and a size bound.
#[derive(Debug, Clone)]
pub struct CartSessionStore {
    records: Cache<Id, Record>,
}

impl CartSessionStore {
    /// Hold at most `capacity` sessions, each for `idle_timeout` after its
    /// last use.
    #[must_use]
    pub fn new(capacity: u64, idle_timeout: Duration) -> Self {
        Self {
            records: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle_timeout)
                .build(),
        }
    }

    /// Approximate number of live sessions.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.records.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for CartSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.records.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self.records.get(session_id).await)
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer over a fresh [`CartSessionStore`].
///
/// The cookie has no max-age, so the browser discards it when the browsing
/// session ends.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<CartSessionStore> {
    let store = CartSessionStore::new(config.session_capacity, config.session_idle_timeout);

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
