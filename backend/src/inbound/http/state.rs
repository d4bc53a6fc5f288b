//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{EntryRepository, IdentityProvider, Storage, UserRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub entries: Arc<dyn EntryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl HttpState {
    /// Construct state from individual ports.
    pub fn new(
        entries: Arc<dyn EntryRepository>,
        users: Arc<dyn UserRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            entries,
            users,
            identity,
        }
    }

    /// Construct state where one store serves both entries and users.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mimir::domain::ports::FixtureIdentityProvider;
    /// use mimir::inbound::http::state::HttpState;
    /// use mimir::outbound::persistence::MemoryStorage;
    ///
    /// let state = HttpState::from_storage(
    ///     Arc::new(MemoryStorage::default()),
    ///     Arc::new(FixtureIdentityProvider),
    /// );
    /// let _entries = state.entries.clone();
    /// ```
    pub fn from_storage<S>(storage: Arc<S>, identity: Arc<dyn IdentityProvider>) -> Self
    where
        S: Storage + 'static,
    {
        let entries: Arc<dyn EntryRepository> = storage.clone();
        let users: Arc<dyn UserRepository> = storage;
        Self::new(entries, users, identity)
    }
}
