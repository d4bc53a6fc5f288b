//! Port for entry persistence.
//!
//! Absence is reported through `Option`/`bool` results, never through the
//! error type; errors mean the store itself failed.

use async_trait::async_trait;

use crate::domain::{ActorId, Entry, EntryChanges, EntryFilter, EntryId, NewEntry};

use super::define_port_error;

define_port_error! {
    /// Errors raised by entry repository adapters.
    pub enum EntryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "entry repository connection failed: {message}",
        /// Query or mutation failed during execution or row conversion.
        Query { message: String } => "entry repository query failed: {message}",
    }
}

/// Entry storage capability shared by the in-memory and relational stores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Fetch a single entry.
    async fn get_entry(&self, id: &EntryId) -> Result<Option<Entry>, EntryRepositoryError>;

    /// Every entry in title order.
    async fn get_all_entries(&self) -> Result<Vec<Entry>, EntryRepositoryError>;

    /// Entries passing `filter`, in title order.
    async fn search_entries(
        &self,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, EntryRepositoryError>;

    /// Persist a new entry with a fresh identifier and current timestamps.
    async fn create_entry(
        &self,
        data: NewEntry,
        actor: &ActorId,
    ) -> Result<Entry, EntryRepositoryError>;

    /// Merge `changes` into an existing entry.
    ///
    /// Returns `None` when no entry has this identifier.
    async fn update_entry(
        &self,
        id: &EntryId,
        changes: EntryChanges,
        actor: &ActorId,
    ) -> Result<Option<Entry>, EntryRepositoryError>;

    /// Remove an entry, returning whether it existed.
    async fn delete_entry(&self, id: &EntryId) -> Result<bool, EntryRepositoryError>;

    /// Number of stored entries.
    async fn count_entries(&self) -> Result<u64, EntryRepositoryError>;
}
