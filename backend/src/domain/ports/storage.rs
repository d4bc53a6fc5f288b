//! Combined storage capability handed to the route layer at startup.

use super::{EntryRepository, UserRepository};

/// A store that persists both entries and users.
///
/// Implemented automatically for anything implementing both ports, so the
/// in-memory and relational stores are interchangeable.
pub trait Storage: EntryRepository + UserRepository {}

impl<T> Storage for T where T: EntryRepository + UserRepository + ?Sized {}
