//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod entry_repository;
mod identity_provider;
mod storage;
mod user_repository;

#[cfg(test)]
pub use entry_repository::MockEntryRepository;
pub use entry_repository::{EntryRepository, EntryRepositoryError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
pub use storage::Storage;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
