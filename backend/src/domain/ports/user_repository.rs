//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Insert the profile as a new user, or refresh the existing record's
    /// profile attributes and `updated_at`.
    async fn upsert_user(&self, profile: UserProfile) -> Result<User, UserRepositoryError>;
}
