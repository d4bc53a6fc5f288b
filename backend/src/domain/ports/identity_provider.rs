//! Driving port for authenticating credentials against an identity provider.
//!
//! The provider owns profile attributes; callers upsert the returned profile
//! into storage on every successful login.

use async_trait::async_trait;

use crate::domain::{LoginCredentials, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The username or password was not accepted.
        InvalidCredentials => "invalid credentials",
        /// The provider could not be reached.
        Unavailable { message: String } => "identity provider unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate credentials and return the authenticated user's profile.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<UserProfile, IdentityProviderError>;
}

/// Development provider accepting a single fixed account.
///
/// `admin` / `password` authenticates as the user `admin`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

impl FixtureIdentityProvider {
    const USERNAME: &'static str = "admin";
    const PASSWORD: &'static str = "password";
    const DISPLAY_NAME: &'static str = "Admin";
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<UserProfile, IdentityProviderError> {
        if credentials.username() != Self::USERNAME || credentials.password() != Self::PASSWORD {
            return Err(IdentityProviderError::invalid_credentials());
        }
        let id = UserId::new(Self::USERNAME)
            .map_err(|err| IdentityProviderError::unavailable(err.to_string()))?;
        UserProfile::new(id, Self::DISPLAY_NAME, None)
            .map_err(|err| IdentityProviderError::unavailable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password", true)]
    #[case("admin", "wrong", false)]
    #[case("odin", "password", false)]
    #[tokio::test]
    async fn fixture_accepts_only_the_development_account(
        #[case] username: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let creds = LoginCredentials::try_from_parts(username, password).expect("credentials");
        let result = FixtureIdentityProvider.authenticate(&creds).await;
        match (should_succeed, result) {
            (true, Ok(profile)) => assert_eq!(profile.id().as_str(), "admin"),
            (false, Err(err)) => assert_eq!(err, IdentityProviderError::InvalidCredentials),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(profile)) => panic!("expected failure, got profile: {profile:?}"),
        }
    }
}
