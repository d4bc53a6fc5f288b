//! Login credentials passed to the identity provider.

use zeroize::Zeroizing;

/// Reasons a login payload is rejected before reaching the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginValidationError {
    /// Payload field the error refers to.
    pub const fn field(self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

/// Validated login credentials.
///
/// The username is trimmed; the password is kept verbatim and wiped from
/// memory on drop.
///
/// # Examples
/// ```
/// use mimir::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("  ", "pw", LoginValidationError::EmptyUsername)]
    #[case("admin", "", LoginValidationError::EmptyPassword)]
    fn blank_values_are_rejected(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        assert_eq!(
            LoginCredentials::try_from_parts(username, password),
            Err(expected)
        );
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("admin", " pw ").expect("valid");
        assert_eq!(creds.password(), " pw ");
    }
}
