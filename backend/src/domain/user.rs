//! Users supplied by the identity provider.
//!
//! Profile attributes are authored elsewhere; this system only records them
//! when a user authenticates, stamping its own timestamps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors returned when constructing user values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    #[error("user id must not contain surrounding whitespace")]
    PaddedId,
    /// The display name was empty or whitespace.
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// Opaque user identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use mimir::domain::UserId;
    ///
    /// assert!(UserId::new("admin").is_ok());
    /// assert!(UserId::new(" admin").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile attributes supplied on every successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    id: UserId,
    display_name: String,
    avatar_url: Option<String>,
}

impl UserProfile {
    /// Validate and construct a profile.
    pub fn new(
        id: UserId,
        display_name: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        Ok(Self {
            id,
            display_name,
            avatar_url,
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Materialise a stored user from this profile.
    pub fn into_user(self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> User {
        User {
            id: self.id,
            display_name: self.display_name,
            avatar_url: self.avatar_url,
            created_at,
            updated_at,
        }
    }
}

/// Stored user record.
///
/// ## Invariants
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Refresh mutable profile attributes, keeping `created_at`.
    pub fn refresh(&mut self, profile: UserProfile, now: DateTime<Utc>) {
        self.display_name = profile.display_name;
        self.avatar_url = profile.avatar_url;
        self.updated_at = now.max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn profile(name: &str) -> UserProfile {
        UserProfile::new(UserId::new("admin").expect("valid id"), name, None)
            .expect("valid profile")
    }

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" admin", UserValidationError::PaddedId)]
    #[case("admin\n", UserValidationError::PaddedId)]
    fn user_id_rejects_invalid_values(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn profile_requires_display_name() {
        let id = UserId::new("admin").expect("valid id");
        assert_eq!(
            UserProfile::new(id, " ", None),
            Err(UserValidationError::EmptyDisplayName)
        );
    }

    #[rstest]
    fn refresh_keeps_created_at() {
        let created = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let mut user = profile("Admin").into_user(created, created);

        let later = created + Duration::days(1);
        user.refresh(profile("Allfather"), later);

        assert_eq!(user.display_name, "Allfather");
        assert_eq!(user.created_at, created);
        assert_eq!(user.updated_at, later);
    }

    #[rstest]
    fn user_serialises_in_camel_case() {
        let at = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let value = serde_json::to_value(profile("Admin").into_user(at, at)).expect("serialise");

        assert_eq!(value["id"], "admin");
        assert_eq!(value["displayName"], "Admin");
        assert!(value["avatarUrl"].is_null());
    }
}
