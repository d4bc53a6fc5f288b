//! Domain types, validation, search and ports.
//!
//! Public surface:
//! - `Entry` and its identifiers, drafts and validation functions.
//! - `EntryFilter` / `compare_titles`: the shared filter and ordering rules.
//! - `User`, `UserProfile`, `LoginCredentials`.
//! - `Error` / `ErrorCode`: transport-agnostic error payload.
//! - `ports`: storage and identity provider capabilities.

pub mod auth;
pub mod entry;
pub mod error;
pub mod ports;
pub mod search;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::entry::{
    ActorId, ActorIdError, Category, Entry, EntryChanges, EntryDraft, EntryId, FieldError,
    FieldErrorCode, NewEntry, TITLE_MAX, ValidationErrors, validate_entry_changes,
    validate_new_entry,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::search::{ALL_CATEGORIES, CategoryFilter, EntryFilter, compare_titles, sort_entries};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, UserProfile, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use mimir::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Entry not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
