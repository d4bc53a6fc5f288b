//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa during document generation"
)]

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request clashes with the current state.
    #[schema(rename = "conflict")]
    Conflict,
    /// Storage is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::FieldErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FieldErrorCode)]
pub enum FieldErrorCodeSchema {
    #[schema(rename = "required")]
    Required,
    #[schema(rename = "invalid_type")]
    InvalidType,
    #[schema(rename = "blank")]
    Blank,
    #[schema(rename = "too_long")]
    TooLong,
    #[schema(rename = "invalid_character")]
    InvalidCharacter,
    #[schema(rename = "unknown_category")]
    UnknownCategory,
}

/// OpenAPI schema for [`crate::domain::FieldError`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FieldError)]
pub struct FieldErrorSchema {
    /// Offending field; list items use `relatedTerms.{index}`.
    #[schema(example = "title")]
    field: String,
    code: FieldErrorCodeSchema,
    #[schema(example = "Title is required")]
    message: String,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Invalid entry data")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
    /// Field-level validation failures; omitted when empty.
    errors: Option<Vec<FieldErrorSchema>>,
}

/// OpenAPI schema for [`crate::domain::Category`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Category)]
pub enum CategorySchema {
    #[schema(rename = "deity")]
    Deity,
    #[schema(rename = "place")]
    Place,
    #[schema(rename = "concept")]
    Concept,
    #[schema(rename = "artifact")]
    Artifact,
    #[schema(rename = "creature")]
    Creature,
    #[schema(rename = "event")]
    Event,
}

/// OpenAPI schema for [`crate::domain::Entry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Entry, rename_all = "camelCase")]
pub struct EntrySchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "Odin")]
    title: String,
    category: CategorySchema,
    #[schema(example = "The Allfather of the Aesir")]
    description: String,
    related_terms: Option<Vec<String>>,
    sources: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
    /// User id of the creator, or `system` for seeded entries.
    #[schema(example = "admin")]
    created_by: String,
}

/// OpenAPI schema for [`crate::domain::EntryDraft`].
///
/// Every field is optional on update; `title`, `category` and `description`
/// are required on create.
#[derive(ToSchema)]
#[schema(as = crate::domain::EntryDraft, rename_all = "camelCase")]
pub struct EntryDraftSchema {
    #[schema(max_length = 200, example = "Odin")]
    title: Option<String>,
    #[schema(example = "deity")]
    category: Option<String>,
    description: Option<String>,
    /// `null` clears the stored list.
    related_terms: Option<Vec<String>>,
    /// `null` or blank text clears the stored value.
    sources: Option<String>,
}

/// OpenAPI schema for a page of entries.
#[derive(ToSchema)]
#[schema(as = pagination::Page, rename_all = "camelCase")]
pub struct EntryPageSchema {
    entries: Vec<EntrySchema>,
    total: u64,
    page: u32,
    total_pages: u64,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
pub struct UserSchema {
    /// Stable user identifier.
    #[schema(example = "admin")]
    id: String,
    /// Display name supplied by the identity provider.
    #[schema(example = "Admin")]
    display_name: String,
    avatar_url: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// Plain confirmation body, e.g. `{"message":"Entry deleted successfully"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
