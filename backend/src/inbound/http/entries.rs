//! Entry API handlers.
//!
//! ```text
//! GET    /api/entries?search=&category=&page=&limit=
//! GET    /api/entries/{id}
//! POST   /api/entries          (session required)
//! PUT    /api/entries/{id}     (session required)
//! DELETE /api/entries/{id}     (session required)
//! ```
//!
//! Write payloads are validated before any storage call, so a rejected body
//! never mutates state.

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{Page, PageRequest, PageRequestError};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::domain::{
    Entry, EntryDraft, EntryFilter, EntryId, Error, ValidationErrors, validate_entry_changes,
    validate_new_entry,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::entry_storage_error;
use crate::inbound::http::schemas::{
    EntryDraftSchema, EntryPageSchema, EntrySchema, ErrorSchema, MessageResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const NOT_FOUND_MESSAGE: &str = "Entry not found";
const INVALID_ENTRY_MESSAGE: &str = "Invalid entry data";
const DELETED_MESSAGE: &str = "Entry deleted successfully";

/// Query parameters for `GET /api/entries`.
///
/// `page` and `limit` stay raw so non-numeric values produce the standard
/// validation envelope rather than an extractor failure.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEntriesQuery {
    /// Case-insensitive substring matched against title, description and
    /// related terms.
    pub search: Option<String>,
    /// Category name, or `all`.
    pub category: Option<String>,
    /// 1-based page number; defaults to 1.
    #[param(value_type = Option<u32>, minimum = 1)]
    pub page: Option<String>,
    /// Page size; defaults to 12.
    #[param(value_type = Option<u32>, minimum = 1)]
    pub limit: Option<String>,
}

fn map_page_request_error(err: &PageRequestError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": "invalid_pagination",
    }))
}

fn map_validation_errors(errors: ValidationErrors) -> Error {
    Error::invalid_request(INVALID_ENTRY_MESSAGE).with_field_errors(errors.into_inner())
}

/// Parse a path id; ids that are not UUIDs can never exist.
fn parse_entry_id(raw: &str) -> Result<EntryId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(NOT_FOUND_MESSAGE))
}

/// List or search entries, one page at a time.
///
/// Pages past the end are returned empty with the usual totals.
#[utoipa::path(
    get,
    path = "/api/entries",
    params(ListEntriesQuery),
    responses(
        (status = 200, description = "Page of entries in title order", body = EntryPageSchema),
        (status = 400, description = "Invalid pagination parameters", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "listEntries",
    security([])
)]
#[get("/entries")]
pub async fn list_entries(
    state: web::Data<HttpState>,
    query: web::Query<ListEntriesQuery>,
) -> ApiResult<web::Json<Page<Entry>>> {
    let ListEntriesQuery {
        search,
        category,
        page,
        limit,
    } = query.into_inner();
    let request = PageRequest::from_raw(page.as_deref(), limit.as_deref())
        .map_err(|err| map_page_request_error(&err))?;
    let filter = EntryFilter::new(search.as_deref(), category.as_deref());

    let entries = if filter.is_unrestricted() {
        state
            .entries
            .get_all_entries()
            .await
            .map_err(|err| entry_storage_error(err, "list entries"))?
    } else {
        state
            .entries
            .search_entries(&filter)
            .await
            .map_err(|err| entry_storage_error(err, "search entries"))?
    };

    Ok(web::Json(Page::from_items(entries, request)))
}

/// Fetch a single entry.
#[utoipa::path(
    get,
    path = "/api/entries/{id}",
    params(("id" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry", body = EntrySchema),
        (status = 404, description = "Entry not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "getEntry",
    security([])
)]
#[get("/entries/{id}")]
pub async fn get_entry(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Entry>> {
    let id = parse_entry_id(&path)?;
    let entry = state
        .entries
        .get_entry(&id)
        .await
        .map_err(|err| entry_storage_error(err, "get entry"))?
        .ok_or_else(|| Error::not_found(NOT_FOUND_MESSAGE))?;
    Ok(web::Json(entry))
}

/// Create an entry attributed to the signed-in user.
#[utoipa::path(
    post,
    path = "/api/entries",
    request_body = EntryDraftSchema,
    responses(
        (status = 201, description = "Entry created", body = EntrySchema),
        (status = 400, description = "Invalid entry data", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "createEntry"
)]
#[post("/entries")]
pub async fn create_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EntryDraft>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let data = validate_new_entry(payload.into_inner()).map_err(map_validation_errors)?;
    let entry = state
        .entries
        .create_entry(data, &actor)
        .await
        .map_err(|err| entry_storage_error(err, "create entry"))?;
    info!(entry_id = %entry.id, %actor, "entry created");
    Ok(HttpResponse::Created().json(entry))
}

/// Merge the supplied fields onto an existing entry.
///
/// Omitted fields are left unchanged; `null` clears `relatedTerms` or
/// `sources`.
#[utoipa::path(
    put,
    path = "/api/entries/{id}",
    params(("id" = String, Path, description = "Entry identifier")),
    request_body = EntryDraftSchema,
    responses(
        (status = 200, description = "Entry updated", body = EntrySchema),
        (status = 400, description = "Invalid entry data", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Entry not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "updateEntry"
)]
#[put("/entries/{id}")]
pub async fn update_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EntryDraft>,
) -> ApiResult<web::Json<Entry>> {
    let actor = session.require_actor()?;
    let id = parse_entry_id(&path)?;
    let changes = validate_entry_changes(payload.into_inner()).map_err(map_validation_errors)?;
    let entry = state
        .entries
        .update_entry(&id, changes, &actor)
        .await
        .map_err(|err| entry_storage_error(err, "update entry"))?
        .ok_or_else(|| Error::not_found(NOT_FOUND_MESSAGE))?;
    info!(entry_id = %entry.id, %actor, "entry updated");
    Ok(web::Json(entry))
}

/// Delete an entry.
#[utoipa::path(
    delete,
    path = "/api/entries/{id}",
    params(("id" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Entry not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["entries"],
    operation_id = "deleteEntry"
)]
#[delete("/entries/{id}")]
pub async fn delete_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let actor = session.require_actor()?;
    let id = parse_entry_id(&path)?;
    let deleted = state
        .entries
        .delete_entry(&id)
        .await
        .map_err(|err| entry_storage_error(err, "delete entry"))?;
    if !deleted {
        return Err(Error::not_found(NOT_FOUND_MESSAGE));
    }
    info!(entry_id = %id, %actor, "entry deleted");
    Ok(web::Json(MessageResponse::new(DELETED_MESSAGE)))
}
