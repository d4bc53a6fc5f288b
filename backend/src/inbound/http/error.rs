//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain and port failures into consistent JSON responses
//! and status codes.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::error;

use crate::domain::ports::{EntryRepositoryError, UserRepositoryError};
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

const INTERNAL_MESSAGE: &str = "Internal server error";
const UNAVAILABLE_MESSAGE: &str = "Storage unavailable";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal(INTERNAL_MESSAGE);
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}

/// Log an entry storage failure and convert it into a client-safe error.
///
/// Connection failures become `503`; anything else becomes `500`. The root
/// cause only reaches the log.
pub(crate) fn entry_storage_error(err: EntryRepositoryError, operation: &'static str) -> Error {
    error!(error = %err, %operation, "entry storage failed");
    match err {
        EntryRepositoryError::Connection { .. } => Error::service_unavailable(UNAVAILABLE_MESSAGE),
        EntryRepositoryError::Query { .. } => Error::internal(INTERNAL_MESSAGE),
    }
}

/// User storage counterpart of [`entry_storage_error`].
pub(crate) fn user_storage_error(err: UserRepositoryError, operation: &'static str) -> Error {
    error!(error = %err, %operation, "user storage failed");
    match err {
        UserRepositoryError::Connection { .. } => Error::service_unavailable(UNAVAILABLE_MESSAGE),
        UserRepositoryError::Query { .. } => Error::internal(INTERNAL_MESSAGE),
    }
}

fn json_payload_error(err: &JsonPayloadError) -> Error {
    let message = match err {
        JsonPayloadError::ContentType => "Request body must be JSON".to_owned(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Request body is too large".to_owned()
        }
        other => format!("Malformed JSON body: {other}"),
    };
    Error::invalid_request(message).with_details(json!({ "code": "malformed_body" }))
}

/// JSON extractor configuration returning the standard error envelope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use mimir::inbound::http::json_config;
///
/// let _app = App::new().app_data(json_config());
/// ```
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        json_payload_error(&err).into()
    })
}

/// Query-string extractor configuration returning the standard error envelope.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        Error::invalid_request(format!("Malformed query string: {err}"))
            .with_details(json!({ "code": "malformed_query" }))
            .into()
    })
}
