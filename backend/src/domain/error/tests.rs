//! Tests for the domain error payload and its serialised form.

use super::*;
use crate::domain::{FieldErrorCode, TraceId};
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no session"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("denied"), ErrorCode::Forbidden)]
#[case(Error::not_found("Entry not found"), ErrorCode::NotFound)]
#[case(Error::conflict("clash"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] code: ErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_the_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({"code": "not_found", "message": "Entry not found"});

    let error: Error = TraceId::scope(trace_id, async move {
        serde_json::from_value(payload).expect("valid payload")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_field_errors_in_camel_case(expected_trace_id: String) {
    let error = Error::invalid_request("Invalid entry data")
        .with_trace_id(expected_trace_id.clone())
        .with_field_errors(vec![FieldError::new(
            "title",
            FieldErrorCode::Required,
            "Title is required",
        )]);

    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "Invalid entry data",
            "traceId": expected_trace_id,
            "errors": [
                {"field": "title", "code": "required", "message": "Title is required"}
            ]
        })
    );
}

#[rstest]
fn omits_empty_optional_members() {
    let value = serde_json::to_value(Error::not_found("Entry not found")).expect("serialise");
    assert_eq!(value, json!({"code": "not_found", "message": "Entry not found"}));
}

#[rstest]
fn rejects_blank_messages_when_deserialising() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({"code": "internal_error", "message": " "}));
    assert!(result.is_err());
}
