//! Tests for the domain error taxonomy.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn invalid_request_constructor_sets_code() {
    let err = Error::invalid_request("bad record");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "bad record");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InternalError, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
#[case(Error::invalid_request("x"), false)]
#[case(Error::not_found("x"), true)]
#[case(Error::conflict("x"), true)]
#[case(Error::service_unavailable("x"), true)]
#[case(Error::internal("x"), false)]
fn retryability_follows_taxonomy(#[case] error: Error, #[case] expected: bool) {
    assert_eq!(error.is_retryable(), expected);
}

#[rstest]
fn serialises_with_snake_case_code() {
    let value = serde_json::to_value(Error::not_found("person missing")).expect("serialise");
    assert_eq!(
        value,
        json!({ "code": "not_found", "message": "person missing" })
    );
}

#[rstest]
fn deserialisation_rejects_blank_message() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({ "code": "conflict", "message": " " }));
    assert!(result.is_err());
}

#[rstest]
fn display_renders_message() {
    assert_eq!(Error::conflict("dup key").to_string(), "dup key");
}
