//! Tests for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(ErrorCode::InvalidRequest, Error::invalid_request("x"))]
#[case(ErrorCode::NotFound, Error::not_found("x"))]
#[case(ErrorCode::RateLimited, Error::rate_limited("x"))]
#[case(ErrorCode::InternalError, Error::internal("x"))]
fn convenience_constructors_set_code(#[case] expected: ErrorCode, #[case] err: Error) {
    assert_eq!(err.code(), expected);
    assert_eq!(err.message(), "x");
}

#[rstest]
#[case(ErrorCode::InternalError, "", "Internal server error")]
#[case(ErrorCode::NotFound, "   ", "Not found")]
fn new_substitutes_fallback_for_blank_message(
    #[case] code: ErrorCode,
    #[case] message: &str,
    #[case] expected: &str,
) {
    assert_eq!(Error::new(code, message).message(), expected);
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id = TraceId::generate();
    let err = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(err.trace_id(), Some(trace_id.to_string().as_str()));
}

#[test]
fn trace_id_absent_outside_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[test]
fn builders_attach_trace_id_and_details() {
    let err = Error::invalid_request("bad")
        .with_trace_id("abc")
        .with_details(json!({ "field": "name" }));
    assert_eq!(err.trace_id(), Some("abc"));
    assert_eq!(err.details(), Some(&json!({ "field": "name" })));
}

#[test]
fn serialises_camel_case_and_skips_empty_fields() {
    let plain = serde_json::to_value(Error::not_found("gone")).expect("serialise");
    assert_eq!(plain, json!({ "code": "not_found", "message": "gone" }));

    let traced =
        serde_json::to_value(Error::rate_limited("slow down").with_trace_id("t-1")).expect("serialise");
    assert_eq!(traced.get("traceId"), Some(&json!("t-1")));
    assert_eq!(traced.get("code"), Some(&json!("rate_limited")));
}

#[test]
fn display_uses_message() {
    assert_eq!(Error::internal("kaput").to_string(), "kaput");
}
