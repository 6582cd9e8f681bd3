//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::test::TestRequest;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

async fn decode(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(expected_trace_id: String) {
    let error = Error::internal("database password is hunter2")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace id header")
        .to_str()
        .expect("ascii header")
        .to_owned();
    assert_eq!(header, expected_trace_id);

    let payload = decode(response).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn validation_errors_keep_details() {
    let error = Error::invalid_request("bad").with_details(json!({"field": "range", "index": 1}));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());

    let payload = decode(response).await;
    assert_eq!(payload, error);
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

#[rstest]
#[actix_web::test]
async fn json_errors_map_to_invalid_request() {
    let request = TestRequest::default().to_http_request();
    let err = json_error_handler(JsonPayloadError::ContentType, &request);

    let response = err.error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = decode(response).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        payload.details().and_then(|details| details.get("code")),
        Some(&json!("malformed_json"))
    );
}
