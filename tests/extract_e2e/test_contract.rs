//! E2E tests: response contract for valid keys.

use std::sync::Arc;

use actix_web::test;
use article_extractor_lib::services::extractor::CONTENT_CLASS;

use super::test_helpers::*;

/// Valid key + malformed URL → `ERROR: ...`, extractor never called.
#[actix_rt::test]
async fn test_malformed_url_reports_error() {
    let stub = Arc::new(StubExtractor::default());
    let app = create_test_app(stub.clone()).await;

    let resp = get_extract(&app, &extract_query(Some(TEST_AUTH_KEY), Some("not a url"))).await;

    assert_html_200(&resp);
    assert!(resp.body.starts_with("ERROR: "), "got {:?}", resp.body);
    assert_ne!(resp.body, INVALID_KEY_BODY);
    assert_eq!(stub.calls(), 0);
}

/// Valid key + no URL → `ERROR: Missing url parameter`.
#[actix_rt::test]
async fn test_missing_url_reports_error() {
    let stub = Arc::new(StubExtractor::default());
    let app = create_test_app(stub).await;

    let resp = get_extract(&app, &extract_query(Some(TEST_AUTH_KEY), None)).await;

    assert_html_200(&resp);
    assert_eq!(resp.body, "ERROR: Missing url parameter\n");
}

/// Valid key + non-http scheme → `ERROR: Unsupported URL scheme: file`.
#[actix_rt::test]
async fn test_non_http_scheme_reports_error() {
    let stub = Arc::new(StubExtractor::default());
    let app = create_test_app(stub.clone()).await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some("file:///etc/passwd")),
    )
    .await;

    assert_html_200(&resp);
    assert_eq!(resp.body, "ERROR: Unsupported URL scheme: file\n");
    assert_eq!(stub.calls(), 0);
}

/// Valid key + good URL → extractor HTML with highlighting markup.
#[actix_rt::test]
async fn test_valid_request_returns_extracted_html() {
    let stub = Arc::new(StubExtractor::default());
    let app = create_test_app(stub.clone()).await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some("https://example.com/story")),
    )
    .await;

    assert_html_200(&resp);
    assert!(!resp.body.starts_with("ERROR: "));
    assert!(resp.body.contains(CONTENT_CLASS));
    assert!(resp.body.contains("Main content of https://example.com/story"));
    assert_eq!(stub.calls(), 1);
}

/// Extractor failure → `ERROR: <description>` with status 200.
#[actix_rt::test]
async fn test_extractor_failure_reported_in_body() {
    let app = create_test_app(Arc::new(TimeoutExtractor)).await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some("https://slow.example.com/")),
    )
    .await;

    assert_html_200(&resp);
    assert_eq!(resp.body, "ERROR: Fetch timed out: operation timed out\n");
}

/// Broken percent-encoding in the query still gets a 200 error body.
#[actix_rt::test]
async fn test_garbled_query_is_still_200() {
    let stub = Arc::new(StubExtractor::default());
    let app = create_test_app(stub).await;

    let resp = get_extract(&app, "key=%ZZ&&url").await;

    assert_html_200(&resp);
    assert!(resp.body.starts_with("ERROR: "));
}

/// Health endpoint stays JSON and healthy.
#[actix_rt::test]
async fn test_health_endpoint() {
    let app = create_test_app(Arc::new(StubExtractor::default())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());

    let mut keys: Vec<&str> = body
        .as_object()
        .expect("health body is an object")
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, ["status", "timestamp"]);
}
