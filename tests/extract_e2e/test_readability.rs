//! E2E tests: the Readability extractor against a live mock site.

use std::sync::Arc;
use std::time::Duration;

use article_extractor_lib::config::FetchSettings;
use article_extractor_lib::services::ReadabilityExtractor;
use article_extractor_lib::services::extractor::{CONTENT_CLASS, TITLE_CLASS};

use super::mock_site::{
    ARTICLE_MARKER, BOILERPLATE_MARKER, HUGE_PAGE_BYTES, LATIN1_MARKER, MockSite,
    SLOW_PAGE_DELAY,
};
use super::test_helpers::*;

fn test_settings() -> FetchSettings {
    FetchSettings {
        connect_timeout: Duration::from_secs(2),
        timeout: Duration::from_secs(10),
        max_page_size: 1024 * 1024,
        ..FetchSettings::default()
    }
}

fn extractor_with(settings: FetchSettings) -> Arc<ReadabilityExtractor> {
    Arc::new(ReadabilityExtractor::new(&settings).expect("extractor"))
}

fn readability_extractor(max_page_size: usize) -> Arc<ReadabilityExtractor> {
    extractor_with(FetchSettings {
        max_page_size,
        ..test_settings()
    })
}

/// Reachable article → highlighted main content without boilerplate.
#[actix_rt::test]
async fn test_extracts_article_from_live_page() {
    let site = MockSite::start();
    let app = create_test_app(readability_extractor(1024 * 1024)).await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some(&site.url("/article"))),
    )
    .await;

    assert_html_200(&resp);
    assert!(!resp.body.starts_with("ERROR: "), "got {:?}", resp.body);
    assert!(resp.body.contains(CONTENT_CLASS));
    assert!(resp.body.contains(TITLE_CLASS));
    assert!(resp.body.contains(ARTICLE_MARKER));
    assert!(!resp.body.contains(BOILERPLATE_MARKER));
}

/// Upstream 404 → `ERROR: Upstream returned 404`.
#[actix_rt::test]
async fn test_upstream_error_status_reported() {
    let site = MockSite::start();
    let app = create_test_app(readability_extractor(1024 * 1024)).await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some(&site.url("/missing"))),
    )
    .await;

    assert_html_200(&resp);
    assert_eq!(resp.body, "ERROR: Upstream returned 404\n");
}

/// Page over the size limit → `ERROR: Page exceeds ...`.
#[actix_rt::test]
async fn test_oversized_page_rejected() {
    let site = MockSite::start();
    let limit = HUGE_PAGE_BYTES / 2;
    let app = create_test_app(readability_extractor(limit)).await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some(&site.url("/huge"))),
    )
    .await;

    assert_html_200(&resp);
    assert_eq!(resp.body, format!("ERROR: Page exceeds {limit} bytes\n"));
}

/// Nothing listening → `ERROR: Fetch failed: ...`.
#[actix_rt::test]
async fn test_unreachable_host_reported() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let app = create_test_app(readability_extractor(1024 * 1024)).await;

    let resp = get_extract(
        &app,
        &extract_query(
            Some(TEST_AUTH_KEY),
            Some(&format!("http://127.0.0.1:{port}/article")),
        ),
    )
    .await;

    assert_html_200(&resp);
    assert!(resp.body.starts_with("ERROR: "), "got {:?}", resp.body);
}

/// Page served as ISO-8859-1 → accented text survives decoding.
#[actix_rt::test]
async fn test_latin1_page_decoded_from_header_charset() {
    let site = MockSite::start();
    let app = create_test_app(readability_extractor(1024 * 1024)).await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some(&site.url("/latin1"))),
    )
    .await;

    assert_html_200(&resp);
    assert!(!resp.body.starts_with("ERROR: "), "got {:?}", resp.body);
    assert!(resp.body.contains(LATIN1_MARKER), "got {:?}", resp.body);
    assert!(!resp.body.contains('\u{FFFD}'));
}

/// Redirect chain within the limit is followed to the article.
#[actix_rt::test]
async fn test_redirects_within_limit_followed() {
    let site = MockSite::start();
    let app = create_test_app(extractor_with(FetchSettings {
        max_redirects: 3,
        ..test_settings()
    }))
    .await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some(&site.url("/redirect/3"))),
    )
    .await;

    assert_html_200(&resp);
    assert!(resp.body.contains(ARTICLE_MARKER), "got {:?}", resp.body);
}

/// Redirect chain longer than the limit → `ERROR: Fetch failed: ...`.
#[actix_rt::test]
async fn test_redirects_beyond_limit_rejected() {
    let site = MockSite::start();
    let app = create_test_app(extractor_with(FetchSettings {
        max_redirects: 3,
        ..test_settings()
    }))
    .await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some(&site.url("/redirect/4"))),
    )
    .await;

    assert_html_200(&resp);
    assert!(
        resp.body.starts_with("ERROR: Fetch failed: "),
        "got {:?}",
        resp.body
    );
}

/// Configured User-Agent is sent upstream.
#[actix_rt::test]
async fn test_configured_user_agent_sent() {
    let site = MockSite::start();
    let user_agent = "coastal-archive-bot/2.1";
    let app = create_test_app(extractor_with(FetchSettings {
        user_agent: user_agent.to_string(),
        ..test_settings()
    }))
    .await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some(&site.url("/echo-ua"))),
    )
    .await;

    assert_html_200(&resp);
    assert!(
        resp.body.contains(&format!("Requested by {user_agent}.")),
        "got {:?}",
        resp.body
    );
}

/// Upstream slower than the fetch timeout → `ERROR: Fetch timed out: ...`.
#[actix_rt::test]
async fn test_slow_upstream_times_out() {
    let site = MockSite::start();
    let timeout = Duration::from_secs(1);
    assert!(timeout < SLOW_PAGE_DELAY);
    let app = create_test_app(extractor_with(FetchSettings {
        timeout,
        ..test_settings()
    }))
    .await;

    let resp = get_extract(
        &app,
        &extract_query(Some(TEST_AUTH_KEY), Some(&site.url("/slow"))),
    )
    .await;

    assert_html_200(&resp);
    assert!(
        resp.body.starts_with("ERROR: Fetch timed out: "),
        "got {:?}",
        resp.body
    );
}
