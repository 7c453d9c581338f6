//! End-to-end tests of live lookups against a mock aggregator.
//!
//! The mock serves the execute endpoint as a `text/event-stream` body, so these
//! tests cover the HTTP transport, the SSE parser, the session manager, and the
//! result classifier together.

mod helpers;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use helpers::{data_frame, error_frame, sse_frame, sse_response, start_frame, test_config};
use indicator_console::initialization::{init_client, init_transport};
use indicator_console::session::FnInvalidator;
use indicator_console::{
    run_lookup, IndicatorKind, LookupRequest, SessionManager, SessionPhase, SourceErrorKind,
    SourceRef, StreamError,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ids(partition: &[indicator_console::RankedSource<'_>]) -> Vec<String> {
    partition.iter().map(|r| r.id.to_string()).collect()
}

fn ip_request() -> LookupRequest {
    LookupRequest::new("8.8.8.8", IndicatorKind::Ipv4, vec![])
}

#[tokio::test]
async fn test_lookup_scenario_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/execute"))
        .and(query_param("data", "8.8.8.8"))
        .and(query_param("kind", "IPV4"))
        .and(header("accept", "text/event-stream"))
        .respond_with(sse_response(&[
            start_frame("req-1", &[("s1", "Alpha", true), ("s2", "Beta", true)]),
            data_frame("s1", json!([1, 2, 3])),
            error_frame("s2", json!([{"kind": "TIMEOUT"}])),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let report = run_lookup(test_config(&server.uri()), ip_request())
        .await
        .expect("lookup should complete");

    assert_eq!(report.request_id(), Some("req-1"));
    assert_eq!(report.session.phase(), SessionPhase::Completed);

    let c = report.classification();
    assert_eq!(ids(&c.without_errors), vec!["s1"]);
    assert_eq!(ids(&c.with_errors), vec!["s2"]);
    assert!(c.missing_source_code.is_empty());
    assert_eq!(c.without_errors[0].cardinality(), 3);
    assert_eq!(ids(&c.tag_buckets[&SourceErrorKind::Timeout]), vec!["s2"]);
}

#[tokio::test]
async fn test_lookup_scenario_two_missing_source_code_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/execute"))
        .respond_with(sse_response(&[
            start_frame("req-2", &[("s1", "Alpha", true), ("s2", "Beta", false)]),
            data_frame("s1", json!([1, 2, 3])),
            error_frame("s2", json!([{"kind": "MISSING_SOURCE_CODE"}])),
            data_frame("s2", json!([1])),
        ]))
        .mount(&server)
        .await;

    let report = run_lookup(test_config(&server.uri()), ip_request())
        .await
        .expect("lookup should complete");

    let c = report.classification();
    assert_eq!(ids(&c.without_errors), vec!["s1"]);
    assert!(c.with_errors.is_empty());
    assert_eq!(ids(&c.missing_source_code), vec!["s2"]);
}

#[tokio::test]
async fn test_lookup_sends_selected_sources_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/execute"))
        .and(query_param("kind", "DOMAIN"))
        .and(query_param("sources", "s1"))
        .and(query_param("sources", "s2"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(sse_response(&[start_frame("req-3", &[("s1", "Alpha", true)])]))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.api_token = Some("secret-token".to_string());
    let request = LookupRequest::new(
        "example.com",
        IndicatorKind::Domain,
        vec![SourceRef::new("s1", "Alpha"), SourceRef::new("s2", "Beta")],
    );

    let report = run_lookup(config, request).await.expect("lookup should complete");
    assert_eq!(report.results().len(), 1);
}

#[tokio::test]
async fn test_lookup_skips_malformed_and_unknown_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/execute"))
        .respond_with(sse_response(&[
            ": keep-alive\n\n".to_string(),
            start_frame("req-4", &[("s1", "Alpha", true)]),
            sse_frame("heartbeat", "x", &json!({})),
            "event: fetching_data\nid: s1\ndata: {not json\n\n".to_string(),
            data_frame("s1", json!(["a"])),
        ]))
        .mount(&server)
        .await;

    let report = run_lookup(test_config(&server.uri()), ip_request())
        .await
        .expect("bad frames are not fatal");
    assert_eq!(report.results()["s1"].cardinality(), 1);
}

#[tokio::test]
async fn test_unauthorized_stream_fails_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/execute"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = run_lookup(test_config(&server.uri()), ip_request())
        .await
        .expect_err("401 must fail the session");
    assert_eq!(
        err.downcast_ref::<StreamError>(),
        Some(&StreamError::Unauthorized)
    );
}

#[tokio::test]
async fn test_server_error_fails_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/execute"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = run_lookup(test_config(&server.uri()), ip_request())
        .await
        .expect_err("500 must fail the session");
    assert_eq!(
        err.downcast_ref::<StreamError>(),
        Some(&StreamError::Status(500))
    );
}

#[tokio::test]
async fn test_superseded_http_session_never_updates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/execute"))
        .and(query_param("data", "slow.example"))
        .respond_with(
            sse_response(&[start_frame("req-slow", &[("s9", "Slow", true)])])
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/execute"))
        .and(query_param("data", "fast.example"))
        .respond_with(sse_response(&[
            start_frame("req-fast", &[("s1", "Alpha", true)]),
            data_frame("s1", json!([1])),
        ]))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = init_client(&config).unwrap();
    let transport = init_transport(&config, client).unwrap();

    let invalidations = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&invalidations);
    let mut manager = SessionManager::new(transport).with_invalidator(Arc::new(FnInvalidator(
        move |_key: &str| *counter.lock().unwrap() += 1,
    )));

    let slow = manager.open(Some(LookupRequest::new(
        "slow.example",
        IndicatorKind::Domain,
        vec![],
    )));
    let fast = manager.open(Some(LookupRequest::new(
        "fast.example",
        IndicatorKind::Domain,
        vec![],
    )));

    let fast_session = fast.settled().await.expect("fast lookup completes");
    assert_eq!(fast_session.request_id(), Some("req-fast"));
    assert!(fast_session.state().results().contains_key("s1"));
    assert!(!fast_session.state().results().contains_key("s9"));

    tokio::time::sleep(Duration::from_millis(500)).await;
    let slow_session = slow.snapshot();
    assert_eq!(slow_session.phase(), SessionPhase::Closed);
    assert!(slow_session.state().data.is_none());
    assert_eq!(fast.snapshot().request_id(), Some("req-fast"));
    // Only the connection that was still current counts as opened.
    assert_eq!(*invalidations.lock().unwrap(), 1);
}
