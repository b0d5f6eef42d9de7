//! Integration tests for report delivery over HTTP
//!
//! Uses wiremock as the collection endpoint and verifies the request the
//! agent emits for an intercepted error.

mod common;

use std::{sync::Arc, time::Duration};

use desole_agent::{Agent, HttpTransport, SlotHost, TrackOutcome};
use desole_core::{
    domain::{CaptureEvent, NativeError, Severity},
    ports::ErrorSignal,
    Config,
};
use serde_json::Value;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Starts a collector accepting `POST /collect`.
async fn setup_collector() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/collect"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    server
}

/// Waits until the collector has seen `count` requests or a second passes.
async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<Request> {
    for _ in 0..50 {
        let received = server.received_requests().await.unwrap_or_default();
        if received.len() >= count {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    server.received_requests().await.unwrap_or_default()
}

fn http_agent(server: &MockServer, host: Arc<SlotHost>) -> Agent {
    let config = Config::new(format!("{}/collect", server.uri())).with_tag("release", "r42");
    Agent::builder(config)
        .host(host)
        .environment(Arc::new(common::FixedEnvironment))
        .transport(Arc::new(HttpTransport::new()))
        .id_generator(Arc::new(common::SequentialIds::default()))
        .build()
}

#[tokio::test]
async fn test_intercepted_error_is_posted_as_json() {
    let server = setup_collector().await;
    let host = Arc::new(SlotHost::new());
    let _agent = http_agent(&server, host.clone());

    host.raise_error(
        &ErrorSignal::new("x is undefined").with_error(
            NativeError::new("TypeError", "x is undefined").with_stack("at f (a.js:1:1)"),
        ),
    );

    let requests = wait_for_requests(&server, 1).await;
    assert_eq!(requests.len(), 1);

    let body: Value = serde_json::from_slice(&requests[0].body).expect("JSON body");
    assert_eq!(body["severity"], "error");
    assert_eq!(body["type"], "TypeError");
    assert_eq!(body["message"], "x is undefined");
    assert_eq!(body["stack"], "at f (a.js:1:1)");
    assert_eq!(body["resource"], "https://shop.example/cart");
    assert_eq!(body["app"]["name"], "shop.example");
    assert_eq!(body["app"]["version"], false);
    assert_eq!(body["app"]["stage"], false);
    assert_eq!(body["endpoint"]["id"], "id-1");
    assert_eq!(body["endpoint"]["language"], "en-US");
    assert_eq!(body["endpoint"]["platform"], "Linux x86_64");
    assert_eq!(body["tags"]["release"], "r42");
    assert!(body["timestamp"].as_i64().is_some());
}

#[tokio::test]
async fn test_filtered_report_sends_nothing() {
    let server = setup_collector().await;
    let agent = http_agent(&server, Arc::new(SlotHost::new()));

    let outcome = agent.track(CaptureEvent::new(Severity::Warning, "Timeout"));
    assert_eq!(outcome, TrackOutcome::Filtered);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_failing_endpoint_does_not_surface() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let agent = http_agent(&server, Arc::new(SlotHost::new()));

    let outcome = agent.track(CaptureEvent::new(Severity::Error, "db down"));
    assert_eq!(outcome, TrackOutcome::Sent);

    let requests = wait_for_requests(&server, 1).await;
    assert_eq!(requests.len(), 1);
}
