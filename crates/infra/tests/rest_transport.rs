//! Wire-level tests for the REST transport against a mock server

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use desksync_core::transport::ApiTransport;
use desksync_domain::{ApiFailure, TenantContext};
use desksync_infra::{HttpClient, RestTransport, StaticTokenProvider};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(uri: &str) -> RestTransport {
    let http = HttpClient::builder()
        .max_attempts(3)
        .base_backoff(Duration::from_millis(5))
        .build()
        .expect("http client");
    RestTransport::with_http_client(http, uri, Arc::new(StaticTokenProvider::new("test-token")))
}

fn envelope(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "data": data,
        "message": null,
    }))
}

#[tokio::test]
async fn every_request_carries_tenant_and_bearer_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/departments/departments/lookup"))
        .and(header("X-Tenant-ID", "acme"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(envelope(json!([{ "id": "dep-1", "name": "Support" }])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    let data = transport
        .get_json(&TenantContext::new("acme"), "/departments/departments/lookup", &[])
        .await
        .expect("data");

    assert_eq!(data, json!([{ "id": "dep-1", "name": "Support" }]));
}

#[tokio::test]
async fn query_params_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/search-documents"))
        .and(query_param("page", "2"))
        .and(query_param("query", "vpn"))
        .respond_with(envelope(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    let params =
        vec![("page".to_string(), "2".to_string()), ("query".to_string(), "vpn".to_string())];
    transport
        .get_json(&TenantContext::new("acme"), "/documents/search-documents", &params)
        .await
        .expect("data");
}

#[tokio::test]
async fn post_sends_the_json_body() {
    let server = MockServer::start().await;
    let body = json!({ "id": "doc-1", "title": "Renamed" });
    Mock::given(method("POST"))
        .and(path("/documents/requests-update-data"))
        .and(body_json(body.clone()))
        .respond_with(envelope(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    transport
        .post_json(&TenantContext::new("acme"), "/documents/requests-update-data", &body)
        .await
        .expect("data");
}

#[tokio::test]
async fn success_false_becomes_an_app_failure_with_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "data": null,
            "message": "Document is locked by another admin",
        })))
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    let result = transport
        .delete_json(&TenantContext::new("acme"), "/documents/delete-doc-by-id", None)
        .await;

    assert_eq!(
        result.unwrap_err(),
        ApiFailure::App("Document is locked by another admin".into())
    );
}

#[tokio::test]
async fn success_false_without_a_message_yields_an_empty_app_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    let result = transport.get_json(&TenantContext::new("acme"), "/categories", &[]).await;

    // The empty message is preserved; the generic fallback is applied at
    // the notice layer, not here.
    assert_eq!(result.unwrap_err(), ApiFailure::App(String::new()));
}

#[tokio::test]
async fn non_2xx_status_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    let result = transport.get_json(&TenantContext::new("acme"), "/categories", &[]).await;

    match result.unwrap_err() {
        ApiFailure::Transport(message) => assert!(message.contains("404")),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    let result = transport.get_json(&TenantContext::new("acme"), "/categories", &[]).await;

    assert_eq!(
        result.unwrap_err(),
        ApiFailure::Transport("malformed response envelope".into())
    );
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_clone = attempts.clone();
    Mock::given(method("GET"))
        .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
            if attempts_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "success": true,
                    "data": { "ok": true },
                }))
            }
        })
        .expect(3)
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    let data = transport
        .get_json(&TenantContext::new("acme"), "/departments/departments", &[])
        .await
        .expect("data");

    assert_eq!(data, json!({ "ok": true }));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn delete_with_no_content_yields_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    let data = transport
        .delete_json(&TenantContext::new("acme"), "/categories/cat-1", None)
        .await
        .expect("data");

    assert_eq!(data, Value::Null);
}

#[tokio::test]
async fn binary_endpoints_bypass_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents/get-files/data"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x25, 0x50, 0x44, 0x46]))
        .mount(&server)
        .await;

    let transport = transport(&server.uri());
    let bytes = transport
        .get_bytes(&TenantContext::new("acme"), "/documents/get-files/data", &[])
        .await
        .expect("bytes");

    assert_eq!(bytes, vec![0x25, 0x50, 0x44, 0x46]);
}
