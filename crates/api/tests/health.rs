//! Health check and cross-cutting HTTP behaviour.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get, send, spawn_app, StubGenerator, TestOptions};
use pagesmith_ai::TextGenerator;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = spawn_app();
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["triggerMode"], "inline");
    assert_eq!(json["rewriteConfigured"], false);
}

#[tokio::test]
async fn health_reports_configured_rewrite() {
    let app = build_test_app(TestOptions {
        generator: Some(StubGenerator::replying("{}") as Arc<dyn TextGenerator>),
        ..Default::default()
    });
    let json = body_json(get(&app, "/health").await).await;
    assert_eq!(json["rewriteConfigured"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = spawn_app();
    let response = get(&app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = spawn_app();
    let response = get(&app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Security headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_response_carries_base_security_headers() {
    let app = spawn_app();
    for uri in ["/health", "/api/v1/templates", "/api/v1/pages/nothing-here"] {
        let response = get(&app, uri).await;
        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff", "{uri}");
        assert_eq!(
            headers["referrer-policy"], "strict-origin-when-cross-origin",
            "{uri}"
        );
    }
}

#[tokio::test]
async fn editing_api_denies_framing_but_pages_do_not() {
    let app = spawn_app();

    let editing = get(&app, "/api/v1/templates").await;
    assert_eq!(editing.headers()["x-frame-options"], "DENY");

    let display = get(&app, "/api/v1/pages/nothing-here").await;
    assert!(display.headers().get("x-frame-options").is_none());
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = spawn_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/projects")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}
