//! AI rewrites through the HTTP API with a stub generator.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, post_json, ready_acme, spawn_app, StubGenerator, TestApp,
    TestOptions, STYLE_NOTES,
};
use pagesmith_ai::TextGenerator;
use serde_json::json;

fn app_with(generator: &Arc<StubGenerator>) -> TestApp {
    build_test_app(TestOptions {
        generator: Some(Arc::clone(generator) as Arc<dyn TextGenerator>),
        ..Default::default()
    })
}

#[tokio::test]
async fn single_field_rewrite_in_spanish() {
    let generator = StubGenerator::replying(
        r#"{"rewrites": [{"path": "hero.headline", "text": "¡Envía dinero rápido y sin complicaciones!"}]}"#,
    );
    let app = app_with(&generator);
    let id = ready_acme(&app).await;

    let response = post_json(
        &app,
        "/api/v1/rewrite",
        &json!({
            "projectId": id,
            "fields": [{ "path": "hero.headline", "text": "Send Money Fast" }],
            "tone": "friendly",
            "language": "es",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rewrites = json["rewrites"].as_array().unwrap();
    assert_eq!(rewrites.len(), 1);
    assert_eq!(rewrites[0]["path"], "hero.headline");
    assert_eq!(rewrites[0]["text"], "¡Envía dinero rápido y sin complicaciones!");
    assert!(json["warnings"].as_array().unwrap().is_empty());

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("Spanish"));
    assert!(prompt.contains("Acme Bank"));
}

#[tokio::test]
async fn output_keeps_input_order_and_count() {
    let generator = StubGenerator::replying(
        r#"{"rewrites": [
            {"path": "finalCta.ctaText", "text": "Start now"},
            {"path": "hero.headline", "text": "Money home, fast"},
            {"path": "pricing.headline", "text": "Fees you can see"}
        ]}"#,
    );
    let app = app_with(&generator);
    let id = ready_acme(&app).await;

    let response = post_json(
        &app,
        "/api/v1/rewrite",
        &json!({
            "projectId": id,
            "fields": [
                { "path": "hero.headline", "text": "Send Money Fast" },
                { "path": "hero.subheadline", "text": "Deliver to {Country} today" },
                { "path": "finalCta.ctaText", "text": "Get started" },
            ],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let paths: Vec<&str> = json["rewrites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, ["hero.headline", "hero.subheadline", "finalCta.ctaText"]);
    // The missing field keeps its text, placeholder included.
    assert_eq!(json["rewrites"][1]["text"], "Deliver to {Country} today");

    let warnings = json["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 2);
}

#[tokio::test]
async fn style_hints_default_to_brand_notes() {
    let generator = StubGenerator::replying(r#"{"rewrites": []}"#);
    let app = app_with(&generator);
    let id = ready_acme(&app).await;

    let response = post_json(
        &app,
        "/api/v1/rewrite",
        &json!({
            "projectId": id,
            "fields": [{ "path": "hero.headline", "text": "Send Money Fast" }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(generator.last_prompt().unwrap().contains(STYLE_NOTES));

    post_json(
        &app,
        "/api/v1/rewrite",
        &json!({
            "projectId": id,
            "fields": [{ "path": "hero.headline", "text": "Send Money Fast" }],
            "styleHints": "Playful, lots of emoji",
        }),
    )
    .await;
    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("Playful, lots of emoji"));
    assert!(!prompt.contains(STYLE_NOTES));
}

#[tokio::test]
async fn generator_failure_is_502_rewrite_failed() {
    let generator = StubGenerator::failing("connection reset");
    let app = app_with(&generator);
    let id = ready_acme(&app).await;

    let response = post_json(
        &app,
        "/api/v1/rewrite",
        &json!({
            "projectId": id,
            "fields": [{ "path": "hero.headline", "text": "Send Money Fast" }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "REWRITE_FAILED");
    assert!(json.get("rewrites").is_none());
}

#[tokio::test]
async fn malformed_completion_is_502() {
    let generator = StubGenerator::replying("Sure! Here are some ideas for your headline.");
    let app = app_with(&generator);
    let id = ready_acme(&app).await;

    let response = post_json(
        &app,
        "/api/v1/rewrite",
        &json!({
            "projectId": id,
            "fields": [{ "path": "hero.headline", "text": "Send Money Fast" }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn unconfigured_generator_is_502() {
    let app = spawn_app();
    let id = ready_acme(&app).await;

    let response = post_json(
        &app,
        "/api/v1/rewrite",
        &json!({
            "projectId": id,
            "fields": [{ "path": "hero.headline", "text": "Send Money Fast" }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("generation service not configured"));
}

#[tokio::test]
async fn unknown_project_is_404() {
    let generator = StubGenerator::replying(r#"{"rewrites": []}"#);
    let app = app_with(&generator);

    let response = post_json(
        &app,
        "/api/v1/rewrite",
        &json!({
            "projectId": 777,
            "fields": [{ "path": "hero.headline", "text": "Send Money Fast" }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(generator.last_prompt().is_none());
}

#[tokio::test]
async fn unaddressable_path_is_400() {
    let generator = StubGenerator::replying(r#"{"rewrites": []}"#);
    let app = app_with(&generator);
    let id = ready_acme(&app).await;

    let response = post_json(
        &app,
        "/api/v1/rewrite",
        &json!({
            "projectId": id,
            "fields": [{ "path": "sidebar.title", "text": "Hello" }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_PATH");
}
