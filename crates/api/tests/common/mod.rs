#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use pagesmith_ai::{AiError, RewriteEngine, TextGenerator};
use pagesmith_api::config::{ServerConfig, TriggerMode};
use pagesmith_api::router::build_app_router;
use pagesmith_api::state::AppState;
use pagesmith_brand::{BrandExtractor, ExtractError, ExtractedBrand};
use pagesmith_core::project::BrandStyle;
use pagesmith_db::MemoryStore;
use pagesmith_pipeline::{InlineSubmitter, Orchestrator, PipelineConfig, StaticSynthesizer};
use serde_json::Value;
use tower::ServiceExt;

pub const STYLE_NOTES: &str = "Trusted since 1950";

// ---------------------------------------------------------------------------
// Stubs
// ---------------------------------------------------------------------------

/// Returns a fixed brand without touching the network.
pub struct StubExtractor;

#[async_trait]
impl BrandExtractor for StubExtractor {
    async fn extract(&self, _source_url: &str) -> Result<ExtractedBrand, ExtractError> {
        Ok(ExtractedBrand {
            style: BrandStyle {
                primary_color: Some("#003366".into()),
                font_families: vec!["Inter".into()],
                logo_url: Some("https://example-bank.com/logo.svg".into()),
                style_notes: Some(STYLE_NOTES.into()),
                ..Default::default()
            },
            detected_language: None,
        })
    }
}

/// Always fails, as an unreachable source site would.
pub struct FailingExtractor;

#[async_trait]
impl BrandExtractor for FailingExtractor {
    async fn extract(&self, _source_url: &str) -> Result<ExtractedBrand, ExtractError> {
        Err(ExtractError::HttpStatus(404))
    }
}

/// Replies with a canned completion and records every prompt it sees.
pub struct StubGenerator {
    reply: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(AiError::Network)
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        trigger_mode: TriggerMode::Inline,
        cache_pages: false,
    }
}

pub struct TestOptions {
    pub server: ServerConfig,
    pub pipeline: PipelineConfig,
    pub extractor: Arc<dyn BrandExtractor>,
    pub generator: Option<Arc<dyn TextGenerator>>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            server: test_config(),
            pipeline: PipelineConfig::default(),
            extractor: Arc::new(StubExtractor),
            generator: None,
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub submitter: Arc<InlineSubmitter>,
}

/// Full router over the in-memory store with inline pipeline runs.
pub fn build_test_app(options: TestOptions) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Arc::new(Orchestrator::new(
        store.clone(),
        options.extractor,
        Arc::new(StaticSynthesizer),
        options.pipeline.clone(),
    ));
    let submitter = Arc::new(InlineSubmitter::new(orchestrator));

    let state = AppState {
        store: store.clone(),
        submitter: submitter.clone(),
        rewrite: RewriteEngine::new(options.generator),
        config: Arc::new(options.server.clone()),
        pipeline: Arc::new(options.pipeline),
    };

    TestApp {
        router: build_app_router(state, &options.server),
        store,
        submitter,
    }
}

pub fn spawn_app() -> TestApp {
    build_test_app(TestOptions::default())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn send_json(app: &TestApp, method: Method, uri: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: &Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create the standard "Acme Bank" project and return the response body.
pub async fn create_acme(app: &TestApp) -> Value {
    let response = post_json(
        app,
        "/api/v1/projects",
        &serde_json::json!({
            "sourceUrl": "https://example-bank.com",
            "clientName": "Acme Bank",
            "tone": "neutral",
            "locale": "auto",
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await
}

/// Poll the admin read until the project leaves `pending`.
pub async fn wait_for_terminal(app: &TestApp, project_id: i64) -> Value {
    for _ in 0..200 {
        let body = body_json(get(app, &format!("/api/v1/projects/{project_id}")).await).await;
        if body["status"] != "pending" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("project {project_id} never left pending");
}

/// Create "Acme Bank" and wait for its pipeline run. Returns the project id.
pub async fn ready_acme(app: &TestApp) -> i64 {
    let created = create_acme(app).await;
    let id = created["projectId"].as_i64().unwrap();
    let detail = wait_for_terminal(app, id).await;
    assert_eq!(detail["status"], "ready");
    id
}
