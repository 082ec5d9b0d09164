//! Shared test harness for E2E integration tests.
//!
//! Runs the real `GeminiClient` and `ReconClient` against two wiremock
//! servers and exposes the chat router built on top of them.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rc_agent::{ChatAgent, ChatbotConfig};
use rc_chat_api::routes::build_router;
use rc_chat_api::state::AppState;

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

/// Marker present only in the endpoint-selection prompt.
pub const SELECTION_MARKER: &str = "API Specification:";
/// Marker present only in the summarization prompt.
pub const SUMMARY_MARKER: &str = "API response data:";
/// Marker present only in the fallback prompt.
pub const FALLBACK_MARKER: &str = "cannot be answered using the available Ozone Recon API";

const SCHEMA: &str = r#"openapi: 3.0.0
info:
  title: Ozone Recon REST API
paths:
  /clusterState:
    get:
      summary: Overall cluster state
"#;

/// End-to-end harness: mock Gemini + mock Recon + real agent and router.
pub struct TestHarness {
    pub gemini: MockServer,
    pub recon: MockServer,
    pub config: ChatbotConfig,
    pub agent: Arc<ChatAgent>,
    pub router: Router,
}

impl TestHarness {
    pub async fn start() -> Self {
        let gemini = MockServer::start().await;
        let recon = MockServer::start().await;

        let docs_dir = write_docs();
        let mut config = ChatbotConfig::default();
        config.gemini.api_key = Some("e2e-key".into());
        config.gemini.base_url = gemini.uri();
        config.gemini.timeout_secs = Some(5);
        config.recon.base_url = recon.uri();
        config.recon.timeout_secs = Some(5);
        config.docs.schema_path = docs_dir.join("recon-api.yaml");
        config.docs.guide_path = docs_dir.join("recon-api-guide.md");

        let agent = ChatAgent::from_config(&config).expect("agent should build");
        let state = AppState {
            agent: Some(Arc::new(agent)),
        };
        let agent = state.agent.clone().unwrap();
        let router = build_router(state);

        Self {
            gemini,
            recon,
            config,
            agent,
            router,
        }
    }

    /// Gemini replies `text` to prompts containing `marker`.
    pub async fn gemini_replies(&self, marker: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(body_string_contains(marker))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(text)))
            .mount(&self.gemini)
            .await;
    }

    /// Gemini fails every request with `status`.
    pub async fn gemini_fails(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string("gemini unavailable"))
            .mount(&self.gemini)
            .await;
    }

    /// Recon serves `body` on GET `endpoint`.
    pub async fn recon_serves(&self, endpoint: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.recon)
            .await;
    }

    /// Number of requests Recon received.
    pub async fn recon_request_count(&self) -> usize {
        self.recon
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }

    /// POST /chat through the router.
    pub async fn chat(&self, query: &str) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({ "query": query });
        self.send(
            Request::post("/chat")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        send(&self.router, request).await
    }
}

/// Send a request to any router and decode its JSON body.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// A generateContent response carrying `text`.
pub fn gemini_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

fn write_docs() -> PathBuf {
    static NEXT: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);
    let n = NEXT.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("rc-e2e-{}-{n}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("recon-api.yaml"), SCHEMA).unwrap();
    dir
}
