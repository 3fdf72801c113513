// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /analyze (ranked answer, missing generator, failing generator, bad input)
// - CORS preflight for allowed / unknown origins

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    Router,
};
use http::{Request, StatusCode};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use brand_mention_analyzer::ai_adapter::TextGenerator;
use brand_mention_analyzer::api::{self, AppState, NOT_CONFIGURED_RESPONSE};
use brand_mention_analyzer::config::AppConfig;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

struct FixedGen(&'static str);

#[async_trait]
impl TextGenerator for FixedGen {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
    fn provider_name(&self) -> &'static str {
        "fixed"
    }
}

struct FailingGen;

#[async_trait]
impl TextGenerator for FailingGen {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("upstream timed out")
    }
    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

fn router_with(generator: Option<Arc<dyn TextGenerator>>) -> Router {
    api::router(AppState::new(AppConfig::default(), generator))
}

async fn post_analyze(app: Router, payload: Json) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /analyze");

    let resp = app.oneshot(req).await.expect("oneshot /analyze");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse analyze json");
    (status, v)
}

fn assert_neutral_fallback(v: &Json) {
    assert_eq!(v["mentioned"], json!(false));
    assert_eq!(v["position"], json!(0));
    assert_eq!(v["sentiment"], json!("neutral"));
    assert_eq!(v["score"].as_f64(), Some(0.0));
    assert_eq!(v["confidence"].as_f64(), Some(0.0));
    assert_eq!(v["contexts"], json!([]));
    assert!(v["error"].is_string(), "fallback must carry an error: {v}");
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = router_with(None);

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "OK", "health body should be 'OK'");
}

#[tokio::test]
async fn api_analyze_reports_list_rank_and_sentiment() {
    let app = router_with(Some(Arc::new(FixedGen(
        "Our top picks: 1. Acme Corp 2. Globex 3. Initech",
    ))));

    let (status, v) = post_analyze(
        app,
        json!({ "prompt": "list the best options", "brand": "Globex" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["mentioned"], json!(true));
    assert_eq!(v["position"], json!(2));
    assert_eq!(v["listRank"], json!(2));
    assert_eq!(v["brand"], json!("Globex"));
    assert_eq!(
        v["response"],
        json!("Our top picks: 1. Acme Corp 2. Globex 3. Initech")
    );
    assert!(v["sentiment"].is_string());
    assert!(v["contexts"].is_array());
    assert!(v.get("error").is_none(), "no error expected: {v}");
}

#[tokio::test]
async fn api_analyze_contexts_use_camel_case_fields() {
    let app = router_with(Some(Arc::new(FixedGen(
        "I really love Globex products, they are fantastic!",
    ))));

    let (status, v) = post_analyze(
        app,
        json!({ "prompt": "Tell me about Globex", "brand": "Globex" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["position"], json!(4));
    let s = v["sentiment"].as_str().expect("label");
    assert!(s == "positive" || s == "very_positive", "got {s}");
    let ctx = &v["contexts"][0];
    assert!(ctx.get("rawScore").is_some());
    assert!(ctx.get("positiveTerms").is_some());
    assert!(ctx.get("negativeTerms").is_some());
}

#[tokio::test]
async fn api_analyze_without_generator_returns_neutral_fallback() {
    let app = router_with(None);

    let (status, v) = post_analyze(
        app,
        json!({ "prompt": "best crm tools", "brand": "Globex" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_neutral_fallback(&v);
    assert_eq!(v["response"], json!(NOT_CONFIGURED_RESPONSE));
}

#[tokio::test]
async fn api_analyze_generator_failure_maps_to_502_fallback() {
    let app = router_with(Some(Arc::new(FailingGen)));

    let (status, v) = post_analyze(
        app,
        json!({ "prompt": "best crm tools", "brand": "Globex" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_neutral_fallback(&v);
    let err = v["error"].as_str().unwrap_or_default();
    assert!(err.contains("upstream timed out"), "error was: {err}");
}

#[tokio::test]
async fn api_analyze_rejects_blank_brand_or_prompt() {
    for payload in [
        json!({ "prompt": "best crm tools", "brand": "   " }),
        json!({ "brand": "Globex" }),
    ] {
        let app = router_with(Some(Arc::new(FixedGen("Globex"))));
        let (status, v) = post_analyze(app, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(v["error"].is_string());
    }
}

#[tokio::test]
async fn api_mock_mode_answers_without_network() {
    let cfg = AppConfig {
        test_mode: Some("mock".into()),
        ..AppConfig::default()
    };
    let app = api::router(AppState::from_config(cfg).expect("state"));

    let (status, v) = post_analyze(
        app,
        json!({ "prompt": "Which CRM do you recommend?", "brand": "Globex" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["mentioned"], json!(true));
    assert_eq!(v["position"], json!(2));
}

async fn preflight(app: Router, origin: &str) -> Option<String> {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/analyze")
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .expect("build preflight");
    let resp = app.oneshot(req).await.expect("oneshot preflight");
    resp.headers()
        .get("access-control-allow-origin")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}

#[tokio::test]
async fn cors_allows_only_configured_origins() {
    let cfg = AppConfig {
        allowed_origins: vec!["https://app.example".into()],
        ..AppConfig::default()
    };

    let allowed = preflight(
        api::router(AppState::new(cfg.clone(), None)),
        "https://app.example",
    )
    .await;
    assert_eq!(allowed.as_deref(), Some("https://app.example"));

    let denied = preflight(
        api::router(AppState::new(cfg, None)),
        "https://evil.example",
    )
    .await;
    assert!(denied.is_none());
}

#[tokio::test]
async fn cors_wildcard_allows_any_origin() {
    let cfg = AppConfig {
        allowed_origins: vec!["*".into()],
        ..AppConfig::default()
    };
    let got = preflight(
        api::router(AppState::new(cfg, None)),
        "https://anything.example",
    )
    .await;
    assert_eq!(got.as_deref(), Some("*"));
}
