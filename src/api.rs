use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::ai_adapter::{build_generator, DynGenerator};
use crate::analyze::{analyze_response, BrandAnalysis, SentimentContext, SentimentLabel};
use crate::config::AppConfig;
use crate::metrics::{record_generation_latency, record_mention, record_outcome, Outcome};

/// Answer text returned when no generator is configured.
pub const NOT_CONFIGURED_RESPONSE: &str =
    "No answer was generated: the OpenAI API key is not configured.";
pub const NOT_CONFIGURED_ERROR: &str = "OPENAI_API_KEY is not set";

/// Shared, read-only state. Nothing here changes between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub generator: Option<DynGenerator>,
}

impl AppState {
    pub fn new(config: AppConfig, generator: Option<DynGenerator>) -> Self {
        Self {
            config: Arc::new(config),
            generator,
        }
    }

    /// Builds the generator the config asks for (OpenAI, mock, or none).
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let generator = build_generator(&config)?;
        Ok(Self::new(config, generator))
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(cfg: &AppConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if cfg.allows_any_origin() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "skipping invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeReq {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub brand: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResp {
    /// The generated answer (or a stand-in text when generation was skipped).
    pub response: String,
    pub brand: String,
    pub mentioned: bool,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_rank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_position: Option<usize>,
    pub sentiment: SentimentLabel,
    pub score: f64,
    pub comparative: f64,
    pub confidence: f64,
    pub contexts: Vec<SentimentContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResp {
    pub fn from_analysis(response: String, brand: String, a: BrandAnalysis) -> Self {
        Self {
            response,
            brand,
            mentioned: a.mention.mentioned,
            position: a.mention.position,
            list_rank: a.mention.list_rank,
            word_position: a.mention.word_position,
            sentiment: a.sentiment.label,
            score: a.sentiment.score,
            comparative: a.sentiment.comparative,
            confidence: a.sentiment.confidence,
            contexts: a.sentiment.contexts,
            error: None,
        }
    }

    /// Neutral zero-valued record used whenever the core was not run.
    pub fn fallback(response: String, brand: String, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::from_analysis(response, brand, BrandAnalysis::default())
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResp {
    error: String,
}

async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeReq>) -> Response {
    let prompt = body.prompt.trim();
    let brand = body.brand.trim();

    if prompt.is_empty() || brand.is_empty() {
        record_outcome(Outcome::BadRequest);
        let err = ErrorResp {
            error: "both `prompt` and `brand` are required".to_string(),
        };
        return (StatusCode::BAD_REQUEST, Json(err)).into_response();
    }

    let id = anon_hash(prompt);

    let Some(generator) = state.generator.as_ref() else {
        warn!(%id, "analyze skipped: no text generator configured");
        record_outcome(Outcome::NotConfigured);
        let resp = AnalyzeResp::fallback(
            NOT_CONFIGURED_RESPONSE.to_string(),
            brand.to_string(),
            NOT_CONFIGURED_ERROR.to_string(),
        );
        return (StatusCode::OK, Json(resp)).into_response();
    };

    let started = Instant::now();
    let generated = generator.generate(prompt).await;
    record_generation_latency(started.elapsed().as_secs_f64() * 1000.0);

    let text = match generated {
        Ok(t) => t,
        Err(e) => {
            warn!(%id, provider = generator.provider_name(), error = %e, "text generation failed");
            record_outcome(Outcome::GeneratorError);
            let resp = AnalyzeResp::fallback(
                String::new(),
                brand.to_string(),
                format!("Failed to generate a response: {e:#}"),
            );
            return (StatusCode::BAD_GATEWAY, Json(resp)).into_response();
        }
    };

    let analysis = analyze_response(&text, brand, prompt);
    record_outcome(Outcome::Analyzed);
    record_mention(analysis.mention.mentioned);
    info!(
        %id,
        provider = generator.provider_name(),
        mentioned = analysis.mention.mentioned,
        position = analysis.mention.position,
        sentiment = analysis.sentiment.label.as_str(),
        "analyze done"
    );

    let resp = AnalyzeResp::from_analysis(text, brand.to_string(), analysis);
    (StatusCode::OK, Json(resp)).into_response()
}

/// Short SHA-256 prefix used in logs instead of raw prompts.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
