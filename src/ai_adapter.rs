//! AI adapter: the generative model that answers the user's prompt.
//!
//! The analysis core never sees this module; the API layer calls `generate` once per
//! request and hands the returned text to `analyze::analyze_response`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const USER_AGENT: &str = "brand-mention-analyzer/0.1";

/// Text generator used by the `/analyze` handler.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Answer `prompt` with free text.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
    /// Provider name for diagnostics/logs.
    fn provider_name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynGenerator = Arc<dyn TextGenerator>;

/// Factory: build a generator according to config.
///
/// * `AI_TEST_MODE=mock` → deterministic mock.
/// * API key present → OpenAI.
/// * Otherwise `None`; the handler answers with the fallback result.
pub fn build_generator(cfg: &AppConfig) -> anyhow::Result<Option<DynGenerator>> {
    if cfg.test_mode.as_deref() == Some("mock") {
        return Ok(Some(Arc::new(MockGenerator::default())));
    }
    match cfg.openai_api_key.as_deref() {
        Some(key) => Ok(Some(Arc::new(OpenAiGenerator::new(cfg, key)?))),
        None => Ok(None),
    }
}

// ------------------------------------------------------------
// OpenAI
// ------------------------------------------------------------

/// OpenAI Chat Completions client.
pub struct OpenAiGenerator {
    http: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGenerator {
    pub fn new(cfg: &AppConfig, api_key: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("building reqwest client")?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        })
    }
}

#[derive(Serialize)]
struct ChatMsg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatReq<'a> {
    model: &'a str,
    messages: Vec<ChatMsg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let req = ChatReq {
            model: &self.model,
            messages: vec![ChatMsg {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let resp = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("OpenAI returned HTTP {}", status.as_u16());
        }

        let body: ChatResp = resp.json().await.context("OpenAI response was not valid JSON")?;
        extract_content(body)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

fn extract_content(body: ChatResp) -> anyhow::Result<String> {
    let content = body
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();
    if content.is_empty() {
        anyhow::bail!("OpenAI returned an empty answer");
    }
    Ok(content)
}

// ------------------------------------------------------------
// Mock
// ------------------------------------------------------------

/// Deterministic generator for tests and local runs.
#[derive(Clone)]
pub struct MockGenerator {
    pub fixed: String,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self {
            fixed: "Here are some popular options:\n\n1. **Acme Corp**: reliable and affordable\n2. **Globex**: great support\n3. **Initech**: solid but expensive".to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.fixed.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
