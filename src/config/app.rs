// src/config/app.rs
use serde::Deserialize;
use std::{env, fs, io, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";
pub const ENV_CONFIG_PATH: &str = "BRAND_CONFIG_PATH";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Process-wide settings, built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` means the generator is not configured; requests get the fallback result.
    pub openai_api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `["*"]` allows any origin.
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// `AI_TEST_MODE`; "mock" swaps in a deterministic generator.
    pub test_mode: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            test_mode: None,
        }
    }
}

/// Optional overrides read from `config/app.toml`. The API key is never read from file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub allowed_origins: Option<Vec<String>>,
    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Missing file → empty overrides; unreadable or malformed file → error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to read config at {}: {}",
                    path.display(),
                    e
                ))
            }
        };
        Self::from_toml_str(&data)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {}", path.display(), e))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl AppConfig {
    /// Defaults ← file (`BRAND_CONFIG_PATH` or `config/app.toml`) ← process environment.
    pub fn load() -> anyhow::Result<Self> {
        let path = env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = FileConfig::load_from_file(&path)?;
        Ok(Self::from_sources(file, |k| env::var(k).ok()))
    }

    /// Merge file overrides and an environment lookup on top of the defaults.
    pub fn from_sources<F>(file: FileConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(m) = file.model {
            cfg.model = m;
        }
        if let Some(t) = file.temperature {
            cfg.temperature = t;
        }
        if let Some(n) = file.max_tokens {
            cfg.max_tokens = n;
        }
        if let Some(o) = file.allowed_origins {
            cfg.allowed_origins = o;
        }
        if let Some(s) = file.request_timeout_secs {
            cfg.request_timeout_secs = s;
        }

        let var = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        cfg.openai_api_key = var("OPENAI_API_KEY");
        cfg.test_mode = var("AI_TEST_MODE").map(|v| v.to_lowercase());
        if let Some(m) = var("OPENAI_MODEL") {
            cfg.model = m;
        }
        if let Some(t) = parse_or_warn::<f32>("OPENAI_TEMPERATURE", var("OPENAI_TEMPERATURE")) {
            cfg.temperature = t;
        }
        if let Some(n) = parse_or_warn::<u32>("OPENAI_MAX_TOKENS", var("OPENAI_MAX_TOKENS")) {
            cfg.max_tokens = n;
        }
        if let Some(s) = parse_or_warn::<u64>("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS")) {
            cfg.request_timeout_secs = s;
        }
        if let Some(raw) = var("ALLOWED_ORIGINS") {
            cfg.allowed_origins = split_origins(&raw);
        }

        cfg.sanitize();
        cfg
    }

    /// True when `allowed_origins` contains `*`.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    fn sanitize(&mut self) {
        if !self.temperature.is_finite() {
            self.temperature = DEFAULT_TEMPERATURE;
        }
        self.temperature = self.temperature.clamp(0.0, 2.0);
        if self.max_tokens == 0 {
            self.max_tokens = DEFAULT_MAX_TOKENS;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
        }
        self.allowed_origins.retain(|o| !o.trim().is_empty());
        if self.allowed_origins.is_empty() {
            self.allowed_origins = vec![DEFAULT_ALLOWED_ORIGIN.to_string()];
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| o.trim_end_matches('/').to_string())
        .collect()
}

fn parse_or_warn<T: std::str::FromStr>(name: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparseable config value");
            None
        }
    }
}
