use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const ANALYZE_REQUESTS: &str = "brand_analyze_requests_total";
pub const BRAND_MENTIONS: &str = "brand_mentions_total";
pub const GENERATION_LATENCY_MS: &str = "brand_generation_latency_ms";
pub const GENERATOR_CONFIGURED: &str = "brand_generator_configured";

/// How a `/analyze` request ended, used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Analyzed,
    NotConfigured,
    GeneratorError,
    BadRequest,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Analyzed => "analyzed",
            Outcome::NotConfigured => "not_configured",
            Outcome::GeneratorError => "generator_error",
            Outcome::BadRequest => "bad_request",
        }
    }
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and describe our series.
    pub fn init(generator_configured: bool) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

        describe_counter!(ANALYZE_REQUESTS, "Analyze requests by outcome");
        describe_counter!(BRAND_MENTIONS, "Answers in which the brand was found");
        describe_histogram!(GENERATION_LATENCY_MS, "Generative model call latency (ms)");
        describe_gauge!(GENERATOR_CONFIGURED, "1 when a text generator is configured");

        gauge!(GENERATOR_CONFIGURED).set(if generator_configured { 1.0 } else { 0.0 });

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Without an installed recorder these are no-ops (tests, offline tool).
pub fn record_outcome(outcome: Outcome) {
    counter!(ANALYZE_REQUESTS, "outcome" => outcome.as_str()).increment(1);
}

pub fn record_mention(mentioned: bool) {
    if mentioned {
        counter!(BRAND_MENTIONS).increment(1);
    }
}

pub fn record_generation_latency(ms: f64) {
    histogram!(GENERATION_LATENCY_MS).record(ms);
}
