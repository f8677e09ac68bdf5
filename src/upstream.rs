//! Numbers provider collaborator.
//!
//! The service never talks to the provider from inside a window lock. Handlers
//! call [`ResilientSource::fetch_or_degrade`], which always yields a list: on
//! failure or timeout the error is logged and replaced according to the
//! configured [`FallbackPolicy`].

use crate::config::{FallbackPolicy, UpstreamConfig, UpstreamMode};
use crate::error::{AppResult, AverageError};
use crate::kind::NumberKind;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Anything that can produce a list of numbers for a kind.
#[async_trait]
pub trait NumberSource: Send + Sync {
    /// Fetch the latest numbers for `kind`.
    ///
    /// Failures are reported as `AverageError::UpstreamUnavailable`.
    async fn fetch(&self, kind: NumberKind) -> AppResult<Vec<i64>>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Provider response body.
#[derive(Debug, Deserialize)]
struct NumbersResponse {
    #[serde(default)]
    numbers: Vec<i64>,
}

/// HTTP numbers provider (`GET {base_url}/{series}`).
pub struct HttpNumberSource {
    base_url: String,
    bearer_token: Option<String>,
    http_client: reqwest::Client,
}

impl HttpNumberSource {
    /// Build a client with the configured timeout.
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AverageError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
            http_client,
        })
    }

    /// Full URL for a kind's series.
    pub fn url_for(&self, kind: NumberKind) -> String {
        format!("{}/{}", self.base_url, kind.upstream_path())
    }
}

#[async_trait]
impl NumberSource for HttpNumberSource {
    async fn fetch(&self, kind: NumberKind) -> AppResult<Vec<i64>> {
        let url = self.url_for(kind);
        tracing::debug!(url = %url, "Fetching numbers");

        let mut request = self.http_client.get(&url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            let reason = if e.is_timeout() { "timed out" } else { "failed" };
            AverageError::UpstreamUnavailable(format!("request to {} {}: {}", url, reason, e))
        })?;

        if !response.status().is_success() {
            return Err(AverageError::UpstreamUnavailable(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let body: NumbersResponse = response.json().await.map_err(|e| {
            AverageError::UpstreamUnavailable(format!("invalid response from {}: {}", url, e))
        })?;

        Ok(body.numbers)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Offline provider serving the fixed per-kind series.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockNumberSource;

#[async_trait]
impl NumberSource for MockNumberSource {
    async fn fetch(&self, kind: NumberKind) -> AppResult<Vec<i64>> {
        Ok(kind.mock_numbers())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Wraps a source and absorbs its failures.
#[derive(Clone)]
pub struct ResilientSource {
    inner: Arc<dyn NumberSource>,
    fallback: FallbackPolicy,
}

impl ResilientSource {
    /// Wrap `inner`, substituting according to `fallback` on error.
    pub fn new(inner: Arc<dyn NumberSource>, fallback: FallbackPolicy) -> Self {
        Self { inner, fallback }
    }

    /// Build the configured provider.
    pub fn from_config(config: &UpstreamConfig) -> AppResult<Self> {
        let inner: Arc<dyn NumberSource> = match config.mode {
            UpstreamMode::Http => Arc::new(HttpNumberSource::new(config)?),
            UpstreamMode::Mock => Arc::new(MockNumberSource),
        };
        Ok(Self::new(inner, config.fallback))
    }

    /// Fetch numbers, never failing.
    pub async fn fetch_or_degrade(&self, kind: NumberKind) -> Vec<i64> {
        match self.inner.fetch(kind).await {
            Ok(numbers) => numbers,
            Err(e) => {
                let substitute = match self.fallback {
                    FallbackPolicy::Empty => Vec::new(),
                    FallbackPolicy::SampleData => kind.sample_numbers(),
                };
                tracing::warn!(
                    source = self.inner.name(),
                    kind = %kind,
                    fallback = ?self.fallback,
                    error = %e,
                    "Upstream fetch failed, substituting fallback numbers"
                );
                substitute
            }
        }
    }
}
