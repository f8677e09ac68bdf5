//! Shared request-handler state.

use crate::config::ServiceConfig;
use crate::error::AppResult;
use crate::rate_limit::RateLimiter;
use crate::store::WindowStore;
use crate::upstream::ResilientSource;
use std::time::{Duration, Instant};

/// Everything a request handler needs, shared behind an `Arc`.
pub struct AppState {
    /// Per-kind windows
    pub store: WindowStore,
    /// Numbers provider with failure absorption
    pub source: ResilientSource,
    /// Request limiter for `/numbers`
    pub limiter: RateLimiter,
    /// Capacity used when `windowSize` is absent
    pub default_window_size: usize,
    /// Largest accepted `windowSize`, if limited
    pub max_window_size: Option<usize>,
    /// Reported by `/health`
    pub service_name: String,
    started_at: Instant,
}

impl AppState {
    /// Build state with the provider described by `config.upstream`.
    pub fn from_config(config: &ServiceConfig) -> AppResult<Self> {
        let source = ResilientSource::from_config(&config.upstream)?;
        Self::with_source(config, source)
    }

    /// Build state around an explicit provider.
    pub fn with_source(config: &ServiceConfig, source: ResilientSource) -> AppResult<Self> {
        Ok(Self {
            store: WindowStore::new(config.server.default_window_size)?,
            source,
            limiter: RateLimiter::from_config(&config.rate_limit),
            default_window_size: config.server.default_window_size,
            max_window_size: config.server.window_size_limit(),
            service_name: config.application.name.clone(),
            started_at: Instant::now(),
        })
    }

    /// Time since the state was created.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
