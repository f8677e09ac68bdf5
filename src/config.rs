//! Service configuration using Figment.
//!
//! Configuration is loaded from:
//! 1. `config/window_average.toml` (base configuration, optional)
//! 2. Environment variables prefixed with `WINDOW_AVG_`, nested with `__`
//!
//! Every field has a default, so an empty or missing file yields a working
//! service on port 9876 with windows of 10.
//!
//! # Example
//! ```no_run
//! use window_average::config::ServiceConfig;
//!
//! let config = ServiceConfig::load()?;
//! config.validate()?;
//! println!("Listening on port {}", config.server.port);
//! # Ok::<(), window_average::error::AverageError>(())
//! ```

use crate::error::{AppResult, AverageError};
use crate::validation::{is_in_range, is_valid_port, is_valid_url};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/window_average.toml";

/// Prefix for environment overrides, e.g. `WINDOW_AVG_SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "WINDOW_AVG_";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Application settings
    pub application: ApplicationConfig,
    /// HTTP listener and window settings
    pub server: ServerConfig,
    /// Numbers provider settings
    pub upstream: UpstreamConfig,
    /// Request rate limiting
    pub rate_limit: RateLimitConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Application name
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format (pretty, compact, json)
    pub log_format: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Window capacity used when a request has no `windowSize`
    pub default_window_size: usize,
    /// Largest `windowSize` a request may ask for (0 = no limit)
    pub max_window_size: usize,
}

/// Where numbers come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamMode {
    /// Fetch from the HTTP numbers provider
    Http,
    /// Serve the built-in fixed series without any network access
    Mock,
}

/// What to substitute when the provider fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Merge nothing
    Empty,
    /// Merge the fixed per-kind sample series
    SampleData,
}

/// Numbers provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Provider mode
    pub mode: UpstreamMode,
    /// Base URL; the kind's series name is appended (`{base_url}/primes`)
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Optional bearer token sent with every request
    pub bearer_token: Option<String>,
    /// Behaviour on failure or timeout
    pub fallback: FallbackPolicy,
}

/// Fixed-window rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per window (0 disables limiting)
    pub requests_per_window: u32,
    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "window-average".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9876,
            default_window_size: 10,
            max_window_size: 0,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            mode: UpstreamMode::Http,
            base_url: "http://20.244.56.144/numbers".to_string(),
            timeout_ms: 500,
            bearer_token: None,
            fallback: FallbackPolicy::Empty,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 0,
            window_secs: 1,
        }
    }
}

impl UpstreamConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ServerConfig {
    /// Upper bound on `windowSize`, or `None` when unlimited
    pub fn window_size_limit(&self) -> Option<usize> {
        (self.max_window_size > 0).then_some(self.max_window_size)
    }
}

impl ServiceConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> AppResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    ///
    /// Environment variables override file values, e.g.
    /// `WINDOW_AVG_UPSTREAM__TIMEOUT_MS=1000`.
    pub fn load_from<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Self::figment(path.as_ref()).extract().map_err(AverageError::from)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(ServiceConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> AppResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.to_lowercase().as_str()) {
            return Err(AverageError::Configuration(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            )));
        }

        let valid_formats = ["pretty", "compact", "json"];
        if !valid_formats.contains(&self.application.log_format.as_str()) {
            return Err(AverageError::Configuration(format!(
                "Invalid log_format '{}'. Must be one of: {}",
                self.application.log_format,
                valid_formats.join(", ")
            )));
        }

        is_valid_port(self.server.port).map_err(|e| AverageError::Configuration(e.to_string()))?;

        is_in_range(
            self.server.default_window_size,
            1..=self.server.window_size_limit().unwrap_or(usize::MAX),
        )
        .map_err(|_| {
            AverageError::Configuration(format!(
                "default_window_size {} must be between 1 and max_window_size {} (0 = no limit)",
                self.server.default_window_size, self.server.max_window_size
            ))
        })?;

        if self.upstream.mode == UpstreamMode::Http {
            is_valid_url(&self.upstream.base_url).map_err(|e| {
                AverageError::Configuration(format!(
                    "Invalid upstream base_url '{}': {}",
                    self.upstream.base_url, e
                ))
            })?;
        }

        if self.upstream.timeout_ms == 0 {
            return Err(AverageError::Configuration(
                "upstream timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit.requests_per_window > 0 && self.rate_limit.window_secs == 0 {
            return Err(AverageError::Configuration(
                "rate_limit window_secs must be greater than 0 when limiting is enabled"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
