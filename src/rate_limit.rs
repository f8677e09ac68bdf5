//! Fixed-window request limiter for the numbers endpoint.

use crate::config::RateLimitConfig;
use crate::error::{AppResult, AverageError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug)]
struct WindowCounter {
    started: Instant,
    count: u32,
}

/// Allows at most `limit` requests per `window`; a limit of 0 disables it.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    state: Mutex<WindowCounter>,
}

impl RateLimiter {
    /// Create a limiter allowing `limit` requests every `window`.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Mutex::new(WindowCounter {
                started: Instant::now(),
                count: 0,
            }),
        }
    }

    /// Limiter from configuration.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.requests_per_window,
            Duration::from_secs(config.window_secs),
        )
    }

    /// True when no limit is applied.
    pub fn is_disabled(&self) -> bool {
        self.limit == 0
    }

    /// Count one request, failing with `RateLimited` when the budget is spent.
    pub async fn try_acquire(&self) -> AppResult<()> {
        if self.is_disabled() {
            return Ok(());
        }

        let mut state = self.state.lock().await;
        if state.started.elapsed() >= self.window {
            state.started = Instant::now();
            state.count = 0;
        }

        if state.count >= self.limit {
            return Err(AverageError::RateLimited);
        }
        state.count += 1;
        Ok(())
    }
}
