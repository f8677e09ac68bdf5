//! # Window Average Service
//!
//! A small HTTP microservice that keeps a sliding window of recent numbers per
//! number kind (primes, fibonacci, even, random) and reports the window's average.
//!
//! Each call to `GET /numbers/{kind}` fetches a fresh list from an upstream numbers
//! provider, merges it into that kind's window, and returns the window before and
//! after the merge together with the rounded mean.
//!
//! ## Crate Structure
//!
//! - **`data`**: `BoundedWindow`, the fixed-capacity, duplicate-free FIFO behind every window.
//! - **`store`**: `WindowStore`, one locked window per kind; the only mutable state.
//! - **`kind`**: the closed set of number kinds and their path codes.
//! - **`upstream`**: the `NumberSource` trait, the HTTP and mock providers, and
//!   `ResilientSource`, which absorbs provider failures.
//! - **`http`**: hyper server, routing and JSON responses.
//! - **`config`**: Figment-based configuration (TOML file + environment).
//! - **`logging`**: `tracing-subscriber` setup.
//! - **`rate_limit`**: fixed-window request limiter.
//! - **`validation`**: request and configuration validators.
//! - **`error`**: the `AverageError` enum and its HTTP status mapping.

pub mod config;
pub mod data;
pub mod error;
pub mod http;
pub mod kind;
pub mod logging;
pub mod rate_limit;
pub mod store;
pub mod upstream;
pub mod validation;
