//! HTTP surface of the service.
//!
//! - `GET /numbers/{p|f|e|r}?windowSize=N` merges freshly fetched numbers into the
//!   kind's window and returns `{windowPrevState, windowCurrState, numbers, avg}`.
//! - `GET /health` returns liveness and uptime.
//!
//! Built on `hyper` 0.14 with a `service_fn` router; see [`server::start_server`].

pub mod routes;
pub mod server;
pub mod state;

pub use server::{start_server, ServerHandle};
pub use state::AppState;
