//! HTTP server lifecycle.
//!
//! # Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use window_average::config::ServiceConfig;
//! use window_average::http::{start_server, AppState};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::default();
//! let state = Arc::new(AppState::from_config(&config)?);
//! let handle = start_server(state, ([127, 0, 0, 1], 9876).into()).await?;
//! println!("Serving on {}", handle.local_addr());
//! // Dropping the handle stops the server
//! handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use super::routes;
use super::state::AppState;
use crate::error::{AppResult, AverageError};
use hyper::service::{make_service_fn, service_fn};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Handle returned by [`start_server`]; the server stops when it is dropped.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) -> AppResult<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        (&mut self.task)
            .await
            .map_err(|e| AverageError::Internal(format!("Server task failed: {}", e)))
    }
}

/// Bind `addr` and serve requests in a background task.
pub async fn start_server(state: Arc<AppState>, addr: SocketAddr) -> AppResult<ServerHandle> {
    let listener = std::net::TcpListener::bind(addr)?;
    listener.set_nonblocking(true)?;

    let make_service = make_service_fn(move |_conn| {
        let state = state.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| routes::handle(state.clone(), req)))
        }
    });

    let server = hyper::Server::from_tcp(listener)
        .map_err(|e| AverageError::Internal(format!("Failed to start HTTP server: {}", e)))?
        .serve(make_service);
    let local_addr = server.local_addr();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = server.with_graceful_shutdown(async {
        let _ = shutdown_rx.await;
    });

    tracing::info!(addr = %local_addr, "Starting HTTP server");

    let task = tokio::spawn(async move {
        if let Err(e) = server.await {
            tracing::error!("HTTP server error: {}", e);
        }
        tracing::info!("HTTP server stopped");
    });

    Ok(ServerHandle {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
