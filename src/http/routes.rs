//! Request routing and handlers.

use super::state::AppState;
use crate::error::{AppResult, AverageError};
use crate::kind::NumberKind;
use crate::validation::parse_window_size;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use std::borrow::Cow;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use url::form_urlencoded;

/// JSON body for every non-2xx response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// `/health` response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthBody<'a> {
    status: &'static str,
    service: &'a str,
    uptime_secs: u64,
}

/// Entry point for every request; never fails at the hyper level.
pub async fn handle(
    state: Arc<AppState>,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let response = match route(&state, &method, &path, query.as_deref()).await {
        Ok(response) => response,
        Err(e) => error_response(&e),
    };

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Handled request"
    );
    Ok(response)
}

async fn route(
    state: &AppState,
    method: &Method,
    path: &str,
    query: Option<&str>,
) -> AppResult<Response<Body>> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        (&Method::GET, ["health"]) => health(state),
        (&Method::GET, ["numbers", code]) => numbers(state, code, query).await,
        (_, ["health"]) | (_, ["numbers", _]) => Ok(json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
        )),
        _ => Ok(json_error(StatusCode::NOT_FOUND, "Not found")),
    }
}

async fn numbers(state: &AppState, code: &str, query: Option<&str>) -> AppResult<Response<Body>> {
    let kind: NumberKind = code.parse()?;
    let window_size = parse_window_size(
        query_param(query, "windowSize").as_deref(),
        state.default_window_size,
        state.max_window_size,
    )?;
    state.limiter.try_acquire().await?;

    // Fetch before touching the store; the window lock is never held across I/O.
    let fetched = state.source.fetch_or_degrade(kind).await;
    let snapshot = state.store.merge(kind, window_size, fetched).await?;

    json_response(StatusCode::OK, &snapshot)
}

fn health(state: &AppState) -> AppResult<Response<Body>> {
    json_response(
        StatusCode::OK,
        &HealthBody {
            status: "ok",
            service: &state.service_name,
            uptime_secs: state.uptime().as_secs(),
        },
    )
}

/// First percent-decoded value of `name` in a raw query string. A bare key yields `Some("")`.
fn query_param<'a>(query: Option<&'a str>, name: &str) -> Option<Cow<'a, str>> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> AppResult<Response<Body>> {
    let bytes = serde_json::to_vec(body)
        .map_err(|e| AverageError::Internal(format!("Failed to encode response: {}", e)))?;
    Ok(with_json_body(status, bytes))
}

fn json_error(status: StatusCode, message: &str) -> Response<Body> {
    let bytes = serde_json::to_vec(&ErrorBody { error: message })
        .unwrap_or_else(|_| br#"{"error":"Internal server error"}"#.to_vec());
    with_json_body(status, bytes)
}

fn with_json_body(status: StatusCode, bytes: Vec<u8>) -> Response<Body> {
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn error_response(err: &AverageError) -> Response<Body> {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if err.is_client_error() {
        tracing::debug!(error = %err, "Rejected request");
        json_error(status, &err.to_string())
    } else {
        tracing::error!(error = %err, "Request failed");
        json_error(status, "Internal server error")
    }
}
