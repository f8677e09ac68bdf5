//! End-to-end tests: live server on an ephemeral port, real HTTP client, and a
//! stub numbers provider for the upstream path.

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, StatusCode};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use window_average::config::{FallbackPolicy, ServiceConfig, UpstreamMode};
use window_average::http::{start_server, AppState, ServerHandle};
use window_average::kind::NumberKind;
use window_average::upstream::{HttpNumberSource, NumberSource};

/// Stub provider:
/// - `/primes` → fixed list
/// - `/fibo`   → missing `numbers` field
/// - `/even`   → responds after 2 s (beyond any test timeout)
/// - `/rand`   → 500
async fn stub_provider(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let response = match req.uri().path() {
        "/primes" => Response::new(Body::from(r#"{"numbers":[2,3,5,7,11]}"#)),
        "/fibo" => Response::new(Body::from(r#"{}"#)),
        "/even" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Response::new(Body::from(r#"{"numbers":[2,4]}"#))
        }
        _ => {
            let mut response = Response::new(Body::from("boom"));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    };
    Ok(response)
}

fn start_stub_provider() -> SocketAddr {
    let make_service =
        make_service_fn(|_conn| async { Ok::<_, Infallible>(service_fn(stub_provider)) });
    let server = hyper::Server::bind(&([127, 0, 0, 1], 0).into()).serve(make_service);
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

async fn start_service(config: &ServiceConfig) -> ServerHandle {
    let state = Arc::new(AppState::from_config(config).expect("Failed to build state"));
    start_server(state, ([127, 0, 0, 1], 0).into())
        .await
        .expect("Failed to start server")
}

fn mock_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.upstream.mode = UpstreamMode::Mock;
    config
}

fn http_config(provider: SocketAddr, fallback: FallbackPolicy) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.upstream.mode = UpstreamMode::Http;
    config.upstream.base_url = format!("http://{}", provider);
    config.upstream.timeout_ms = 300;
    config.upstream.fallback = fallback;
    config
}

async fn get(handle: &ServerHandle, path: &str) -> (u16, Value) {
    let url = format!("http://{}{}", handle.local_addr(), path);
    let response = reqwest::get(&url).await.expect("Request failed");
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.expect("Body is not JSON");
    (status, body)
}

#[tokio::test]
async fn test_sequential_requests_slide_the_window() {
    let handle = start_service(&mock_config()).await;

    let (status, first) = get(&handle, "/numbers/e?windowSize=4").await;
    assert_eq!(status, 200);
    assert_eq!(first["windowPrevState"], json!([]));
    assert_eq!(first["windowCurrState"], json!([14, 16, 18, 20]));
    assert_eq!(first["numbers"], json!([2, 4, 6, 8, 10, 12, 14, 16, 18, 20]));
    assert_eq!(first["avg"], json!(17.0));

    // Same series again cycles through the window and lands on the same four values.
    let (_, second) = get(&handle, "/numbers/e?windowSize=4").await;
    assert_eq!(second["windowPrevState"], first["windowCurrState"]);
    assert_eq!(second["windowCurrState"], json!([14, 16, 18, 20]));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_bad_requests() {
    let handle = start_service(&mock_config()).await;

    for path in [
        "/numbers/z",
        "/numbers/p?windowSize=0",
        "/numbers/p?windowSize=abc",
        "/numbers/p?windowSize=",
    ] {
        let (status, body) = get(&handle, path).await;
        assert_eq!(status, 400, "path {}", path);
        assert!(body["error"].is_string());
    }

    let (status, _) = get(&handle, "/unknown").await;
    assert_eq!(status, 404);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_health_endpoint() {
    let handle = start_service(&mock_config()).await;
    let (status, body) = get(&handle, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert!(body["uptimeSecs"].is_u64());
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_upstream_success() {
    let provider = start_stub_provider();
    let handle = start_service(&http_config(provider, FallbackPolicy::Empty)).await;

    let (status, body) = get(&handle, "/numbers/p").await;
    assert_eq!(status, 200);
    assert_eq!(body["numbers"], json!([2, 3, 5, 7, 11]));
    assert_eq!(body["windowCurrState"], json!([2, 3, 5, 7, 11]));
    assert_eq!(body["avg"], json!(5.6));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_upstream_failures_degrade_to_empty() {
    let provider = start_stub_provider();
    let handle = start_service(&http_config(provider, FallbackPolicy::Empty)).await;

    // Timeout, server error and missing field all yield an empty merge.
    for path in ["/numbers/e", "/numbers/r", "/numbers/f"] {
        let (status, body) = get(&handle, path).await;
        assert_eq!(status, 200, "path {}", path);
        assert_eq!(body["numbers"], json!([]));
        assert_eq!(body["windowCurrState"], json!([]));
        assert_eq!(body["avg"], json!(0.0));
    }

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_upstream_failure_with_sample_data() {
    let provider = start_stub_provider();
    let handle = start_service(&http_config(provider, FallbackPolicy::SampleData)).await;

    let (status, body) = get(&handle, "/numbers/r?windowSize=3").await;
    assert_eq!(status, 200);
    assert_eq!(body["numbers"], json!([7, 14, 21, 28, 35]));
    assert_eq!(body["windowCurrState"], json!([21, 28, 35]));
    assert_eq!(body["avg"], json!(28.0));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_http_source_reports_timeout() {
    let provider = start_stub_provider();
    let config = http_config(provider, FallbackPolicy::Empty);
    let source = HttpNumberSource::new(&config.upstream).unwrap();

    let started = std::time::Instant::now();
    let result = source.fetch(NumberKind::Even).await;
    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_same_kind() {
    let handle = start_service(&mock_config()).await;
    let base = format!("http://{}", handle.local_addr());
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..40 {
        let client = client.clone();
        let url = format!("{}/numbers/p?windowSize={}", base, i % 7 + 1);
        tasks.push(tokio::spawn(async move {
            let body: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
            body
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let body = task.await.unwrap();
        let curr: Vec<i64> = serde_json::from_value(body["windowCurrState"].clone()).unwrap();
        assert!(curr.len() <= i % 7 + 1);
        let mut sorted = curr.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), curr.len());
    }

    handle.shutdown().await.unwrap();
}
