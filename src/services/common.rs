//! Common utilities for service clients
//!
//! Shared HTTP plumbing: client construction, single-attempt request helpers
//! used inside the candidate sweep, and process-wide operability metrics.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{ErrorContext, GatewayError, Result};

/// UserAgent structure for identifying the client to the platform
#[derive(Debug, Clone)]
pub struct UserAgent {
    /// Application name
    pub app_name: String,

    /// Version string
    pub version: String,

    /// Optional extra info
    pub extra: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            app_name: "Capability-Gateway".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extra: None,
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_name, self.version)?;

        if let Some(ref extra) = self.extra {
            write!(f, " ({})", extra)?;
        }

        Ok(())
    }
}

/// Shared operability metrics for all clients in the process
#[derive(Debug, Default)]
struct ClientMetrics {
    /// Total physical requests attempted
    request_count: AtomicU64,

    /// Total successful responses
    success_count: AtomicU64,

    /// Total errors
    error_count: AtomicU64,

    /// Per-endpoint metrics (latency, status counts)
    endpoint_metrics: Mutex<HashMap<String, String>>,
}

impl ClientMetrics {
    fn record(&self, endpoint: &str, start_time: Instant, status: u16, is_success: bool) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if is_success {
            self.success_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }

        let duration = start_time.elapsed();
        let mut metrics = self.endpoint_metrics.lock().unwrap();
        metrics.insert(
            format!("latency_{}", endpoint.replace('/', "_")),
            format!("{:.2}ms", duration.as_secs_f64() * 1000.0),
        );
        metrics.insert(
            format!("last_status_{}", endpoint.replace('/', "_")),
            status.to_string(),
        );
    }

    fn as_map(&self) -> HashMap<String, String> {
        let mut map = self.endpoint_metrics.lock().unwrap().clone();

        map.insert(
            "request_count".to_string(),
            self.request_count.load(Ordering::Relaxed).to_string(),
        );
        map.insert(
            "success_count".to_string(),
            self.success_count.load(Ordering::Relaxed).to_string(),
        );
        map.insert(
            "error_count".to_string(),
            self.error_count.load(Ordering::Relaxed).to_string(),
        );

        map
    }
}

/// Global client metrics for the process
static GLOBAL_METRICS: Lazy<ClientMetrics> = Lazy::new(ClientMetrics::default);

/// Build a standard HTTP client with default settings
pub fn build_http_client(user_agent: Option<UserAgent>, timeout: Option<Duration>) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    let ua = user_agent.unwrap_or_default().to_string();

    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_str(&ua)
            .map_err(|e| GatewayError::configuration(format!("Invalid user agent: {}", e)))?,
    );

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout.unwrap_or_else(|| Duration::from_secs(30)))
        .gzip(true)
        .build()
        .map_err(|e| {
            GatewayError::configuration(format!("Failed to build HTTP client: {}", e))
        })?;

    Ok(client)
}

/// Parse an error response from an HTTP response
pub async fn parse_error_response(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let mut context = ErrorContext::new().status_code(status.as_u16());

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => format!("Failed to read error response: {}", e),
    };

    crate::error::mapping::map_http_error(status, &body, &mut context).with_context(context)
}

/// Perform a single GET attempt for one candidate URL.
///
/// A non-2xx status or a transport failure is a candidate failure; the sweep
/// decides whether another candidate gets a turn.
pub async fn get_json_once<R>(http: &Client, url: &str, endpoint: &str) -> Result<R>
where
    R: DeserializeOwned,
{
    let start_time = Instant::now();

    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| GatewayError::network(format!("Failed to send request: {}", e)))?;

    let status = response.status();

    if status.is_success() {
        GLOBAL_METRICS.record(endpoint, start_time, status.as_u16(), true);
        response
            .json::<R>()
            .await
            .map_err(|e| GatewayError::parsing(format!("Failed to parse response: {}", e)))
    } else {
        GLOBAL_METRICS.record(endpoint, start_time, status.as_u16(), false);
        Err(parse_error_response(response).await)
    }
}

/// Perform a single POST attempt for one candidate URL.
///
/// The JSON content type is applied here; callers that need a different body
/// shape (multipart upload) do not go through this path.
pub async fn post_json_once<T, R>(http: &Client, url: &str, endpoint: &str, body: &T) -> Result<R>
where
    T: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let start_time = Instant::now();

    let response = http
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| GatewayError::network(format!("Failed to send request: {}", e)))?;

    let status = response.status();

    if status.is_success() {
        GLOBAL_METRICS.record(endpoint, start_time, status.as_u16(), true);
        response
            .json::<R>()
            .await
            .map_err(|e| GatewayError::parsing(format!("Failed to parse response: {}", e)))
    } else {
        GLOBAL_METRICS.record(endpoint, start_time, status.as_u16(), false);
        Err(parse_error_response(response).await)
    }
}

/// Get metrics for all clients in the process
pub fn get_global_metrics() -> HashMap<String, String> {
    GLOBAL_METRICS.as_map()
}

/// Reset all global metrics
pub fn reset_global_metrics() {
    GLOBAL_METRICS.request_count.store(0, Ordering::Relaxed);
    GLOBAL_METRICS.success_count.store(0, Ordering::Relaxed);
    GLOBAL_METRICS.error_count.store(0, Ordering::Relaxed);
    GLOBAL_METRICS.endpoint_metrics.lock().unwrap().clear();
}
