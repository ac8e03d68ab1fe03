//! Capability platform client
//!
//! A typed facade over the platform's serverless API: one method per
//! capability plus the system/analytics surface. Every method issues exactly
//! one logical request; the request is satisfied by a candidate sweep over
//! the possible base URLs, except file upload/download which target a fixed,
//! non-falling-back base.

mod diagnostics;
mod models;

pub use diagnostics::{DiagnosticsReport, PartialDiagnostics};
pub use models::*;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use log::{error, warn};
use reqwest::multipart;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::config::{GatewayConfig, DEFAULT_PROVIDER};
use crate::core::{RequestExecutor, ServiceClient};
use crate::error::{GatewayError, Result};
use crate::resilience::{Sweep, SweepConfig};
use crate::services::common::{build_http_client, get_json_once, post_json_once, UserAgent};

/// Client for the AI capability platform
///
/// Holds no per-request state; a single instance can be shared across tasks
/// behind an `Arc`.
#[derive(Debug)]
pub struct CapabilityClient {
    /// HTTP client
    http: Client,

    /// Gateway configuration
    config: GatewayConfig,

    /// Candidate sweep for logical requests
    sweep: Sweep,

    /// Per-client operability metrics
    metrics: Mutex<HashMap<String, String>>,
}

impl Default for CapabilityClient {
    fn default() -> Self {
        let config = GatewayConfig::from_provider(&**DEFAULT_PROVIDER).unwrap_or_else(|_| {
            warn!("Failed to load gateway config from environment, using defaults");
            GatewayConfig::default()
        });

        Self::new_with_config(config)
    }
}

impl CapabilityClient {
    /// Create a new client with environment-backed configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new client with explicit configuration.
    ///
    /// Infallible because the default user agent is always a valid header;
    /// use the builder to override the user agent fallibly.
    pub fn new_with_config(config: GatewayConfig) -> Self {
        match Self::with_parts(config, UserAgent::default()) {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to build capability HTTP client: {}", e);
                unreachable!("default user agent is a valid header: {}", e)
            }
        }
    }

    fn with_parts(config: GatewayConfig, user_agent: UserAgent) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let http = build_http_client(Some(user_agent), Some(timeout))?;
        let sweep = SweepConfig::from_gateway(&config).build(config.candidates());

        Ok(Self {
            http,
            config,
            sweep,
            metrics: Mutex::new(HashMap::new()),
        })
    }

    /// Create a new builder for the client
    pub fn builder() -> CapabilityClientBuilder {
        CapabilityClientBuilder::default()
    }

    /// The gateway configuration this client runs with
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // System surface
    // -----------------------------------------------------------------------

    /// Root status composite
    pub async fn system_status(&self) -> Result<SystemStatus> {
        self.get_json("/api").await
    }

    /// Basic health check
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get_json("/health").await
    }

    /// Capability metadata.
    ///
    /// The platform serves the metadata projection from the same `/health`
    /// endpoint as the health check; servers answer both projections in one
    /// body.
    pub async fn capabilities(&self) -> Result<CapabilityInfo> {
        self.get_json("/health").await
    }

    /// API surface overview
    pub async fn api_status(&self) -> Result<ApiStatus> {
        self.get_json("/status").await
    }

    /// Monitoring counters
    pub async fn metrics_snapshot(&self) -> Result<MetricsSnapshot> {
        self.get_json("/metrics").await
    }

    // -----------------------------------------------------------------------
    // Analytics surface
    // -----------------------------------------------------------------------

    /// Full analytics snapshot
    pub async fn analytics(&self) -> Result<SystemAnalytics> {
        self.get_json("/analytics").await
    }

    /// Usage counters per capability
    pub async fn capability_usage(&self) -> Result<CapabilityUsage> {
        self.get_json("/analytics/capabilities-usage").await
    }

    /// Performance snapshot
    pub async fn performance_metrics(&self) -> Result<PerformanceMetrics> {
        self.get_json("/analytics/performance").await
    }

    /// Model availability
    pub async fn models_status(&self) -> Result<ModelsStatus> {
        self.get_json("/analytics/models-status").await
    }

    // -----------------------------------------------------------------------
    // Capability surface
    // -----------------------------------------------------------------------

    /// Image generation
    pub async fn generate_image(&self, config: &ImageGenerationConfig) -> Result<ApiResponse> {
        self.post_json("/generate-image", config).await
    }

    /// Web research
    pub async fn research_web(&self, config: &WebResearchConfig) -> Result<ApiResponse> {
        self.post_json("/research-web", config).await
    }

    /// Sandboxed code execution
    pub async fn execute_code(&self, config: &CodeExecutionConfig) -> Result<ApiResponse> {
        self.post_json("/execute-code", config).await
    }

    /// Browser automation
    pub async fn control_browser(&self, config: &BrowserControlConfig) -> Result<ApiResponse> {
        self.post_json("/control-browser", config).await
    }

    /// File creation; the platform answers with a downloadable artifact
    pub async fn create_file(&self, config: &FileCreationConfig) -> Result<FileArtifact> {
        self.post_json("/create-file", config).await
    }

    /// Real-time voice/video/text interaction
    pub async fn live_interaction(&self, config: &LiveInteractionConfig) -> Result<ApiResponse> {
        self.post_json("/live-interaction", config).await
    }

    /// Multi-task workflow execution
    pub async fn execute_workflow(&self, config: &WorkflowConfig) -> Result<ApiResponse> {
        self.post_json("/execute-workflow", config).await
    }

    /// Dispatch a typed capability request to its endpoint, returning the raw
    /// payload the platform answered with
    pub async fn dispatch(&self, request: CapabilityRequest) -> Result<Value> {
        let endpoint = request.endpoint();
        match request {
            CapabilityRequest::Analytics => self.get_json(endpoint).await,
            CapabilityRequest::ImageGeneration(config) => self.post_json(endpoint, &config).await,
            CapabilityRequest::WebResearch(config) => self.post_json(endpoint, &config).await,
            CapabilityRequest::CodeExecution(config) => self.post_json(endpoint, &config).await,
            CapabilityRequest::BrowserControl(config) => self.post_json(endpoint, &config).await,
            CapabilityRequest::FileCreation(config) => self.post_json(endpoint, &config).await,
            CapabilityRequest::LiveInteraction(config) => self.post_json(endpoint, &config).await,
            CapabilityRequest::Workflow(config) => self.post_json(endpoint, &config).await,
        }
    }

    /// Bulk workflow execution helper.
    ///
    /// Assigns `priority = position` to any task lacking an explicit priority
    /// (an explicit 0 is kept), preserves input order, and wraps the tasks
    /// into a single workflow request.
    pub async fn execute_bulk_workflow(&self, tasks: Vec<BulkTask>) -> Result<ApiResponse> {
        let tasks = tasks
            .into_iter()
            .enumerate()
            .map(|(index, task)| {
                let mut config = match task.config {
                    Value::Object(map) => map,
                    Value::Null => serde_json::Map::new(),
                    other => {
                        let mut map = serde_json::Map::new();
                        map.insert("value".to_string(), other);
                        map
                    }
                };
                config.insert(
                    "priority".to_string(),
                    Value::from(task.priority.unwrap_or(index as u64)),
                );

                WorkflowTask {
                    task_type: task.task_type,
                    config: Value::Object(config),
                }
            })
            .collect();

        let workflow = WorkflowConfig {
            workflow_description: "Bulk workflow execution".to_string(),
            tasks,
        };

        self.execute_workflow(&workflow).await
    }

    // -----------------------------------------------------------------------
    // File transfer (fixed base, no candidate sweep)
    // -----------------------------------------------------------------------

    /// Upload a file as multipart form data.
    ///
    /// Targets the fixed file base directly; the JSON defaults and the
    /// candidate sweep do not apply here.
    pub async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadReceipt> {
        let url = format!("{}/upload-file", self.config.file_base_url());

        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayError::transfer(format!("Upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            self.record_call("/upload-file", false);
            return Err(GatewayError::transfer(format!("Upload failed: {}", status)));
        }

        self.record_call("/upload-file", true);
        response
            .json::<UploadReceipt>()
            .await
            .map_err(|e| GatewayError::parsing(format!("Failed to parse upload receipt: {}", e)))
    }

    /// Download a file as raw bytes from the fixed file base
    pub async fn download_file(&self, filename: &str) -> Result<Vec<u8>> {
        let url = format!("{}/download/{}", self.config.file_base_url(), filename);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::transfer(format!("Download failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            self.record_call("/download", false);
            return Err(GatewayError::transfer(format!("Download failed: {}", status)));
        }

        self.record_call("/download", true);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::transfer(format!("Download failed: {}", e)))?;

        Ok(bytes.to_vec())
    }

    // -----------------------------------------------------------------------
    // Sweep-backed plumbing
    // -----------------------------------------------------------------------

    async fn get_json<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let http = self.http.clone();
        let endpoint = path.to_string();

        let result = self
            .sweep
            .run(path, move |url| {
                let http = http.clone();
                let endpoint = endpoint.clone();
                async move { get_json_once(&http, &url, &endpoint).await }
            })
            .await;

        self.record_call(path, result.is_ok());
        result
    }

    async fn post_json<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        // Serialize once; each candidate attempt reuses the same payload.
        let payload = serde_json::to_value(body)
            .map_err(|e| GatewayError::validation(format!("Failed to serialize request: {}", e)))?;

        let http = self.http.clone();
        let endpoint = path.to_string();

        let result = self
            .sweep
            .run(path, move |url| {
                let http = http.clone();
                let endpoint = endpoint.clone();
                let payload = payload.clone();
                async move { post_json_once(&http, &url, &endpoint, &payload).await }
            })
            .await;

        self.record_call(path, result.is_ok());
        result
    }

    fn record_call(&self, endpoint: &str, is_success: bool) {
        let mut metrics = self.metrics.lock().unwrap();

        let key = if is_success {
            format!("{}_ok", endpoint.replace('/', "_"))
        } else {
            format!("{}_err", endpoint.replace('/', "_"))
        };

        let count = metrics
            .get(&key)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        metrics.insert(key, count.to_string());
    }
}

#[async_trait]
impl ServiceClient for CapabilityClient {
    fn name(&self) -> &str {
        "capability-platform"
    }

    fn origin(&self) -> &str {
        &self.config.origin
    }

    fn version(&self) -> &str {
        "v2"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.health().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!("Capability platform health check failed: {}", e);
                Ok(false)
            }
        }
    }

    fn metrics(&self) -> Option<HashMap<String, String>> {
        Some(self.metrics.lock().unwrap().clone())
    }
}

#[async_trait]
impl RequestExecutor for CapabilityClient {
    async fn execute<T, R>(&self, endpoint: &str, request: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        self.post_json(endpoint, request).await
    }

    async fn get<R>(&self, endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        self.get_json(endpoint).await
    }

    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        self.post_json(endpoint, body).await
    }
}

/// Builder for the capability client
#[derive(Default)]
pub struct CapabilityClientBuilder {
    /// Deployment origin
    origin: Option<String>,

    /// Candidate route prefixes in priority order
    route_prefixes: Option<Vec<String>>,

    /// Fixed file transfer prefix
    file_base: Option<String>,

    /// Overall HTTP timeout in seconds
    timeout_seconds: Option<u64>,

    /// Per-candidate attempt deadline
    attempt_timeout: Option<Duration>,

    /// Disable the per-candidate deadline entirely
    no_attempt_timeout: bool,

    /// User agent override
    user_agent: Option<UserAgent>,
}

impl CapabilityClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deployment origin
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Set the candidate route prefixes, priority order preserved
    pub fn route_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the fixed file transfer prefix
    pub fn file_base(mut self, prefix: impl Into<String>) -> Self {
        self.file_base = Some(prefix.into());
        self
    }

    /// Set the overall HTTP timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Set the per-candidate attempt deadline
    pub fn attempt_timeout(mut self, deadline: Duration) -> Self {
        self.attempt_timeout = Some(deadline);
        self.no_attempt_timeout = false;
        self
    }

    /// Disable the per-candidate attempt deadline
    pub fn no_attempt_timeout(mut self) -> Self {
        self.attempt_timeout = None;
        self.no_attempt_timeout = true;
        self
    }

    /// Override the user agent sent with every request
    pub fn user_agent(mut self, user_agent: UserAgent) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Build the capability client
    pub fn build(self) -> Result<CapabilityClient> {
        // Environment configuration first, explicit overrides on top
        let mut config = GatewayConfig::from_provider(&**DEFAULT_PROVIDER).unwrap_or_default();

        if let Some(origin) = self.origin {
            config.origin = origin;
        }

        if let Some(route_prefixes) = self.route_prefixes {
            config.route_prefixes = route_prefixes;
        }

        if let Some(file_base) = self.file_base {
            config.file_base = file_base;
        }

        if let Some(timeout_seconds) = self.timeout_seconds {
            config.timeout_seconds = timeout_seconds;
        }

        if let Some(deadline) = self.attempt_timeout {
            config.attempt_timeout_ms = deadline.as_millis() as u64;
        } else if self.no_attempt_timeout {
            config.attempt_timeout_ms = 0;
        }

        config.validate()?;

        CapabilityClient::with_parts(config, self.user_agent.unwrap_or_default())
    }
}
