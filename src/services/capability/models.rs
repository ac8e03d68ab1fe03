//! Capability platform data models
//!
//! Type definitions for the platform's request and response schemas. Every
//! response the platform sends carries an ISO-8601 `timestamp` field; the
//! snapshot types below are plain values, produced fresh on every fetch and
//! never mutated in place.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{GatewayError, Result};

// ---------------------------------------------------------------------------
// Capability request configs
// ---------------------------------------------------------------------------

/// Image generation request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageGenerationConfig {
    /// Generation prompt
    pub prompt: String,

    /// Additional model configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

/// Web research request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebResearchConfig {
    /// Research query
    pub query: String,

    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Code execution request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CodeExecutionConfig {
    /// Code to execute
    pub code: String,

    /// Programming language
    pub language: String,

    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Browser automation request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BrowserControlConfig {
    /// Automation task description
    pub task_description: String,

    /// Target URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// File creation request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileCreationConfig {
    /// File content
    pub content: String,

    /// File name
    pub filename: String,

    /// File format (txt, json, csv, ...)
    pub format: String,
}

/// Live interaction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveInteractionConfig {
    /// Interaction type: audio, video, text
    pub interaction_type: String,

    /// Interaction payload
    pub data: Value,
}

/// One task inside a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowTask {
    /// Task type (a capability name)
    #[serde(rename = "type")]
    pub task_type: String,

    /// Task configuration
    pub config: Value,
}

/// Multi-task workflow request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Workflow description
    pub workflow_description: String,

    /// Tasks in execution order
    pub tasks: Vec<WorkflowTask>,
}

/// Input to the bulk workflow helper; `priority` defaults to the entry's
/// position when omitted (an explicit 0 is preserved)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkTask {
    /// Task type (a capability name)
    #[serde(rename = "type")]
    pub task_type: String,

    /// Task configuration
    #[serde(default)]
    pub config: Value,

    /// Explicit priority; position index when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u64>,
}

/// A typed request for one of the eight platform capabilities
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "capability", content = "config", rename_all = "snake_case")]
pub enum CapabilityRequest {
    ImageGeneration(ImageGenerationConfig),
    WebResearch(WebResearchConfig),
    CodeExecution(CodeExecutionConfig),
    BrowserControl(BrowserControlConfig),
    FileCreation(FileCreationConfig),
    LiveInteraction(LiveInteractionConfig),
    Analytics,
    Workflow(WorkflowConfig),
}

impl CapabilityRequest {
    /// The logical endpoint that serves this capability
    pub fn endpoint(&self) -> &'static str {
        match self {
            CapabilityRequest::ImageGeneration(_) => "/generate-image",
            CapabilityRequest::WebResearch(_) => "/research-web",
            CapabilityRequest::CodeExecution(_) => "/execute-code",
            CapabilityRequest::BrowserControl(_) => "/control-browser",
            CapabilityRequest::FileCreation(_) => "/create-file",
            CapabilityRequest::LiveInteraction(_) => "/live-interaction",
            CapabilityRequest::Analytics => "/analytics",
            CapabilityRequest::Workflow(_) => "/execute-workflow",
        }
    }

    /// The capability name as the platform reports it in usage maps
    pub fn capability_name(&self) -> &'static str {
        match self {
            CapabilityRequest::ImageGeneration(_) => "image_generation",
            CapabilityRequest::WebResearch(_) => "web_research",
            CapabilityRequest::CodeExecution(_) => "code_execution",
            CapabilityRequest::BrowserControl(_) => "browser_control",
            CapabilityRequest::FileCreation(_) => "file_creation",
            CapabilityRequest::LiveInteraction(_) => "live_interaction",
            CapabilityRequest::Analytics => "analytics_monitoring",
            CapabilityRequest::Workflow(_) => "workflow_automation",
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Generic platform response envelope, discriminated by `success`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    /// Whether the call succeeded
    pub success: bool,

    /// Payload; absent when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable cause; populated when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// ISO-8601 response timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Enforce the envelope's discrimination: payload on success, typed
    /// error otherwise
    pub fn into_result(self) -> Result<T> {
        if self.success {
            self.data.ok_or_else(|| {
                GatewayError::parsing("successful response carried no data field")
            })
        } else {
            Err(GatewayError::service(
                self.error
                    .unwrap_or_else(|| "platform reported failure without a cause".to_string()),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// System snapshots
// ---------------------------------------------------------------------------

/// Performance counters shared by several snapshots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceStats {
    /// Average response time in milliseconds
    pub average_response_time: f64,

    /// Total processing time in milliseconds
    pub total_processing_time: f64,

    /// Request throughput
    pub requests_per_minute: f64,
}

/// Full analytics snapshot from `/analytics`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemAnalytics {
    /// Overall system status
    pub system_status: String,

    /// Total requests served
    pub total_requests: u64,

    /// Total errors recorded
    pub error_count: u64,

    /// Derived error rate
    pub error_rate: f64,

    /// Uptime in seconds
    pub uptime_seconds: f64,

    /// Usage count per capability name
    pub capability_usage: HashMap<String, u64>,

    /// Performance counters
    pub performance_metrics: PerformanceStats,

    /// Status string per model name
    pub models_status: HashMap<String, String>,

    /// Availability per capability name
    pub capabilities_status: HashMap<String, bool>,

    /// ISO-8601 snapshot timestamp
    pub timestamp: String,
}

/// Performance snapshot from `/analytics/performance`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Performance counters
    pub performance_metrics: PerformanceStats,

    /// Derived error rate
    pub error_rate: f64,

    /// Uptime in seconds
    pub uptime_seconds: f64,

    /// ISO-8601 snapshot timestamp
    pub timestamp: String,
}

/// Engine identity inside `CapabilityInfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineInfo {
    /// Engine name
    pub name: String,

    /// Engine version
    pub version: String,

    /// Number of backing models
    pub model_count: u32,

    /// Number of exposed capabilities
    pub capability_count: u32,
}

/// Descriptive metadata for one capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDetail {
    /// What the capability does
    pub description: String,

    /// Backing model name
    pub model: String,

    /// Feature list
    pub features: Vec<String>,
}

/// Capability metadata snapshot; cached only by the caller between refreshes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityInfo {
    /// Engine identity and counts
    pub engine_info: EngineInfo,

    /// Model name to model id
    pub models: HashMap<String, String>,

    /// Capability id to descriptive metadata
    pub capabilities: HashMap<String, CapabilityDetail>,

    /// ISO-8601 snapshot timestamp
    pub timestamp: String,
}

/// Basic health check result from `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Health status string
    pub status: String,

    /// ISO-8601 response timestamp
    pub timestamp: String,

    /// Platform version
    pub version: String,
}

/// Root status composite from `/api`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    /// System identifier
    pub system: String,

    /// ISO-8601 response timestamp
    pub timestamp: String,

    /// Analytics snapshot taken with this status
    pub analytics: SystemAnalytics,

    /// Capability metadata taken with this status
    pub capabilities: CapabilityInfo,

    /// Human-readable uptime
    pub uptime: String,
}

/// API surface overview from `/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    /// API status string
    pub api_status: String,

    /// Endpoint inventory, shape left open by the platform
    pub endpoints: Value,

    /// Capability name to backing-model summary
    pub capabilities: HashMap<String, String>,

    /// ISO-8601 response timestamp
    pub timestamp: String,
}

/// Usage counters from `/analytics/capabilities-usage`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityUsage {
    /// Usage count per capability name
    pub capability_usage: HashMap<String, u64>,

    /// Total requests served
    pub total_requests: u64,

    /// ISO-8601 response timestamp
    pub timestamp: String,
}

/// Model availability from `/analytics/models-status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsStatus {
    /// Status string per model name
    pub models_status: HashMap<String, String>,

    /// Availability map, shape left open by the platform
    pub capabilities_status: Value,

    /// ISO-8601 response timestamp
    pub timestamp: String,
}

/// Monitoring counters from `/metrics`; an open numeric map
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsSnapshot(pub HashMap<String, Value>);

// ---------------------------------------------------------------------------
// File transfer
// ---------------------------------------------------------------------------

/// Upload receipt from `POST {file_base}/upload-file`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Whether the upload succeeded
    pub success: bool,

    /// Stored (unique) filename
    pub filename: String,

    /// Filename as submitted
    pub original_filename: String,

    /// Stored size in bytes
    pub size: u64,

    /// Server-side path
    pub path: String,

    /// ISO-8601 response timestamp
    pub timestamp: String,
}

/// Result of `/create-file`: a downloadable artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileArtifact {
    /// Whether creation succeeded
    pub success: bool,

    /// Server-side path
    pub file_path: String,

    /// URL the artifact can be fetched from
    pub download_url: String,

    /// Artifact size in bytes
    pub size_bytes: u64,

    /// ISO-8601 response timestamp
    pub timestamp: String,
}
