//! Diagnostics aggregation
//!
//! One call that fans out to the four read-only status endpoints
//! concurrently and combines their answers into a single report. Each leg is
//! an independent logical request with its own candidate sweep; the legs
//! never share sweep state.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

use super::models::{CapabilityInfo, HealthStatus, PerformanceMetrics, SystemAnalytics};
use super::CapabilityClient;

/// Combined platform diagnostics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    /// Basic health check
    pub health: HealthStatus,

    /// Full analytics snapshot
    pub analytics: SystemAnalytics,

    /// Capability metadata
    pub capabilities: CapabilityInfo,

    /// Performance snapshot
    pub performance: PerformanceMetrics,
}

/// Diagnostics snapshot where individual sections may be missing.
///
/// Produced by the best-effort aggregation mode; each failed section is
/// reported in `errors` with its name and cause.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialDiagnostics {
    /// Basic health check, if it answered
    pub health: Option<HealthStatus>,

    /// Full analytics snapshot, if it answered
    pub analytics: Option<SystemAnalytics>,

    /// Capability metadata, if it answered
    pub capabilities: Option<CapabilityInfo>,

    /// Performance snapshot, if it answered
    pub performance: Option<PerformanceMetrics>,

    /// One entry per failed section
    pub errors: Vec<String>,
}

impl PartialDiagnostics {
    /// Whether every section answered
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

impl CapabilityClient {
    /// Run the full diagnostics pass.
    ///
    /// All four legs run concurrently; if any leg fails the whole pass fails
    /// with an aggregation error naming the leg that broke it. Use
    /// [`run_diagnostics_best_effort`](Self::run_diagnostics_best_effort)
    /// when partial answers are acceptable.
    pub async fn run_diagnostics(&self) -> Result<DiagnosticsReport> {
        let (health, analytics, capabilities, performance) = tokio::try_join!(
            label(self.health(), "health"),
            label(self.analytics(), "analytics"),
            label(self.capabilities(), "capabilities"),
            label(self.performance_metrics(), "performance"),
        )?;

        Ok(DiagnosticsReport {
            health,
            analytics,
            capabilities,
            performance,
        })
    }

    /// Run the diagnostics pass, keeping whatever answered.
    ///
    /// Never fails as a whole: each failed section leaves its field empty and
    /// adds an entry to `errors`.
    pub async fn run_diagnostics_best_effort(&self) -> PartialDiagnostics {
        let (health, analytics, capabilities, performance) = tokio::join!(
            self.health(),
            self.analytics(),
            self.capabilities(),
            self.performance_metrics(),
        );

        let mut report = PartialDiagnostics::default();

        match health {
            Ok(value) => report.health = Some(value),
            Err(e) => report.errors.push(format!("health: {}", e)),
        }
        match analytics {
            Ok(value) => report.analytics = Some(value),
            Err(e) => report.errors.push(format!("analytics: {}", e)),
        }
        match capabilities {
            Ok(value) => report.capabilities = Some(value),
            Err(e) => report.errors.push(format!("capabilities: {}", e)),
        }
        match performance {
            Ok(value) => report.performance = Some(value),
            Err(e) => report.errors.push(format!("performance: {}", e)),
        }

        report
    }
}

/// Wrap a diagnostics leg so its failure names the section that broke the pass
async fn label<T>(
    leg: impl std::future::Future<Output = Result<T>>,
    section: &str,
) -> Result<T> {
    leg.await
        .map_err(|e| GatewayError::aggregation(format!("diagnostics section {} failed: {}", section, e)))
}
