//! Priority-ordered candidate sweep
//!
//! The deployment topology means the real backend base URL is not known
//! statically: the same logical endpoint may live behind a functions gateway
//! prefix, a direct `/api` prefix, the deployment root, or an alternate
//! functions prefix. The sweep tries each candidate base URL strictly in
//! declared priority order and short-circuits on the first success.
//!
//! Deliberate constraints, kept on purpose:
//! - candidates are tried sequentially, never raced
//! - a failed candidate is never retried within the sweep
//! - nothing is remembered between sweeps (no "last known good" candidate)
//! - exhaustion surfaces a single error naming the logical path; individual
//!   candidate failures are only logged

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use crate::error::{ErrorContext, GatewayError, Result};
use crate::util::{generate_request_id, sanitize_for_logging};

/// Ordered, read-only list of candidate base URLs.
///
/// Order is a priority list; the first candidate that answers successfully
/// wins. The list is fixed for the life of the process and safe to share
/// without synchronization.
#[derive(Debug, Clone)]
pub struct CandidateList {
    bases: Vec<String>,
}

impl CandidateList {
    /// Create a candidate list from absolute base URLs, priority order preserved
    pub fn new(bases: Vec<String>) -> Self {
        Self { bases }
    }

    /// Iterate candidates in priority order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.bases.iter().map(|b| b.as_str())
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// A single failed candidate attempt, recorded for diagnostics
#[derive(Debug, Clone)]
pub struct CandidateFailure {
    /// The candidate base URL that failed
    pub base: String,

    /// The failure reason as reported by the attempt
    pub reason: String,
}

/// Executes the candidate sweep for logical requests
#[derive(Debug, Clone)]
pub struct Sweep {
    candidates: CandidateList,
    attempt_timeout: Option<Duration>,
}

impl Sweep {
    /// Create a sweep over the given candidates
    pub fn new(candidates: CandidateList, attempt_timeout: Option<Duration>) -> Self {
        Self {
            candidates,
            attempt_timeout,
        }
    }

    /// The candidate list this sweep walks
    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// Run one sweep for a logical path.
    ///
    /// `attempt` receives the full URL (candidate base + path) and performs a
    /// single physical request. The first successful attempt's value is
    /// returned immediately; remaining candidates are not tried. If every
    /// candidate fails, the sweep rejects with an exhaustion error that names
    /// the logical path only.
    pub async fn run<T, F, Fut>(&self, path: &str, attempt: F) -> Result<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.candidates.is_empty() {
            return Err(GatewayError::configuration(
                "candidate list is empty; no base URL to try",
            ));
        }

        let request_id = generate_request_id();
        let mut failures: Vec<CandidateFailure> = Vec::with_capacity(self.candidates.len());

        for base in self.candidates.iter() {
            let url = format!("{}{}", base, path);
            debug!("[{}] attempting candidate: {}", request_id, url);

            let outcome = match self.attempt_timeout {
                Some(limit) => match tokio::time::timeout(limit, attempt(url.clone())).await {
                    Ok(result) => result,
                    Err(_) => Err(GatewayError::timeout(format!(
                        "no response from {} within {}ms",
                        url,
                        limit.as_millis()
                    ))),
                },
                None => attempt(url.clone()).await,
            };

            match outcome {
                Ok(value) => {
                    debug!("[{}] candidate succeeded: {}", request_id, url);
                    return Ok(value);
                }
                Err(err) => {
                    warn!(
                        "[{}] request failed for {}: {}",
                        request_id,
                        url,
                        sanitize_for_logging(&err.to_string())
                    );
                    failures.push(CandidateFailure {
                        base: base.to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let context = ErrorContext::new()
            .endpoint(path)
            .request_id(&request_id)
            .with("failed_candidates", failures.len());

        Err(GatewayError::exhausted(path, failures.len()).with_context(context))
    }
}
