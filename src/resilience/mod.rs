//! Resilience for the gateway: the candidate sweep
//!
//! The gateway's resilience strategy is endpoint fallback rather than
//! retry-with-backoff: every logical request walks an ordered list of
//! candidate base URLs and takes the first success. There is no retry of a
//! single candidate and no circuit breaking across calls; each call restarts
//! the full sweep.

mod sweep;

pub use sweep::{CandidateFailure, CandidateList, Sweep};

use std::time::Duration;

use crate::config::GatewayConfig;

/// Sweep construction parameters
#[derive(Debug, Clone, Default)]
pub struct SweepConfig {
    /// Per-candidate attempt deadline; None blocks on the HTTP client timeout
    pub attempt_timeout: Option<Duration>,
}

impl SweepConfig {
    /// Derive sweep parameters from the gateway configuration
    pub fn from_gateway(config: &GatewayConfig) -> Self {
        Self {
            attempt_timeout: config.attempt_timeout(),
        }
    }

    /// Build a sweep over the configured candidate bases
    pub fn build(self, bases: Vec<String>) -> Sweep {
        Sweep::new(CandidateList::new(bases), self.attempt_timeout)
    }
}
