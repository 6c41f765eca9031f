//! Execution plan selection.
//!
//! [`ExecutionMode`] decides how many join barriers an analysis uses:
//!
//! - **Parallel** (default): all four roles in a single phase
//! - **PartialSequential**: Actions waits for the other three and receives
//!   their findings as a digest
//!
//! The mode is chosen once per analysis from severity and detection
//! confidence, and never changes mid-run.

use super::phase::Phase;
use crate::core::error::DomainError;
use crate::incident::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Detection confidence at or above which a CRITICAL incident is staged
pub const STAGED_CONFIDENCE_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Root-Cause, Impact, Actions and Knowledge run concurrently
    #[default]
    Parallel,
    /// Root-Cause, Impact and Knowledge first; Actions after their join
    PartialSequential,
}

impl ExecutionMode {
    /// Pick the plan for an incident.
    ///
    /// Only a CRITICAL severity with confidence ≥ 0.75 is staged; every other
    /// combination (including NaN confidence) runs in parallel.
    pub fn select(severity: &Severity, confidence: f64) -> Self {
        if severity.is_critical() && confidence >= STAGED_CONFIDENCE_THRESHOLD {
            ExecutionMode::PartialSequential
        } else {
            ExecutionMode::Parallel
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Parallel => "parallel",
            ExecutionMode::PartialSequential => "partial_sequential",
        }
    }

    /// Join-barrier groups in execution order, consistency included
    pub fn phases(&self) -> &'static [Phase] {
        match self {
            ExecutionMode::Parallel => &[Phase::Analysis, Phase::Consistency],
            ExecutionMode::PartialSequential => {
                &[Phase::Analysis, Phase::Remediation, Phase::Consistency]
            }
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, ExecutionMode::PartialSequential)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "parallel" => Ok(ExecutionMode::Parallel),
            "partial_sequential" | "staged" => Ok(ExecutionMode::PartialSequential),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_critical_high_confidence_is_staged() {
        assert_eq!(
            ExecutionMode::select(&Severity::Critical, 0.90),
            ExecutionMode::PartialSequential
        );
    }

    #[test]
    fn test_select_boundary() {
        assert_eq!(
            ExecutionMode::select(&Severity::Critical, 0.74),
            ExecutionMode::Parallel
        );
        assert_eq!(
            ExecutionMode::select(&Severity::Critical, 0.75),
            ExecutionMode::PartialSequential
        );
    }

    #[test]
    fn test_select_no_other_boundary() {
        for severity in [
            Severity::High,
            Severity::Medium,
            Severity::Low,
            Severity::Unknown,
            Severity::Other("SEV1".into()),
        ] {
            for confidence in [0.0, 0.5, 0.75, 0.99, 1.0] {
                assert_eq!(
                    ExecutionMode::select(&severity, confidence),
                    ExecutionMode::Parallel,
                    "{severity:?} at {confidence}"
                );
            }
        }
        assert_eq!(
            ExecutionMode::select(&Severity::Critical, f64::NAN),
            ExecutionMode::Parallel
        );
    }

    #[test]
    fn test_phases() {
        assert_eq!(ExecutionMode::Parallel.phases().len(), 2);
        assert_eq!(
            ExecutionMode::PartialSequential.phases(),
            &[Phase::Analysis, Phase::Remediation, Phase::Consistency]
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "partial-sequential".parse::<ExecutionMode>().ok(),
            Some(ExecutionMode::PartialSequential)
        );
        assert_eq!(
            "PARALLEL".parse::<ExecutionMode>().ok(),
            Some(ExecutionMode::Parallel)
        );
        assert!("serial".parse::<ExecutionMode>().is_err());
    }
}
