//! Port for structured analysis logging.
//!
//! Defines the [`AnalysisLogger`] trait for recording analysis events
//! (start, per-role completion, final outcome) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures an audit
//! trail in a machine-readable format (JSONL).

use incident_domain::{AgentRole, ExecutionMode, MultiAgentResult, RoleTiming, Severity};
use serde_json::{Value, json};

/// A structured analysis event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The timestamp is added by the logger.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisEvent {
    /// Event type identifier (e.g., "analysis_started", "role_completed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AnalysisEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn analysis_started(system: &str, severity: &Severity, mode: ExecutionMode) -> Self {
        Self::new(
            "analysis_started",
            json!({
                "system": system,
                "severity": severity.as_str(),
                "mode": mode.as_str(),
            }),
        )
    }

    pub fn role_completed(role: AgentRole, timing: &RoleTiming, error: Option<&str>) -> Self {
        Self::new(
            "role_completed",
            json!({
                "role": role.as_str(),
                "started_at_ms": timing.started_at.as_millis() as u64,
                "elapsed_ms": timing.elapsed.as_millis() as u64,
                "success": error.is_none(),
                "error": error,
            }),
        )
    }

    pub fn analysis_completed(result: &MultiAgentResult) -> Self {
        Self::new(
            "analysis_completed",
            json!({
                "mode": result.mode.as_str(),
                "total_ms": result.total_time.as_millis() as u64,
                "errors": result.error_messages(),
                "factual_conflicts": result.consistency.factual_conflicts.len(),
                "quality": result.consistency.quality.as_str(),
                "requires_manual_review": result.requires_manual_review(),
            }),
        )
    }
}

/// Port for logging analysis events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible; logging failures never
/// disrupt an analysis.
pub trait AnalysisLogger: Send + Sync {
    /// Record an analysis event.
    fn log(&self, event: AnalysisEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoAnalysisLogger;

impl AnalysisLogger for NoAnalysisLogger {
    fn log(&self, _event: AnalysisEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_role_completed_payload() {
        let timing = RoleTiming::new(Duration::from_millis(5), Duration::from_millis(120));
        let event = AnalysisEvent::role_completed(AgentRole::Impact, &timing, Some("Timeout"));
        assert_eq!(event.event_type, "role_completed");
        assert_eq!(event.payload["role"], "impact");
        assert_eq!(event.payload["elapsed_ms"], 120);
        assert_eq!(event.payload["success"], false);
        assert_eq!(event.payload["error"], "Timeout");
    }

    #[test]
    fn test_analysis_started_payload() {
        let event = AnalysisEvent::analysis_started(
            "Server_A",
            &Severity::Critical,
            ExecutionMode::PartialSequential,
        );
        assert_eq!(event.payload["mode"], "partial_sequential");
        assert_eq!(event.payload["severity"], "CRITICAL");
    }
}
