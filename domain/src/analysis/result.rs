//! The aggregated multi-agent result.
//!
//! [`MultiAgentResult`] is the only externally visible artifact of an
//! analysis. It is assembled once, after every phase has joined.

use super::outputs::{
    ActionsOutput, ConsistencyOutput, ImpactOutput, KnowledgeOutput, RootCauseOutput,
};
use super::role::AgentRole;
use crate::orchestration::mode::ExecutionMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Text returned by [`MultiAgentResult::summary`] when no role produced anything
pub const NO_OUTPUT_SUMMARY: &str = "Multi-agent analysis produced no output.";

/// When a role ran, relative to the start of the analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTiming {
    /// Offset from analysis start at which the role was dispatched
    pub started_at: Duration,
    pub elapsed: Duration,
}

impl RoleTiming {
    pub fn new(started_at: Duration, elapsed: Duration) -> Self {
        Self {
            started_at,
            elapsed,
        }
    }

    pub fn finished_at(&self) -> Duration {
        self.started_at + self.elapsed
    }
}

/// A role that failed to produce model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleError {
    pub role: AgentRole,
    pub message: String,
}

impl RoleError {
    pub fn new(role: AgentRole, message: impl Into<String>) -> Self {
        Self {
            role,
            message: message.into(),
        }
    }
}

impl fmt::Display for RoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.message)
    }
}

/// Complete result of one multi-agent analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiAgentResult {
    pub root_cause: RootCauseOutput,
    pub impact: ImpactOutput,
    pub actions: ActionsOutput,
    pub knowledge: KnowledgeOutput,
    pub consistency: ConsistencyOutput,
    pub mode: ExecutionMode,
    pub total_time: Duration,
    pub agent_times: BTreeMap<AgentRole, RoleTiming>,
    pub errors: Vec<RoleError>,
}

impl MultiAgentResult {
    /// Error recorded for `role`, if any
    pub fn role_error(&self, role: AgentRole) -> Option<&RoleError> {
        self.errors.iter().find(|e| e.role == role)
    }

    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Factual conflicts among the analysis roles need operator review
    pub fn requires_manual_review(&self) -> bool {
        self.consistency.requires_manual_review()
    }

    /// Error list rendered as `"<role>: <message>"` lines
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    /// Whether the role returned any usable data
    pub fn has_output(&self, role: AgentRole) -> bool {
        match role {
            AgentRole::RootCause => !self.root_cause.is_empty(),
            AgentRole::Impact => !self.impact.is_empty(),
            AgentRole::Actions => !self.actions.is_empty(),
            AgentRole::Knowledge => !self.knowledge.is_empty(),
            AgentRole::Consistency => !self.consistency.is_empty(),
        }
    }

    /// Condensed single-block analysis (root cause, chain, impact, first action)
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if !self.root_cause.trigger.is_empty() {
            parts.push(format!("**Root Cause**: {}", self.root_cause.trigger));
        }
        if !self.root_cause.causal_chain.is_empty() {
            parts.push(format!(
                "**Chain**: {}",
                self.root_cause.causal_chain.join(" → ")
            ));
        }
        if !self.impact.user_impact.is_empty() {
            parts.push(format!("**Impact**: {}", self.impact.user_impact));
        }
        if let Some(first) = self.actions.immediate.first() {
            parts.push(format!("**Immediate Action**: {}", first));
        }

        if parts.is_empty() {
            NO_OUTPUT_SUMMARY.to_string()
        } else {
            parts.join("\n")
        }
    }
}
