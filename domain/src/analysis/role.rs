//! Agent roles

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One specialized analysis perspective, mapped to exactly one model call.
///
/// Ordering follows report order and is used to keep error lists and timing
/// maps deterministic regardless of task completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    RootCause,
    Impact,
    Actions,
    Knowledge,
    Consistency,
}

impl AgentRole {
    /// The three roles compared by the consistency check
    pub const ANALYSIS: [AgentRole; 3] = [AgentRole::RootCause, AgentRole::Impact, AgentRole::Actions];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::RootCause => "root_cause",
            AgentRole::Impact => "impact",
            AgentRole::Actions => "actions",
            AgentRole::Knowledge => "knowledge",
            AgentRole::Consistency => "consistency",
        }
    }

    /// Human-readable name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::RootCause => "Root cause",
            AgentRole::Impact => "Impact",
            AgentRole::Actions => "Actions",
            AgentRole::Knowledge => "Knowledge",
            AgentRole::Consistency => "Consistency",
        }
    }

    /// Whether this role's output takes part in the cross-agent comparison.
    /// Knowledge is reference material only.
    pub fn is_compared(&self) -> bool {
        Self::ANALYSIS.contains(self)
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "root_cause" | "rootcause" => Ok(AgentRole::RootCause),
            "impact" => Ok(AgentRole::Impact),
            "actions" => Ok(AgentRole::Actions),
            "knowledge" => Ok(AgentRole::Knowledge),
            "consistency" => Ok(AgentRole::Consistency),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}
