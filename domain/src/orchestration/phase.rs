//! Join-barrier phases

use super::mode::ExecutionMode;
use crate::analysis::role::AgentRole;
use serde::{Deserialize, Serialize};

/// A group of roles dispatched together and joined before the next group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Independent analysis roles
    Analysis,
    /// Actions, informed by the analysis digest (staged plan only)
    Remediation,
    /// Cross-agent consistency check
    Consistency,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Analysis => "analysis",
            Phase::Remediation => "remediation",
            Phase::Consistency => "consistency",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Analysis => "Analysis",
            Phase::Remediation => "Remediation",
            Phase::Consistency => "Consistency Check",
        }
    }

    /// Roles dispatched in this phase under `mode`
    pub fn roles(&self, mode: ExecutionMode) -> &'static [AgentRole] {
        match (self, mode) {
            (Phase::Analysis, ExecutionMode::Parallel) => &[
                AgentRole::RootCause,
                AgentRole::Impact,
                AgentRole::Actions,
                AgentRole::Knowledge,
            ],
            (Phase::Analysis, ExecutionMode::PartialSequential) => &[
                AgentRole::RootCause,
                AgentRole::Impact,
                AgentRole::Knowledge,
            ],
            (Phase::Remediation, ExecutionMode::PartialSequential) => &[AgentRole::Actions],
            (Phase::Remediation, ExecutionMode::Parallel) => &[],
            (Phase::Consistency, _) => &[AgentRole::Consistency],
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_runs_exactly_once() {
        for mode in [ExecutionMode::Parallel, ExecutionMode::PartialSequential] {
            let mut roles: Vec<AgentRole> = mode
                .phases()
                .iter()
                .flat_map(|p| p.roles(mode).iter().copied())
                .collect();
            roles.sort();
            assert_eq!(
                roles,
                vec![
                    AgentRole::RootCause,
                    AgentRole::Impact,
                    AgentRole::Actions,
                    AgentRole::Knowledge,
                    AgentRole::Consistency,
                ]
            );
        }
    }

    #[test]
    fn test_staged_actions_in_second_phase() {
        let mode = ExecutionMode::PartialSequential;
        assert!(!Phase::Analysis.roles(mode).contains(&AgentRole::Actions));
        assert_eq!(Phase::Remediation.roles(mode), &[AgentRole::Actions]);
    }
}
