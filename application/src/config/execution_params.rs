//! Analysis parameters for use case call control.
//!
//! [`AnalysisParams`] groups the static parameters that control how
//! [`RunAnalysisUseCase`](crate::use_cases::run_analysis::RunAnalysisUseCase)
//! issues completion calls. These are application-layer concerns, not domain
//! policy.

use incident_domain::AgentRole;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Completion-call control parameters.
///
/// | Role | Token budget |
/// |------|--------------|
/// | Root-Cause / Impact / Actions | `max_tokens` (450) |
/// | Knowledge | `knowledge_max_tokens` (600) |
/// | Consistency | `consistency_max_tokens` (400) |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Token budget for the three analysis roles.
    pub max_tokens: u32,
    pub knowledge_max_tokens: u32,
    pub consistency_max_tokens: u32,
    /// Sampling temperature for every role.
    pub temperature: f32,
    /// Bound on each individual completion call. Exceeding it is a role failure.
    pub call_timeout: Option<Duration>,
    /// Bound on the whole analysis. Exceeding it fails the analysis.
    pub overall_timeout: Option<Duration>,
    /// Maximum completion calls in flight at once.
    pub max_concurrency: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            max_tokens: 450,
            knowledge_max_tokens: 600,
            consistency_max_tokens: 400,
            temperature: 0.2,
            call_timeout: Some(Duration::from_secs(180)),
            overall_timeout: None,
            max_concurrency: 4,
        }
    }
}

impl AnalysisParams {
    /// Token budget for a role
    pub fn max_tokens_for(&self, role: AgentRole) -> u32 {
        match role {
            AgentRole::Knowledge => self.knowledge_max_tokens,
            AgentRole::Consistency => self.consistency_max_tokens,
            _ => self.max_tokens,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_knowledge_max_tokens(mut self, max: u32) -> Self {
        self.knowledge_max_tokens = max;
        self
    }

    pub fn with_consistency_max_tokens(mut self, max: u32) -> Self {
        self.consistency_max_tokens = max;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_overall_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.overall_timeout = timeout;
        self
    }

    /// Zero is treated as one.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let params = AnalysisParams::default();
        assert_eq!(params.max_tokens, 450);
        assert_eq!(params.knowledge_max_tokens, 600);
        assert_eq!(params.consistency_max_tokens, 400);
        assert_eq!(params.temperature, 0.2);
        assert_eq!(params.call_timeout, Some(Duration::from_secs(180)));
        assert!(params.overall_timeout.is_none());
        assert_eq!(params.max_concurrency, 4);
    }

    #[test]
    fn test_token_budget_per_role() {
        let params = AnalysisParams::default();
        assert_eq!(params.max_tokens_for(AgentRole::RootCause), 450);
        assert_eq!(params.max_tokens_for(AgentRole::Actions), 450);
        assert_eq!(params.max_tokens_for(AgentRole::Knowledge), 600);
        assert_eq!(params.max_tokens_for(AgentRole::Consistency), 400);
    }

    #[test]
    fn test_builder_methods() {
        let params = AnalysisParams::default()
            .with_max_tokens(300)
            .with_temperature(0.7)
            .with_call_timeout(None)
            .with_overall_timeout(Some(Duration::from_secs(60)))
            .with_max_concurrency(0);

        assert_eq!(params.max_tokens, 300);
        assert_eq!(params.temperature, 0.7);
        assert!(params.call_timeout.is_none());
        assert_eq!(params.overall_timeout, Some(Duration::from_secs(60)));
        assert_eq!(params.max_concurrency, 1);
    }
}
