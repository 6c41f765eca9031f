//! Analysis configuration from TOML (`[analysis]` section)

use incident_application::AnalysisParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw analysis configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnalysisConfig {
    /// Token budget for Root-Cause, Impact and Actions
    pub max_tokens: u32,
    pub knowledge_max_tokens: u32,
    pub consistency_max_tokens: u32,
    pub temperature: f32,
    /// Per completion call
    pub call_timeout_seconds: Option<u64>,
    /// Whole analysis; unset means unbounded
    pub overall_timeout_seconds: Option<u64>,
    pub max_concurrency: usize,
}

impl Default for FileAnalysisConfig {
    fn default() -> Self {
        let params = AnalysisParams::default();
        Self {
            max_tokens: params.max_tokens,
            knowledge_max_tokens: params.knowledge_max_tokens,
            consistency_max_tokens: params.consistency_max_tokens,
            temperature: params.temperature,
            call_timeout_seconds: params.call_timeout.map(|d| d.as_secs()),
            overall_timeout_seconds: params.overall_timeout.map(|d| d.as_secs()),
            max_concurrency: params.max_concurrency,
        }
    }
}

impl FileAnalysisConfig {
    pub fn to_params(&self) -> AnalysisParams {
        AnalysisParams::default()
            .with_max_tokens(self.max_tokens)
            .with_knowledge_max_tokens(self.knowledge_max_tokens)
            .with_consistency_max_tokens(self.consistency_max_tokens)
            .with_temperature(self.temperature)
            .with_call_timeout(self.call_timeout_seconds.map(Duration::from_secs))
            .with_overall_timeout(self.overall_timeout_seconds.map(Duration::from_secs))
            .with_max_concurrency(self.max_concurrency)
    }
}
