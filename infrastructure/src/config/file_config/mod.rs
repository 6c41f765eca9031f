//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! ([`AnalysisParams`](incident_application::AnalysisParams),
//! [`BackendSettings`](crate::providers::BackendSettings)) at the edge.

mod analysis;
mod backend;
mod logging;
mod output;

pub use analysis::FileAnalysisConfig;
pub use backend::FileBackendConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("temperature must be within [0, 2], got {0}")]
    InvalidTemperature(f32),

    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("{0} cannot be 0")]
    ZeroTokenBudget(&'static str),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Completion backend selection
    pub backend: FileBackendConfig,
    /// Token budgets, temperature, timeouts and concurrency
    pub analysis: FileAnalysisConfig,
    pub output: FileOutputConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning every detected problem
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        let analysis = &self.analysis;

        if self
            .backend
            .model
            .as_deref()
            .is_some_and(|m| m.trim().is_empty())
        {
            issues.push(ConfigValidationError::EmptyModelName);
        }

        if self.backend.request_timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout(
                "backend.request_timeout_seconds",
            ));
        }
        if analysis.call_timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout(
                "analysis.call_timeout_seconds",
            ));
        }
        if analysis.overall_timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout(
                "analysis.overall_timeout_seconds",
            ));
        }

        if !(0.0..=2.0).contains(&analysis.temperature) {
            issues.push(ConfigValidationError::InvalidTemperature(analysis.temperature));
        }

        if analysis.max_concurrency == 0 {
            issues.push(ConfigValidationError::ZeroConcurrency);
        }

        for (field, budget) in [
            ("analysis.max_tokens", analysis.max_tokens),
            ("analysis.knowledge_max_tokens", analysis.knowledge_max_tokens),
            ("analysis.consistency_max_tokens", analysis.consistency_max_tokens),
        ] {
            if budget == 0 {
                issues.push(ConfigValidationError::ZeroTokenBudget(field));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::BackendKind;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[backend]
kind = "ollama"
model = "llama3.1:8b"
request_timeout_seconds = 240

[analysis]
max_tokens = 500
temperature = 0.1
overall_timeout_seconds = 600
max_concurrency = 2

[output]
format = "summary"
color = false

[logging]
event_log = "logs/analysis.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.kind, BackendKind::Ollama);
        assert_eq!(config.backend.request_timeout_seconds, Some(240));
        assert_eq!(config.analysis.max_tokens, 500);
        assert_eq!(config.analysis.knowledge_max_tokens, 600);
        assert_eq!(config.analysis.overall_timeout_seconds, Some(600));
        assert_eq!(config.output.format, Some(FileOutputFormat::Summary));
        assert!(!config.output.color);
        assert_eq!(
            config.logging.event_log.as_deref(),
            Some(std::path::Path::new("logs/analysis.jsonl"))
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[backend]
kind = "claude"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.kind, BackendKind::Claude);
        assert!(config.backend.model.is_none());
        assert_eq!(config.analysis, FileAnalysisConfig::default());
        assert!(config.output.color);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[backend]\nkind = \"bedrock\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.backend.model = Some("  ".to_string());
        config.analysis.call_timeout_seconds = Some(0);
        config.analysis.temperature = 2.5;
        config.analysis.max_concurrency = 0;
        config.analysis.knowledge_max_tokens = 0;

        let issues = config.validate();
        assert_eq!(
            issues,
            vec![
                ConfigValidationError::EmptyModelName,
                ConfigValidationError::InvalidTimeout("analysis.call_timeout_seconds"),
                ConfigValidationError::InvalidTemperature(2.5),
                ConfigValidationError::ZeroConcurrency,
                ConfigValidationError::ZeroTokenBudget("analysis.knowledge_max_tokens"),
            ]
        );
        assert_eq!(
            issues[1].to_string(),
            "analysis.call_timeout_seconds cannot be 0"
        );
    }
}
