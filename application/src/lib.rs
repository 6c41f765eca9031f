//! Application layer for incident-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AnalysisParams;
pub use ports::{
    analysis_logger::{AnalysisEvent, AnalysisLogger, NoAnalysisLogger},
    completion::{CompletionGateway, GatewayError},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::execute_role::{RoleExecutor, RoleRun};
pub use use_cases::run_analysis::{RunAnalysisError, RunAnalysisInput, RunAnalysisUseCase};
