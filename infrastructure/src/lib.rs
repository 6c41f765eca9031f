//! Infrastructure layer for incident-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: completion backends, the JSONL event logger,
//! configuration file loading and input file loading.

pub mod config;
pub mod input;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAnalysisConfig, FileBackendConfig, FileConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat,
};
pub use input::{IncidentInputLoader, InputError};
pub use logging::JsonlAnalysisLogger;
pub use providers::{BackendGateway, BackendKind, BackendSettings, ProviderError};
