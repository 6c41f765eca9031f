//! Configuration file loading for incident-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `INCIDENT_QUORUM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./incident-quorum.toml` or `./.incident-quorum.toml`
//! 4. Global: `$XDG_CONFIG_HOME/incident-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAnalysisConfig, FileBackendConfig, FileConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
