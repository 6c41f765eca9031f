//! Backend configuration from TOML (`[backend]` section)

use crate::providers::{BackendKind, BackendSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw backend configuration from TOML
///
/// Unset fields fall back to the defaults of the selected `kind`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// `ollama`, `groq` or `claude`
    pub kind: BackendKind,
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

impl FileBackendConfig {
    /// Fill unset fields from the backend's defaults
    pub fn to_settings(&self) -> BackendSettings {
        let mut settings = BackendSettings::for_kind(self.kind);
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(var) = &self.api_key_env {
            settings.api_key_env = Some(var.clone());
        }
        if let Some(secs) = self.request_timeout_seconds {
            settings.request_timeout = Duration::from_secs(secs);
        }
        settings
    }
}
