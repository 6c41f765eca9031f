//! Local file system loader for analysis input
//!
//! Reads the three inputs of an analysis:
//!
//! - the facts JSON produced by the upstream classifier (required)
//! - a sanitized log file, replacing the facts' `log_text` (optional)
//! - pre-fetched knowledge-base results JSON (optional)

use incident_application::RunAnalysisInput;
use incident_domain::{IncidentFacts, KnowledgeSearchResults};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors reading analysis input files
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid facts in {path}: {reason}")]
    InvalidFacts { path: PathBuf, reason: String },
}

/// Loads [`RunAnalysisInput`] from the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct IncidentInputLoader;

impl IncidentInputLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load facts, then apply the optional log and knowledge files
    pub fn load(
        &self,
        facts_path: &Path,
        log_path: Option<&Path>,
        kb_path: Option<&Path>,
    ) -> Result<RunAnalysisInput, InputError> {
        let mut facts = self.load_facts(facts_path)?;

        if let Some(path) = log_path {
            facts.log_text = read(path)?;
            debug!("Loaded {} bytes of log from {}", facts.log_text.len(), path.display());
        }

        let mut input = RunAnalysisInput::new(facts);
        if let Some(path) = kb_path {
            let knowledge = self.load_knowledge(path)?;
            debug!(
                "Loaded {} knowledge-base sources from {}",
                knowledge.source_count(),
                path.display()
            );
            input = input.with_knowledge(knowledge);
        }

        Ok(input)
    }

    pub fn load_facts(&self, path: &Path) -> Result<IncidentFacts, InputError> {
        let mut facts: IncidentFacts = read_json(path)?;

        if !facts.system_confidence.is_finite() {
            return Err(InputError::InvalidFacts {
                path: path.to_path_buf(),
                reason: "system_confidence must be a number".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&facts.system_confidence) {
            warn!(
                "system_confidence {} outside [0, 1] in {}, clamping",
                facts.system_confidence,
                path.display()
            );
            facts.system_confidence = facts.system_confidence.clamp(0.0, 1.0);
        }

        Ok(facts)
    }

    pub fn load_knowledge(&self, path: &Path) -> Result<KnowledgeSearchResults, InputError> {
        read_json(path)
    }
}

fn read(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_domain::Severity;
    use std::fs;
    use tempfile::TempDir;

    const FACTS: &str = r#"{
        "system": "Server_A",
        "system_confidence": 0.9,
        "severity": "CRITICAL",
        "issue_type": "db_pool",
        "log_text": "ERROR from facts",
        "known_contacts": [{"name": "Ana Ruiz", "role": "DBA"}]
    }"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_facts_only() {
        let dir = TempDir::new().unwrap();
        let facts = write(&dir, "facts.json", FACTS);

        let input = IncidentInputLoader::new().load(&facts, None, None).unwrap();
        assert_eq!(input.facts.system, "Server_A");
        assert_eq!(input.facts.severity, Severity::Critical);
        assert_eq!(input.facts.log_text, "ERROR from facts");
        assert_eq!(input.facts.known_contacts.len(), 1);
        assert!(input.knowledge.is_none());
    }

    #[test]
    fn test_log_file_replaces_log_text() {
        let dir = TempDir::new().unwrap();
        let facts = write(&dir, "facts.json", FACTS);
        let log = write(&dir, "incident.log", "INFO boot\nERROR pool exhausted\n");

        let input = IncidentInputLoader::new()
            .load(&facts, Some(&log), None)
            .unwrap();
        assert_eq!(input.facts.log_text, "INFO boot\nERROR pool exhausted\n");
    }

    #[test]
    fn test_knowledge_file() {
        let dir = TempDir::new().unwrap();
        let facts = write(&dir, "facts.json", FACTS);
        let kb = write(
            &dir,
            "kb.json",
            r#"{"runbooks": [{"title": "DB pool exhaustion", "owner": "Data"}],
                "past_incidents": [{"id": "INC-1", "description": "Pool leak"}]}"#,
        );

        let input = IncidentInputLoader::new()
            .load(&facts, None, Some(&kb))
            .unwrap();
        let knowledge = input.knowledge.unwrap();
        assert!(knowledge.contacts.is_empty());
        assert_eq!(knowledge.runbooks[0].title, "DB pool exhaustion");
        assert_eq!(knowledge.source_count(), 2);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let dir = TempDir::new().unwrap();
        let facts = write(
            &dir,
            "facts.json",
            r#"{"system": "Server_A", "system_confidence": 1.4, "severity": "HIGH"}"#,
        );

        let facts = IncidentInputLoader::new().load_facts(&facts).unwrap();
        assert_eq!(facts.system_confidence, 1.0);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = IncidentInputLoader::new()
            .load_facts(&dir.path().join("absent.json"))
            .unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let facts = write(&dir, "facts.json", "{ not json");
        let err = IncidentInputLoader::new().load_facts(&facts).unwrap_err();
        assert!(matches!(err, InputError::Parse { .. }));
    }
}
