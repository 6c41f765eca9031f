//! Typed per-role outputs.
//!
//! Every record has a safe zero value via `Default`: a failed or empty model
//! response yields "no data", never a missing record.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Financial impact text used when the model gives none
pub const UNKNOWN_FINANCIAL_IMPACT: &str = "Unknown";

/// What started the incident, according to the Root-Cause role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootCauseOutput {
    /// First event of the chain; empty means "no result"
    pub trigger: String,
    pub causal_chain: Vec<String>,
    /// 0-100
    pub confidence: u8,
    pub reasoning: String,
    pub identified_system: String,
}

impl RootCauseOutput {
    pub fn is_empty(&self) -> bool {
        self.trigger.is_empty()
            && self.causal_chain.is_empty()
            && self.reasoning.is_empty()
            && self.identified_system.is_empty()
    }
}

/// Scope and severity of the incident, according to the Impact role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactOutput {
    pub affected_systems: Vec<String>,
    pub user_impact: String,
    pub estimated_duration: String,
    pub financial_impact: String,
    pub severity_justification: String,
    pub primary_system: String,
}

impl Default for ImpactOutput {
    fn default() -> Self {
        Self {
            affected_systems: Vec::new(),
            user_impact: String::new(),
            estimated_duration: String::new(),
            financial_impact: UNKNOWN_FINANCIAL_IMPACT.to_string(),
            severity_justification: String::new(),
            primary_system: String::new(),
        }
    }
}

impl ImpactOutput {
    pub fn is_empty(&self) -> bool {
        self.affected_systems.is_empty()
            && self.user_impact.is_empty()
            && self.estimated_duration.is_empty()
            && self.severity_justification.is_empty()
            && self.primary_system.is_empty()
    }
}

/// Remediation plan, according to the Actions role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionsOutput {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub preventive: Vec<String>,
    pub rollback_plan: String,
    pub target_system: String,
}

impl ActionsOutput {
    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty()
            && self.short_term.is_empty()
            && self.preventive.is_empty()
            && self.rollback_plan.is_empty()
            && self.target_system.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.immediate.len() + self.short_term.len() + self.preventive.len()
    }
}

/// Contact suggested by the Knowledge role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRef {
    pub name: String,
    pub role: String,
    pub email: String,
    pub team: String,
}

impl ContactRef {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Runbook suggested by the Knowledge role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunbookRef {
    pub title: String,
    pub owner: String,
    pub steps_preview: String,
}

impl RunbookRef {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarIncident {
    pub id: String,
    /// 0.0-1.0
    pub similarity: f64,
    pub resolution_summary: String,
    pub cost: String,
}

/// Knowledge-base synthesis. These are suggestions, not facts, and are never
/// compared against the analysis roles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeOutput {
    pub suggested_system: String,
    /// 0.0-1.0
    pub confidence: f64,
    pub primary_contact: ContactRef,
    pub backup_contacts: Vec<ContactRef>,
    pub best_runbook: RunbookRef,
    pub alternative_runbooks: Vec<RunbookRef>,
    pub similar_incidents: Vec<SimilarIncident>,
    pub financial_context: BTreeMap<String, Value>,
    pub reasoning: String,
    pub kb_sources_used: u32,
}

impl KnowledgeOutput {
    pub fn is_empty(&self) -> bool {
        self.suggested_system.is_empty()
            && self.primary_contact.is_empty()
            && self.best_runbook.is_empty()
            && self.backup_contacts.is_empty()
            && self.alternative_runbooks.is_empty()
            && self.similar_incidents.is_empty()
            && self.financial_context.is_empty()
            && self.reasoning.is_empty()
    }
}

/// Overall agreement tier reported by the Consistency role.
///
/// The tier → confidence mapping (90/60/30) is a fixed calibration, not a
/// probability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityTier {
    High,
    Medium,
    Low,
    #[default]
    Unrated,
}

impl QualityTier {
    pub fn confidence(&self) -> u8 {
        match self {
            QualityTier::High => 90,
            QualityTier::Medium => 60,
            QualityTier::Low => 30,
            QualityTier::Unrated => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::High => "HIGH",
            QualityTier::Medium => "MEDIUM",
            QualityTier::Low => "LOW",
            QualityTier::Unrated => "UNRATED",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QualityTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(QualityTier::High),
            "MEDIUM" => Ok(QualityTier::Medium),
            "LOW" => Ok(QualityTier::Low),
            "UNRATED" => Ok(QualityTier::Unrated),
            _ => Err(DomainError::InvalidQualityTier(s.to_string())),
        }
    }
}

/// Cross-agent consistency verdict over the three analysis roles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyOutput {
    /// Objective disagreements (system identity, severity, action target)
    pub factual_conflicts: Vec<String>,
    /// Expected perspective differences
    pub interpretation_conflicts: Vec<String>,
    pub agreements: Vec<String>,
    /// Derived from `quality`: 90 / 60 / 30 / 0
    pub confidence: u8,
    pub quality: QualityTier,
    pub quality_assessment: String,
    pub recommendation: String,
}

impl ConsistencyOutput {
    /// Factual conflicts need an operator to look before acting
    pub fn requires_manual_review(&self) -> bool {
        !self.factual_conflicts.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.factual_conflicts.is_empty()
            && self.interpretation_conflicts.is_empty()
            && self.agreements.is_empty()
            && self.quality_assessment.is_empty()
            && self.recommendation.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert!(RootCauseOutput::default().is_empty());
        assert!(ActionsOutput::default().is_empty());
        assert!(KnowledgeOutput::default().is_empty());
        assert!(ConsistencyOutput::default().is_empty());

        let impact = ImpactOutput::default();
        assert!(impact.is_empty());
        assert_eq!(impact.financial_impact, UNKNOWN_FINANCIAL_IMPACT);
    }

    #[test]
    fn test_quality_tier_confidence() {
        assert_eq!(QualityTier::High.confidence(), 90);
        assert_eq!(QualityTier::Medium.confidence(), 60);
        assert_eq!(QualityTier::Low.confidence(), 30);
        assert_eq!(QualityTier::Unrated.confidence(), 0);
    }

    #[test]
    fn test_quality_tier_from_str() {
        assert_eq!("high".parse::<QualityTier>().ok(), Some(QualityTier::High));
        assert!("excellent".parse::<QualityTier>().is_err());
    }

    #[test]
    fn test_manual_review_flag() {
        let mut out = ConsistencyOutput::default();
        assert!(!out.requires_manual_review());
        out.factual_conflicts.push("Root cause says Server_A, actions target Server_B".into());
        assert!(out.requires_manual_review());
    }

    #[test]
    fn test_step_count() {
        let actions = ActionsOutput {
            immediate: vec!["Restart pool".into()],
            short_term: vec!["Raise pool size".into(), "Add alert".into()],
            ..Default::default()
        };
        assert_eq!(actions.step_count(), 3);
    }
}
