//! Consistency response parser

use super::extract::{Field, SectionTable};
use crate::analysis::outputs::{ConsistencyOutput, QualityTier};
use regex::Regex;
use std::sync::LazyLock;

pub const FACTUAL_CONFLICTS: &str = "FACTUAL CONFLICTS";
pub const INTERPRETATION_CONFLICTS: &str = "INTERPRETATION CONFLICTS";
pub const AGREEMENTS: &str = "AGREEMENTS";
pub const QUALITY_ASSESSMENT: &str = "QUALITY ASSESSMENT";
pub const RECOMMENDATION: &str = "RECOMMENDATION";

static TABLE: LazyLock<SectionTable> = LazyLock::new(|| {
    SectionTable::new(&[
        Field::list(FACTUAL_CONFLICTS),
        Field::list(INTERPRETATION_CONFLICTS),
        Field::list(AGREEMENTS),
        Field::block(QUALITY_ASSESSMENT),
        Field::block(RECOMMENDATION),
    ])
    .expect("Invalid consistency labels")
});

static TIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(HIGH|MEDIUM|LOW)\b").expect("Invalid regex"));

/// Parse a Consistency response. Never fails; unknown layouts yield the zero value.
pub fn parse_consistency(text: &str) -> ConsistencyOutput {
    if text.trim().is_empty() {
        return ConsistencyOutput::default();
    }

    let sections = TABLE.extract(text);
    let quality_assessment = sections.text(QUALITY_ASSESSMENT);
    let quality = quality_tier(&quality_assessment);

    ConsistencyOutput {
        factual_conflicts: sections.items(FACTUAL_CONFLICTS),
        interpretation_conflicts: sections.items(INTERPRETATION_CONFLICTS),
        agreements: sections.items(AGREEMENTS),
        confidence: quality.confidence(),
        quality,
        quality_assessment,
        recommendation: sections.text(RECOMMENDATION),
    }
}

/// First whole-word HIGH / MEDIUM / LOW in the assessment
pub fn quality_tier(assessment: &str) -> QualityTier {
    TIER.captures(assessment)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(QualityTier::Unrated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_zero_value() {
        assert_eq!(parse_consistency(""), ConsistencyOutput::default());
    }

    #[test]
    fn test_perfect_agreement() {
        let text = "\
FACTUAL CONFLICTS:

INTERPRETATION CONFLICTS:

AGREEMENTS:
- All agents agree on Server_A as affected system
- All agents identify connection pool exhaustion as root cause

QUALITY ASSESSMENT:
HIGH - Perfect agent agreement on all objective facts

RECOMMENDATION:
Proceed with confidence - all agents aligned on system and cause
";
        let out = parse_consistency(text);
        assert!(out.factual_conflicts.is_empty());
        assert!(out.interpretation_conflicts.is_empty());
        assert_eq!(out.agreements.len(), 2);
        assert_eq!(out.quality, QualityTier::High);
        assert_eq!(out.confidence, 90);
        assert_eq!(
            out.recommendation,
            "Proceed with confidence - all agents aligned on system and cause"
        );
        assert!(!out.requires_manual_review());
    }

    #[test]
    fn test_placeholder_conflicts_ignored() {
        let text = "\
**FACTUAL CONFLICTS:**
- None found
- Root cause names Server_A, actions target Server_B
**INTERPRETATION CONFLICTS:**
- No interpretation conflicts detected.
**QUALITY ASSESSMENT:** MEDIUM (one factual conflict)
";
        let out = parse_consistency(text);
        assert_eq!(
            out.factual_conflicts,
            vec!["Root cause names Server_A, actions target Server_B"]
        );
        assert!(out.interpretation_conflicts.is_empty());
        assert_eq!(out.confidence, 60);
        assert!(out.requires_manual_review());
    }

    #[test]
    fn test_conflict_item_mentioning_recommendation_stays_factual() {
        let text = "\
FACTUAL CONFLICTS:
- Recommendation: root cause says restart, actions say failover
INTERPRETATION CONFLICTS:
AGREEMENTS:
- Same system
QUALITY ASSESSMENT: LOW
RECOMMENDATION: Manual review before acting
";
        let out = parse_consistency(text);
        assert_eq!(
            out.factual_conflicts,
            vec!["Recommendation: root cause says restart, actions say failover"]
        );
        assert_eq!(out.recommendation, "Manual review before acting");
        assert_eq!(out.confidence, 30);
    }

    #[test]
    fn test_tier_is_first_whole_word() {
        assert_eq!(quality_tier("LOW confidence, though HIGH agreement"), QualityTier::Low);
        assert_eq!(quality_tier("Highly consistent"), QualityTier::Unrated);
        assert_eq!(quality_tier("medium"), QualityTier::Medium);
    }

    #[test]
    fn test_missing_tier_is_zero() {
        let out = parse_consistency("QUALITY ASSESSMENT:\nAgents mostly agree\n");
        assert_eq!(out.quality, QualityTier::Unrated);
        assert_eq!(out.confidence, 0);
    }
}
