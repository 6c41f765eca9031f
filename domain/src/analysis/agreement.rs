//! Deterministic system-identity check across the three analysis roles.
//!
//! Models often report a "system mismatch" when every role named the same
//! system with different spelling, and occasionally miss a real one. The
//! labels are compared locally and the consistency verdict is corrected.

use super::outputs::{ActionsOutput, ConsistencyOutput, ImpactOutput, RootCauseOutput};
use serde::{Deserialize, Serialize};

/// Phrases that make a factual conflict about which system failed
const IDENTITY_PHRASES: [&str; 7] = [
    "system identity",
    "system mismatch",
    "system id",
    "identified system",
    "different system",
    "systems differ",
    "system name",
];

/// Conflicts about these facts are never about system identity alone
const OTHER_FACTS: [&str; 2] = ["severity", "target"];

/// Whether the analysis roles agree on which system failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SystemAgreement {
    /// All three labels normalize to the same system (first label kept)
    Unanimous { system: String },
    /// All three labels present, not all equal
    Split {
        root_cause: String,
        impact: String,
        actions: String,
    },
    /// At least one role did not name a system
    Incomplete,
}

impl SystemAgreement {
    pub fn assess(
        root_cause: &RootCauseOutput,
        impact: &ImpactOutput,
        actions: &ActionsOutput,
    ) -> Self {
        Self::from_labels(
            &root_cause.identified_system,
            &impact.primary_system,
            &actions.target_system,
        )
    }

    pub fn from_labels(root_cause: &str, impact: &str, actions: &str) -> Self {
        let keys = [
            normalize_system(root_cause),
            normalize_system(impact),
            normalize_system(actions),
        ];
        if keys.iter().any(String::is_empty) {
            return SystemAgreement::Incomplete;
        }
        let labels = [root_cause, impact, actions];
        let agree = |a: usize, b: usize| {
            keys[a] == keys[b] || token_prefix(labels[a], labels[b])
        };
        if agree(0, 1) && agree(1, 2) && agree(0, 2) {
            SystemAgreement::Unanimous {
                system: root_cause.trim().to_string(),
            }
        } else {
            SystemAgreement::Split {
                root_cause: root_cause.trim().to_string(),
                impact: impact.trim().to_string(),
                actions: actions.trim().to_string(),
            }
        }
    }

    /// Sentence added to the consistency prompt, if any
    pub fn prompt_note(&self) -> Option<String> {
        match self {
            SystemAgreement::Unanimous { system } => Some(format!(
                "NOTE: All three agents identified the same system ({system}). \
                 Do NOT report a system mismatch."
            )),
            _ => None,
        }
    }

    /// Correct the system-identity entries of a parsed consistency verdict
    pub fn reconcile(&self, mut consistency: ConsistencyOutput) -> ConsistencyOutput {
        match self {
            SystemAgreement::Unanimous { system } => {
                let key = normalize_system(system);
                consistency
                    .factual_conflicts
                    .retain(|c| !(is_system_identity_conflict(c) && compact(c).contains(&key)));
            }
            SystemAgreement::Split {
                root_cause,
                impact,
                actions,
            } => {
                if !consistency
                    .factual_conflicts
                    .iter()
                    .any(|c| is_system_identity_conflict(c))
                {
                    consistency.factual_conflicts.push(format!(
                        "System identity differs: root cause '{root_cause}', \
                         impact '{impact}', actions '{actions}'"
                    ));
                }
            }
            SystemAgreement::Incomplete => {}
        }
        consistency
    }
}

/// Comparison key for a system label: lowercase alphanumerics of the text
/// before any parenthetical qualifier
pub fn normalize_system(label: &str) -> String {
    let base = label.split('(').next().unwrap_or_default();
    base.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercase alphanumerics of the whole text
fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercase words of a label before any parenthetical qualifier
fn tokens(label: &str) -> Vec<String> {
    label
        .split('(')
        .next()
        .unwrap_or_default()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// `Server_A` and `Server_A database` name the same system; `server 1` and
/// `server 10` do not
fn token_prefix(a: &str, b: &str) -> bool {
    let (a, b) = (tokens(a), tokens(b));
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    !short.is_empty() && long.starts_with(&short)
}

/// Whether a factual-conflict entry is about which system is affected.
/// Entries that also concern severity or an action target are kept.
pub fn is_system_identity_conflict(entry: &str) -> bool {
    let lower = entry.to_lowercase();
    IDENTITY_PHRASES.iter().any(|p| lower.contains(p))
        && !OTHER_FACTS.iter().any(|f| lower.contains(f))
}
