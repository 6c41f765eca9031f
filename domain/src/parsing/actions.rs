//! Actions response parser

use super::extract::{Field, SectionTable};
use crate::analysis::outputs::ActionsOutput;
use std::sync::LazyLock;

pub const TARGET_SYSTEM: &str = "TARGET SYSTEM";
pub const IMMEDIATE: &str = "IMMEDIATE";
pub const SHORT_TERM: &str = "SHORT-TERM";
pub const PREVENTIVE: &str = "PREVENTIVE";
pub const ROLLBACK_PLAN: &str = "ROLLBACK PLAN";

static TABLE: LazyLock<SectionTable> = LazyLock::new(|| {
    SectionTable::new(&[
        Field::line(TARGET_SYSTEM),
        Field::list(IMMEDIATE),
        Field::list(SHORT_TERM),
        Field::list(PREVENTIVE),
        Field::block(ROLLBACK_PLAN),
    ])
    .expect("Invalid actions labels")
});

/// Parse an Actions response. Never fails; unknown layouts yield the zero value.
pub fn parse_actions(text: &str) -> ActionsOutput {
    if text.trim().is_empty() {
        return ActionsOutput::default();
    }

    let sections = TABLE.extract(text);
    ActionsOutput {
        immediate: sections.items(IMMEDIATE),
        short_term: sections.items(SHORT_TERM),
        preventive: sections.items(PREVENTIVE),
        rollback_plan: sections.text(ROLLBACK_PLAN),
        target_system: sections.text(TARGET_SYSTEM),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_zero_value() {
        assert_eq!(parse_actions(""), ActionsOutput::default());
    }

    #[test]
    fn test_markdown_layout() {
        let text = "\
**TARGET SYSTEM:** Server_A

**IMMEDIATE (within 5 minutes):**
1. **Restart** the connection pool on Server_A
2. Page the on-call DBA

**SHORT-TERM (next 1-2 hours):**
- Raise max_connections to 400
- None

**PREVENTIVE (after resolution):**
- [empty if none]

**ROLLBACK PLAN:**
Revert the pool config to the previous release.
";
        let out = parse_actions(text);
        assert_eq!(out.target_system, "Server_A");
        assert_eq!(
            out.immediate,
            vec!["Restart the connection pool on Server_A", "Page the on-call DBA"]
        );
        assert_eq!(out.short_term, vec!["Raise max_connections to 400"]);
        assert!(out.preventive.is_empty());
        assert_eq!(out.rollback_plan, "Revert the pool config to the previous release.");
    }

    #[test]
    fn test_plain_layout_inline_items() {
        let text = "TARGET SYSTEM: db-01\nIMMEDIATE: Fail over to replica\nPREVENTIVE:\n* Add disk alerts\n";
        let out = parse_actions(text);
        assert_eq!(out.target_system, "db-01");
        assert_eq!(out.immediate, vec!["Fail over to replica"]);
        assert!(out.short_term.is_empty());
        assert_eq!(out.preventive, vec!["Add disk alerts"]);
        assert_eq!(out.rollback_plan, "");
    }

    #[test]
    fn test_item_mentioning_target_system_stays_immediate() {
        let text = "\
IMMEDIATE:
- Restart pool
- Target system: verify Server_A health
SHORT-TERM:
- Raise max_connections
TARGET SYSTEM: Server_A
";
        let out = parse_actions(text);
        assert_eq!(
            out.immediate,
            vec!["Restart pool", "Target system: verify Server_A health"]
        );
        assert_eq!(out.short_term, vec!["Raise max_connections"]);
        assert_eq!(out.target_system, "Server_A");
    }

    #[test]
    fn test_unstructured_text() {
        assert!(parse_actions("Just restart everything.").is_empty());
    }
}
