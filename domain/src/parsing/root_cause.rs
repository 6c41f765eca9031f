//! Root-Cause response parser

use super::extract::{Field, SectionTable, parse_percent};
use crate::analysis::outputs::RootCauseOutput;
use regex::Regex;
use std::sync::LazyLock;

pub const SYSTEM: &str = "SYSTEM";
pub const TRIGGER: &str = "TRIGGER";
pub const CHAIN: &str = "CHAIN";
pub const CONFIDENCE: &str = "CONFIDENCE";
pub const REASONING: &str = "REASONING";

static TABLE: LazyLock<SectionTable> = LazyLock::new(|| {
    SectionTable::new(&[
        Field::line(SYSTEM),
        Field::line(TRIGGER),
        Field::line(CHAIN),
        Field::line(CONFIDENCE),
        Field::block(REASONING),
    ])
    .expect("Invalid root cause labels")
});

static CHAIN_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:→|->|=>)\s*").expect("Invalid regex"));

/// Parse a Root-Cause response. Never fails; unknown layouts yield the zero value.
pub fn parse_root_cause(text: &str) -> RootCauseOutput {
    if text.trim().is_empty() {
        return RootCauseOutput::default();
    }

    let sections = TABLE.extract(text);
    RootCauseOutput {
        trigger: sections.text(TRIGGER),
        causal_chain: split_chain(&sections.text(CHAIN)),
        confidence: parse_percent(&sections.text(CONFIDENCE)).unwrap_or(0),
        reasoning: sections.text(REASONING),
        identified_system: sections.text(SYSTEM),
    }
}

/// Split `A → B -> C` into ordered labels
pub fn split_chain(raw: &str) -> Vec<String> {
    CHAIN_ARROW
        .split(raw)
        .map(|step| step.trim().trim_matches('*').trim())
        .filter(|step| !step.is_empty())
        .map(str::to_string)
        .collect()
}
