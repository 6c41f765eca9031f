//! Impact response parser.
//!
//! Impact responses are the noisiest: models tend to show LaTeX-formatted
//! arithmetic, repeat the same sentence, and spill calculation steps into the
//! financial estimate. The text is normalized before extraction and long
//! fields are deduplicated and capped.

use super::extract::{Field, SectionTable, clean_items, first_line};
use crate::analysis::outputs::{ImpactOutput, UNKNOWN_FINANCIAL_IMPACT};
use crate::core::string::normalize_for_compare;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

pub const PRIMARY_SYSTEM: &str = "PRIMARY SYSTEM";
pub const AFFECTED_SYSTEMS: &str = "AFFECTED SYSTEMS";
pub const USER_IMPACT: &str = "USER IMPACT";
pub const ESTIMATED_DURATION: &str = "ESTIMATED DURATION";
pub const FINANCIAL_IMPACT: &str = "FINANCIAL IMPACT";
pub const SEVERITY_JUSTIFICATION: &str = "SEVERITY JUSTIFICATION";

/// Maximum lines kept in the user-impact narrative
pub const MAX_USER_IMPACT_LINES: usize = 5;

/// Maximum lines joined into the severity justification
pub const MAX_JUSTIFICATION_LINES: usize = 3;

const CALCULATION_MARKERS: [&str; 2] = ["CALCULATION WORK", "FINAL ESTIMATION"];

static TABLE: LazyLock<SectionTable> = LazyLock::new(|| {
    SectionTable::new(&[
        Field::line(PRIMARY_SYSTEM),
        Field::block(AFFECTED_SYSTEMS),
        Field::block(USER_IMPACT),
        Field::line(ESTIMATED_DURATION),
        Field::block(FINANCIAL_IMPACT),
        Field::block(SEVERITY_JUSTIFICATION),
    ])
    .expect("Invalid impact labels")
});

static REPEATED_CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$+").expect("Invalid regex"));

static LATEX_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-z]+\{").expect("Invalid regex"));

static LATEX_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-z]+").expect("Invalid regex"));

static MONEY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$[\d,]+k?\s*-?\s*\$?[\d,]+[km]?").expect("Invalid regex")
});

/// Parse an Impact response. Never fails; unknown layouts yield the zero value.
pub fn parse_impact(text: &str) -> ImpactOutput {
    if text.trim().is_empty() {
        return ImpactOutput::default();
    }

    let text = normalize(text);
    let sections = TABLE.extract(&text);

    let affected_systems = sections
        .raw(AFFECTED_SYSTEMS)
        .map(split_systems)
        .unwrap_or_default();

    let primary_system = match sections.text(PRIMARY_SYSTEM) {
        primary if !primary.is_empty() => primary,
        _ => affected_systems.first().cloned().unwrap_or_default(),
    };

    ImpactOutput {
        user_impact: sections
            .raw(USER_IMPACT)
            .map(|raw| dedup_lines(first_paragraph(raw), MAX_USER_IMPACT_LINES).join("\n"))
            .unwrap_or_default(),
        estimated_duration: sections.text(ESTIMATED_DURATION),
        financial_impact: sections
            .raw(FINANCIAL_IMPACT)
            .map(financial_estimate)
            .filter(|estimate| !estimate.is_empty())
            .unwrap_or_else(|| UNKNOWN_FINANCIAL_IMPACT.to_string()),
        severity_justification: sections
            .raw(SEVERITY_JUSTIFICATION)
            .map(|raw| dedup_lines(first_paragraph(raw), MAX_JUSTIFICATION_LINES).join(" "))
            .unwrap_or_default(),
        affected_systems,
        primary_system,
    }
}

/// Collapse `$$` runs and strip LaTeX wrappers such as `\text{...}`
fn normalize(text: &str) -> String {
    let text = REPEATED_CURRENCY.replace_all(text, "$");
    let text = LATEX_OPEN.replace_all(&text, "");
    text.replace('}', "")
}

fn split_systems(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split([',', '\n'])
        .flat_map(clean_items)
        .filter(|system| seen.insert(normalize_for_compare(system)))
        .collect()
}

fn first_paragraph(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.split("\n\n").next().unwrap_or(trimmed)
}

/// Non-empty lines with near-duplicates removed, then capped
fn dedup_lines(block: &str, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(normalize_for_compare(line)))
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Single-line financial estimate; calculation walkthroughs are reduced to
/// the dollar range they contain
fn financial_estimate(raw: &str) -> String {
    let mut estimate = first_line(raw);

    let upper = estimate.to_uppercase();
    if CALCULATION_MARKERS.iter().any(|m| upper.contains(m))
        && let Some(range) = MONEY_RANGE.find(raw)
    {
        estimate = range.as_str().to_string();
    }

    LATEX_COMMAND
        .replace_all(&estimate, "")
        .replace(['{', '}'], "")
        .trim()
        .to_string()
}
