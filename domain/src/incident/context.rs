//! Shared context assembly.
//!
//! [`SharedContext`] is built once per analysis from [`IncidentFacts`] and is
//! read by every prompt builder. Assembly is a pure transform: missing inputs
//! degrade to placeholder text instead of failing.

use super::facts::IncidentFacts;
use super::severity::Severity;
use crate::core::string::head;
use serde::{Deserialize, Serialize};

/// Maximum number of timeline events rendered into prompts
pub const MAX_TIMELINE_EVENTS: usize = 15;

/// Maximum number of matching error lines kept in the excerpt
pub const MAX_ERROR_LINES: usize = 5;

/// Byte budget for the raw-log fallback excerpt
pub const FALLBACK_EXCERPT_BYTES: usize = 400;

pub const NO_TIMELINE: &str = "  (no timeline events)";
pub const NO_ERRORS: &str = "No errors extracted";

const ERROR_MARKERS: [&str; 5] = ["error", "critical", "fail", "exception", "fatal"];

/// Normalized, read-only incident context shared by all roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedContext {
    pub system: String,
    /// Detection confidence, clamped to `[0.0, 1.0]`
    pub system_confidence: f64,
    pub severity: Severity,
    pub issue_type: String,
    pub timeline_text: String,
    pub error_excerpt: String,
    pub runbook_title: Option<String>,
    /// `"Name (Role)"` of the first known contact
    pub contact_summary: Option<String>,
}

impl SharedContext {
    /// Build the shared context from upstream facts.
    pub fn assemble(facts: &IncidentFacts) -> Self {
        let error_excerpt = match facts.error_excerpt.as_deref().map(str::trim) {
            Some(excerpt) if !excerpt.is_empty() => excerpt.to_string(),
            _ => extract_error_excerpt(&facts.log_text),
        };

        Self {
            system: facts.system.trim().to_string(),
            system_confidence: clamp_confidence(facts.system_confidence),
            severity: facts.severity.clone(),
            issue_type: facts.issue_type.trim().to_string(),
            timeline_text: render_timeline(facts),
            error_excerpt,
            runbook_title: facts
                .known_runbooks
                .first()
                .map(|r| r.title.clone())
                .filter(|t| !t.trim().is_empty()),
            contact_summary: facts
                .known_contacts
                .first()
                .filter(|c| !c.name.trim().is_empty())
                .map(|c| format!("{} ({})", c.name, c.role)),
        }
    }

    /// System label for prompts, `"unknown"` when the detector found nothing
    pub fn system_label(&self) -> &str {
        or_unknown(&self.system)
    }

    pub fn issue_type_label(&self) -> &str {
        or_unknown(&self.issue_type)
    }
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "unknown" } else { value }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn render_timeline(facts: &IncidentFacts) -> String {
    if facts.timeline.is_empty() {
        return NO_TIMELINE.to_string();
    }

    facts
        .timeline
        .iter()
        .take(MAX_TIMELINE_EVENTS)
        .map(|ev| {
            format!(
                "  {} {} [{}] {}",
                placeholder(&ev.timestamp),
                ev.icon,
                placeholder(&ev.component),
                ev.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn placeholder(value: &str) -> &str {
    if value.trim().is_empty() { "?" } else { value }
}

/// Pick the first few error-looking lines, or the head of the log when none match.
pub fn extract_error_excerpt(log_text: &str) -> String {
    let lines: Vec<&str> = log_text
        .lines()
        .map(str::trim)
        .filter(|line| {
            let lower = line.to_lowercase();
            ERROR_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .take(MAX_ERROR_LINES)
        .collect();

    if !lines.is_empty() {
        return lines.join("\n");
    }

    let fallback = head(log_text, FALLBACK_EXCERPT_BYTES).trim();
    if fallback.is_empty() {
        NO_ERRORS.to_string()
    } else {
        fallback.to_string()
    }
}
