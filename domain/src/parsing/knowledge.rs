//! Knowledge response parser.
//!
//! The Knowledge role is asked for a JSON object, which models wrap in prose
//! or code fences, truncate, or abandon for a labeled layout. Decoding takes
//! the outermost `{ ... }` span; when that is missing or not valid JSON the
//! labeled fields are read instead.

use super::extract::{Field, SectionTable, parse_unit_interval};
use crate::analysis::outputs::{ContactRef, KnowledgeOutput, RunbookRef, SimilarIncident};
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub const SUGGESTED_SYSTEM: &str = "SUGGESTED SYSTEM";
pub const CONFIDENCE: &str = "CONFIDENCE";
pub const REASONING: &str = "REASONING";

static FALLBACK_TABLE: LazyLock<SectionTable> = LazyLock::new(|| {
    SectionTable::new(&[
        Field::line(SUGGESTED_SYSTEM),
        Field::line(CONFIDENCE),
        Field::block(REASONING),
    ])
    .expect("Invalid knowledge labels")
});

/// How a Knowledge response was decoded
#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeParse {
    /// Embedded JSON object decoded
    Structured(KnowledgeOutput),
    /// JSON missing or invalid; labeled fields extracted instead
    Fallback(KnowledgeOutput),
    /// Nothing usable
    Empty,
}

impl KnowledgeParse {
    pub fn into_output(self) -> KnowledgeOutput {
        match self {
            KnowledgeParse::Structured(out) | KnowledgeParse::Fallback(out) => out,
            KnowledgeParse::Empty => KnowledgeOutput::default(),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, KnowledgeParse::Structured(_))
    }
}

/// Decode a Knowledge response, reporting which path produced the output
pub fn decode_knowledge(text: &str) -> KnowledgeParse {
    if text.trim().is_empty() {
        return KnowledgeParse::Empty;
    }

    if let Some(span) = json_span(text)
        && let Ok(Value::Object(map)) = serde_json::from_str::<Value>(span)
    {
        return KnowledgeParse::Structured(from_json(&map));
    }

    let sections = FALLBACK_TABLE.extract(text);
    let out = KnowledgeOutput {
        suggested_system: sections.text(SUGGESTED_SYSTEM),
        confidence: parse_unit_interval(&sections.text(CONFIDENCE)).unwrap_or(0.0),
        reasoning: sections.text(REASONING),
        ..Default::default()
    };

    if out.suggested_system.is_empty() && out.reasoning.is_empty() && out.confidence == 0.0 {
        KnowledgeParse::Empty
    } else {
        KnowledgeParse::Fallback(out)
    }
}

/// Parse a Knowledge response. Never fails; unknown layouts yield the zero value.
pub fn parse_knowledge(text: &str) -> KnowledgeOutput {
    decode_knowledge(text).into_output()
}

fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn from_json(map: &Map<String, Value>) -> KnowledgeOutput {
    KnowledgeOutput {
        suggested_system: string_field(map, "suggested_system"),
        confidence: unit_field(map, "confidence"),
        primary_contact: map.get("primary_contact").map(contact).unwrap_or_default(),
        backup_contacts: array_field(map, "backup_contacts")
            .map(contact)
            .filter(|c| !c.is_empty())
            .collect(),
        best_runbook: map.get("best_runbook").map(runbook).unwrap_or_default(),
        alternative_runbooks: array_field(map, "alternative_runbooks")
            .map(runbook)
            .filter(|r| !r.is_empty())
            .collect(),
        similar_incidents: array_field(map, "similar_incidents")
            .filter_map(Value::as_object)
            .map(|obj| SimilarIncident {
                id: string_field(obj, "id"),
                similarity: unit_field(obj, "similarity"),
                resolution_summary: string_field(obj, "resolution_summary"),
                cost: string_field(obj, "cost"),
            })
            .collect(),
        financial_context: map
            .get("financial_context")
            .and_then(Value::as_object)
            .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default(),
        reasoning: string_field(map, "reasoning"),
        kb_sources_used: map
            .get("kb_sources_used")
            .and_then(|v| v.as_u64().or_else(|| v.as_str()?.trim().parse().ok()))
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .unwrap_or(0),
    }
}

/// String value of a field; numbers are rendered, anything else is empty
fn string_field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    }
}

/// Numeric (or numeric-string) field clamped to `[0.0, 1.0]`
fn unit_field(map: &Map<String, Value>, key: &str) -> f64 {
    map.get(key)
        .and_then(|v| v.as_f64().or_else(|| parse_unit_interval(v.as_str()?)))
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

fn array_field<'a>(map: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Value> {
    map.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn contact(value: &Value) -> ContactRef {
    match value {
        Value::Object(obj) => ContactRef {
            name: string_field(obj, "name"),
            role: string_field(obj, "role"),
            email: string_field(obj, "email"),
            team: string_field(obj, "team"),
        },
        Value::String(name) => ContactRef {
            name: name.trim().to_string(),
            ..Default::default()
        },
        _ => ContactRef::default(),
    }
}

fn runbook(value: &Value) -> RunbookRef {
    match value {
        Value::Object(obj) => RunbookRef {
            title: string_field(obj, "title"),
            owner: string_field(obj, "owner"),
            steps_preview: string_field(obj, "steps_preview"),
        },
        Value::String(title) => RunbookRef {
            title: title.trim().to_string(),
            ..Default::default()
        },
        _ => RunbookRef::default(),
    }
}
