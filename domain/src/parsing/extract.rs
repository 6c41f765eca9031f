//! Generic label-anchored section extraction.
//!
//! Every role parser declares a table of [`Field`]s. [`SectionTable`] compiles
//! the table once and slices a response into sections: each section starts
//! after its label and ends at the earliest other label of the same table.
//!
//! Label matching tolerates the formatting variance seen in model output:
//!
//! | Input | Matches `IMMEDIATE` |
//! |-------|---------------------|
//! | `IMMEDIATE:` | yes |
//! | `**IMMEDIATE:**` / `**IMMEDIATE**:` | yes |
//! | `IMMEDIATE (within 5 minutes):` | yes |
//! | `### Immediate` (header line) | yes |
//! | `- **Immediate:**` (bulleted, alone on its line) | yes |
//! | `1. IMMEDIATE: restart` (bulleted, upper case) | yes |
//! | `- Immediate: restart the pool` (list item) | no |
//! | `Run the immediate fix:` | no (not at line start) |

use regex::Regex;
use std::sync::LazyLock;

static ITEM_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+[.)]|[-•*+])\s*").expect("Invalid regex"));

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^\[[^\]]*(?:empty|none|n/a)[^\]]*\]$
        | ^(?:none|n/a|empty|nil|-)$
        | ^none\s+(?:found|identified|detected|reported)$
        | none\s+found
        | ^no\b.*\bconflicts?(?:\s+(?:found|detected|identified))?$
        ",
    )
    .expect("Invalid regex")
});

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-)?(\d+)").expect("Invalid regex"));

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?|\.\d+").expect("Invalid regex"));

/// How a section's text is turned into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// First non-empty line
    Line,
    /// Whole section, trimmed
    Block,
    /// One cleaned item per line, placeholders removed
    List,
}

/// One labeled field of a response layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub shape: Shape,
}

impl Field {
    pub const fn line(label: &'static str) -> Self {
        Self {
            label,
            shape: Shape::Line,
        }
    }

    pub const fn block(label: &'static str) -> Self {
        Self {
            label,
            shape: Shape::Block,
        }
    }

    pub const fn list(label: &'static str) -> Self {
        Self {
            label,
            shape: Shape::List,
        }
    }
}

#[derive(Debug)]
struct CompiledField {
    field: Field,
    pattern: Regex,
}

/// A compiled field table. The table's labels double as the boundary set.
#[derive(Debug)]
pub struct SectionTable {
    fields: Vec<CompiledField>,
}

impl SectionTable {
    pub fn new(fields: &[Field]) -> Result<Self, regex::Error> {
        let fields = fields
            .iter()
            .map(|field| {
                Ok(CompiledField {
                    field: *field,
                    pattern: label_pattern(field.label)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { fields })
    }

    /// Slice `text` into the sections of this table
    pub fn extract<'a>(&self, text: &'a str) -> Sections<'a> {
        let mut found = Vec::new();

        for (index, compiled) in self.fields.iter().enumerate() {
            let Some(label) = compiled.pattern.find(text) else {
                continue;
            };
            let start = label.end();
            let end = self
                .fields
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .filter_map(|(_, other)| other.pattern.find_at(text, start))
                .map(|m| m.start())
                .min()
                .unwrap_or(text.len());

            found.push((compiled.field, &text[start..end]));
        }

        Sections { found }
    }
}

/// Sections found in one response
#[derive(Debug, Clone, Default)]
pub struct Sections<'a> {
    found: Vec<(Field, &'a str)>,
}

impl<'a> Sections<'a> {
    fn lookup(&self, label: &str) -> Option<(Field, &'a str)> {
        self.found
            .iter()
            .find(|(field, _)| field.label == label)
            .copied()
    }

    /// Untrimmed section text, if the label was present
    pub fn raw(&self, label: &str) -> Option<&'a str> {
        self.lookup(label).map(|(_, raw)| raw)
    }

    /// Section value rendered according to its field shape; empty when absent
    pub fn text(&self, label: &str) -> String {
        match self.lookup(label) {
            Some((field, raw)) => match field.shape {
                Shape::Line => first_line(raw),
                Shape::Block => raw.trim().to_string(),
                Shape::List => clean_items(raw).join("\n"),
            },
            None => String::new(),
        }
    }

    /// Section value as cleaned list items; empty when absent
    pub fn items(&self, label: &str) -> Vec<String> {
        self.raw(label).map(clean_items).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }
}

fn label_pattern(label: &str) -> Result<Regex, regex::Error> {
    let body = label
        .split([' ', '-', '_'])
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[ \t\-_]+");

    let qualifier = r"[ \t]*(?:\([^)\n]*\))?[ \t]*";
    let bullet = r"^[ \t]*(?:[-*•+]|\d+[.)])[ \t]*";

    // Plain or header line: `LABEL: value`, `**Label**:`, `### Label`
    let plain = format!(
        r"^[ \t]*(?:[#>]+[ \t]*)?\*{{0,2}}(?i:{body})\*{{0,2}}{qualifier}(?::\*{{0,2}}|\*{{0,2}}[ \t\r]*$)"
    );
    // Bulleted label alone on its line: `- **Immediate:**`
    let bullet_header = format!(
        r"{bullet}\*{{0,2}}(?i:{body})\*{{0,2}}{qualifier}:?\*{{0,2}}[ \t\r]*$"
    );
    // Bulleted label with an inline value only in the upper-case form the
    // prompts request: `1. TRIGGER: pool exhausted`. Mixed-case `- Target
    // system: ...` is a list item.
    let bullet_inline = format!(r"{bullet}\*{{0,2}}{body}\*{{0,2}}{qualifier}:\*{{0,2}}");

    Regex::new(&format!(r"(?m)(?:{plain}|{bullet_header}|{bullet_inline})"))
}

/// First non-empty line, with surrounding bold markup removed
pub fn first_line(raw: &str) -> String {
    raw.lines()
        .map(|line| line.trim_matches(|c: char| c == '*' || c.is_whitespace()))
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Split a section into list items: bullets, numbering and bold markup
/// removed, blank lines and placeholders dropped
pub fn clean_items(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| {
            let unbolded = line.replace("**", "");
            let item = ITEM_MARKER.replace(unbolded.trim(), "").trim().to_string();
            (!item.is_empty() && !is_placeholder(&item)).then_some(item)
        })
        .collect()
}

/// Whether a list item is filler the model wrote instead of leaving the list empty
pub fn is_placeholder(item: &str) -> bool {
    let candidate = item.trim().trim_end_matches('.').trim();
    candidate.is_empty() || PLACEHOLDER.is_match(candidate)
}

/// First integer in `text`, clamped to `[0, 100]`
pub fn parse_percent(text: &str) -> Option<u8> {
    let caps = INTEGER.captures(text)?;
    if caps.get(1).is_some() {
        return Some(0);
    }
    let value = caps[2].parse::<u64>().unwrap_or(u64::MAX).min(100);
    u8::try_from(value).ok()
}

/// First decimal number in `text`, clamped to `[0.0, 1.0]`
pub fn parse_unit_interval(text: &str) -> Option<f64> {
    let m = DECIMAL.find(text)?;
    m.as_str()
        .parse::<f64>()
        .ok()
        .map(|value| value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SectionTable {
        SectionTable::new(&[
            Field::list("IMMEDIATE"),
            Field::list("SHORT-TERM"),
            Field::block("ROLLBACK PLAN"),
            Field::line("TARGET SYSTEM"),
        ])
        .unwrap()
    }

    // ==================== Label Matching Tests ====================

    #[test]
    fn test_plain_labels() {
        let text = "TARGET SYSTEM: Server_A\nIMMEDIATE:\n1. Restart pool\n2. Page DBA\nSHORT-TERM:\n- Raise limits";
        let sections = table().extract(text);
        assert_eq!(sections.text("TARGET SYSTEM"), "Server_A");
        assert_eq!(sections.items("IMMEDIATE"), vec!["Restart pool", "Page DBA"]);
        assert_eq!(sections.items("SHORT-TERM"), vec!["Raise limits"]);
    }

    #[test]
    fn test_bold_and_parenthetical_labels() {
        let text = "**IMMEDIATE (within 5 minutes):**\n- **Restart** the pool\n**Short Term**:\n* Tune queries\n**ROLLBACK PLAN:** Revert deploy 42\n";
        let sections = table().extract(text);
        assert_eq!(sections.items("IMMEDIATE"), vec!["Restart the pool"]);
        assert_eq!(sections.items("SHORT-TERM"), vec!["Tune queries"]);
        assert_eq!(sections.text("ROLLBACK PLAN"), "Revert deploy 42");
    }

    #[test]
    fn test_header_style_label() {
        let text = "### Immediate\n1) Fail over\n### Rollback Plan\nSwitch back";
        let sections = table().extract(text);
        assert_eq!(sections.items("IMMEDIATE"), vec!["Fail over"]);
        assert_eq!(sections.text("ROLLBACK PLAN"), "Switch back");
    }

    #[test]
    fn test_label_mid_sentence_is_ignored() {
        let text = "Do the immediate: thing\nIMMEDIATE:\n- Real item";
        let sections = table().extract(text);
        assert_eq!(sections.items("IMMEDIATE"), vec!["Real item"]);
    }

    #[test]
    fn test_list_item_starting_with_label_word_stays_in_list() {
        let text = "IMMEDIATE:\n- Restart pool\n- Target system: verify Server_A health\n- Short-term fix: raise limits\nTARGET SYSTEM: Server_A";
        let sections = table().extract(text);
        assert_eq!(
            sections.items("IMMEDIATE"),
            vec![
                "Restart pool",
                "Target system: verify Server_A health",
                "Short-term fix: raise limits",
            ]
        );
        assert_eq!(sections.text("TARGET SYSTEM"), "Server_A");
        assert!(sections.raw("SHORT-TERM").is_none());
    }

    #[test]
    fn test_bulleted_labels() {
        let text = "1. TARGET SYSTEM: Server_A\n2. **Immediate:**\n- Fail over\n- **Short-term**\n- Tune queries";
        let sections = table().extract(text);
        assert_eq!(sections.text("TARGET SYSTEM"), "Server_A");
        assert_eq!(sections.items("IMMEDIATE"), vec!["Fail over"]);
        assert_eq!(sections.items("SHORT-TERM"), vec!["Tune queries"]);
    }

    #[test]
    fn test_missing_label() {
        let sections = table().extract("nothing structured here");
        assert!(sections.is_empty());
        assert_eq!(sections.text("TARGET SYSTEM"), "");
        assert!(sections.items("IMMEDIATE").is_empty());
        assert!(sections.raw("ROLLBACK PLAN").is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(table().extract("").is_empty());
    }

    // ==================== Placeholder Tests ====================

    #[test]
    fn test_placeholders_filtered_among_valid_items() {
        let raw = "- None\n- Restart pool\n- [empty if none]\n- N/A\n- none found.\n- [None found]\n- Add alert";
        assert_eq!(clean_items(raw), vec!["Restart pool", "Add alert"]);
    }

    #[test]
    fn test_is_placeholder() {
        assert!(is_placeholder("none"));
        assert!(is_placeholder("None."));
        assert!(is_placeholder("n/a"));
        assert!(is_placeholder("Empty"));
        assert!(is_placeholder("[List conflicts here, or empty if none]"));
        assert!(is_placeholder("No factual conflicts detected."));
        assert!(is_placeholder("Factual conflicts: none found"));
        assert!(!is_placeholder("Nonetheless restart the pool"));
        assert!(!is_placeholder("No conflicts on system, but severity differs"));
    }

    // ==================== Numeric Tests ====================

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("85%"), Some(85));
        assert_eq!(parse_percent("about 150"), Some(100));
        assert_eq!(parse_percent("-5"), Some(0));
        assert_eq!(parse_percent("99999999999999999999999"), Some(100));
        assert_eq!(parse_percent("high"), None);
    }

    #[test]
    fn test_parse_unit_interval() {
        assert_eq!(parse_unit_interval("0.6"), Some(0.6));
        assert_eq!(parse_unit_interval(".5"), Some(0.5));
        assert_eq!(parse_unit_interval("85"), Some(1.0));
        assert_eq!(parse_unit_interval("none"), None);
    }
}
