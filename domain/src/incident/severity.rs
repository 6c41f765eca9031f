//! Severity tier value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Severity tier reported by the upstream log classifier (Value Object)
///
/// Parsing is case-insensitive and never fails: unrecognized labels are kept
/// verbatim in [`Severity::Other`] so they still reach the prompts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
            Severity::Other(s) => s,
        }
    }

    /// Highest tier; the only one eligible for staged execution.
    pub fn is_critical(&self) -> bool {
        matches!(self, Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            "" | "UNKNOWN" => Severity::Unknown,
            _ => Severity::Other(trimmed.to_string()),
        })
    }
}

impl Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(severity) = s.parse::<Severity>();
        Ok(severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("critical".parse::<Severity>().ok(), Some(Severity::Critical));
        assert_eq!(" High ".parse::<Severity>().ok(), Some(Severity::High));
        assert_eq!("".parse::<Severity>().ok(), Some(Severity::Unknown));
    }

    #[test]
    fn test_other_preserved() {
        let severity: Severity = "SEV1".parse().unwrap();
        assert_eq!(severity, Severity::Other("SEV1".to_string()));
        assert_eq!(severity.to_string(), "SEV1");
        assert!(!severity.is_critical());
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        let parsed: Severity = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }
}
