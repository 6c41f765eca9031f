//! Incident facts produced upstream of the analysis core.
//!
//! These are the inputs handed over by the log classifier and the knowledge
//! search: what system was detected, how sure the detector is, the extracted
//! timeline, and candidate contacts/runbooks/past incidents.

use super::severity::Severity;
use serde::{Deserialize, Serialize};

/// One extracted timeline event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineEvent {
    pub timestamp: String,
    /// Short visual marker chosen by the extractor (e.g. "🔴")
    pub icon: String,
    pub component: String,
    pub message: String,
}

impl TimelineEvent {
    pub fn new(
        timestamp: impl Into<String>,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            icon: String::new(),
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// A person who can be paged for an incident
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub name: String,
    pub role: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Contact {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

/// A runbook candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Runbook {
    pub title: String,
    /// Name of the owning engineer or team
    pub owner: String,
    pub steps: Vec<String>,
    pub duration: String,
}

impl Runbook {
    pub fn new(title: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            owner: owner.into(),
            ..Default::default()
        }
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }
}

/// A previously resolved incident returned by the knowledge search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PastIncident {
    pub id: String,
    pub description: String,
    pub resolution: String,
    pub cost: String,
}

impl PastIncident {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// Pre-fetched, already ranked knowledge-base candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeSearchResults {
    pub contacts: Vec<Contact>,
    pub runbooks: Vec<Runbook>,
    pub past_incidents: Vec<PastIncident>,
}

impl KnowledgeSearchResults {
    /// Number of KB entries offered to the Knowledge role
    pub fn source_count(&self) -> usize {
        self.contacts.len() + self.runbooks.len() + self.past_incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_count() == 0
    }
}

/// Everything the upstream classifier knows about an incident
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentFacts {
    /// Sanitized log excerpt
    pub log_text: String,
    pub system: String,
    /// Detection confidence in `[0.0, 1.0]`
    pub system_confidence: f64,
    pub severity: Severity,
    pub issue_type: String,
    pub timeline: Vec<TimelineEvent>,
    /// Pre-rendered error excerpt; extracted from `log_text` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_excerpt: Option<String>,
    pub known_contacts: Vec<Contact>,
    pub known_runbooks: Vec<Runbook>,
}

impl IncidentFacts {
    pub fn new(system: impl Into<String>, system_confidence: f64, severity: Severity) -> Self {
        Self {
            system: system.into(),
            system_confidence,
            severity,
            ..Default::default()
        }
    }

    pub fn with_log_text(mut self, log_text: impl Into<String>) -> Self {
        self.log_text = log_text.into();
        self
    }

    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    pub fn with_timeline(mut self, timeline: Vec<TimelineEvent>) -> Self {
        self.timeline = timeline;
        self
    }

    pub fn with_error_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.error_excerpt = Some(excerpt.into());
        self
    }

    pub fn with_contacts(mut self, contacts: Vec<Contact>) -> Self {
        self.known_contacts = contacts;
        self
    }

    pub fn with_runbooks(mut self, runbooks: Vec<Runbook>) -> Self {
        self.known_runbooks = runbooks;
        self
    }

    /// Knowledge results built from the known contacts/runbooks, used when no
    /// explicit search results are supplied.
    pub fn default_knowledge(&self) -> KnowledgeSearchResults {
        KnowledgeSearchResults {
            contacts: self.known_contacts.clone(),
            runbooks: self.known_runbooks.clone(),
            past_incidents: Vec::new(),
        }
    }
}
