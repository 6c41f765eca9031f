//! Prompt templates for the analysis roles

use crate::analysis::outputs::{
    ActionsOutput, ImpactOutput, KnowledgeOutput, RootCauseOutput,
};
use crate::core::string::{head, truncate};
use crate::incident::context::SharedContext;
use crate::incident::facts::KnowledgeSearchResults;

const MAX_PROMPT_CONTACTS: usize = 5;
const MAX_PROMPT_RUNBOOKS: usize = 3;
const MAX_PROMPT_INCIDENTS: usize = 3;
const INCIDENT_DESCRIPTION_BYTES: usize = 100;
const KNOWLEDGE_EXCERPT_BYTES: usize = 500;

/// Templates for generating each role's instruction
pub struct PromptTemplate;

impl PromptTemplate {
    /// Root-Cause instruction: find the first event of the chain
    pub fn root_cause(ctx: &SharedContext) -> String {
        format!(
            r#"You are a Root Cause Analysis expert. Analyze this incident and identify the PRIMARY trigger.

{}

YOUR TASK:
Identify what STARTED this chain of events. Return EXACTLY this structure:

SYSTEM: [Which system/server is affected - be specific]
TRIGGER: [The first event that started everything]
CHAIN: [Event1] → [Event2] → [Event3] → [Final symptom]
CONFIDENCE: [0-100]
REASONING: [Why you believe this is the root cause]

Focus on the FIRST event in the chain, not just symptoms."#,
            Self::incident_block(ctx)
        )
    }

    /// Impact instruction: scope, duration and cost, one line per field
    pub fn impact(ctx: &SharedContext) -> String {
        format!(
            r#"You are an Impact Assessment expert. Analyze the scope and severity of this incident.

{}

YOUR TASK:
Assess the full impact. Return EXACTLY this structure (be CONCISE):

PRIMARY SYSTEM: [Main system affected]
AFFECTED SYSTEMS: [System1], [System2], [System3]
USER IMPACT: [How many users affected? What can't they do?]
ESTIMATED DURATION: [How long will this last?]
FINANCIAL IMPACT: [Single concise estimate]
SEVERITY JUSTIFICATION: [Brief explanation of severity level]

FINANCIAL IMPACT GUIDELINES:
- Look for explicit costs in logs first
- If not found, estimate based on: 10k+ users = $500k-$1M, 1k-10k users = $50k-$500k, 100-1k users = $5k-$50k
- Format: "$X-$Y estimated (reason)" or "Unknown - insufficient data"
- Keep it to ONE LINE - no calculation steps, no work shown

Be specific but CONCISE. No repetition. No verbose explanations."#,
            Self::incident_block(ctx)
        )
    }

    /// Actions instruction. In the staged plan `agent_digest` carries the
    /// findings of the first phase.
    pub fn actions(ctx: &SharedContext, agent_digest: Option<&str>) -> String {
        let mut context = Self::incident_block(ctx);

        if let Some(runbook) = &ctx.runbook_title {
            context.push_str(&format!("\n\nKNOWN RUNBOOK: {}", runbook));
        }
        if let Some(contact) = &ctx.contact_summary {
            context.push_str(&format!("\nKNOWN CONTACT: {}", contact));
        }
        if let Some(digest) = agent_digest {
            context.push_str(&format!("\n\nOTHER AGENTS FOUND:\n{}", digest));
        }

        format!(
            r#"You are an Incident Response expert. Recommend specific actions to resolve this incident.

{}

YOUR TASK:
Provide actionable steps in 3 phases. Return EXACTLY this structure:

TARGET SYSTEM: [Which system needs action]
IMMEDIATE (within 5 minutes):
- [Specific action 1]
- [Specific action 2]

SHORT-TERM (next 1-2 hours):
- [Action 1]
- [Action 2]

PREVENTIVE (after incident resolved):
- [Prevention 1]
- [Prevention 2]

ROLLBACK PLAN: [How to undo if things get worse]

Be specific - include commands, contacts, or tools where applicable."#,
            context
        )
    }

    /// Knowledge instruction: synthesize pre-fetched KB candidates into JSON
    pub fn knowledge(ctx: &SharedContext, kb: &KnowledgeSearchResults) -> String {
        let contacts = if kb.contacts.is_empty() {
            "No contacts found".to_string()
        } else {
            kb.contacts
                .iter()
                .take(MAX_PROMPT_CONTACTS)
                .map(|c| {
                    format!(
                        "- {} ({}) - {}",
                        c.name,
                        c.role,
                        c.team.as_deref().unwrap_or("Unknown")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let runbooks = if kb.runbooks.is_empty() {
            "No runbooks found".to_string()
        } else {
            kb.runbooks
                .iter()
                .take(MAX_PROMPT_RUNBOOKS)
                .map(|r| format!("- {} (Owner: {})", r.title, r.owner))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let incidents = if kb.past_incidents.is_empty() {
            "No past incidents found".to_string()
        } else {
            kb.past_incidents
                .iter()
                .take(MAX_PROMPT_INCIDENTS)
                .map(|i| {
                    format!(
                        "- {}: {}",
                        i.id,
                        head(&i.description, INCIDENT_DESCRIPTION_BYTES)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            r#"You are a Knowledge Base Synthesis Agent. Analyze these KB search results and provide the MOST RELEVANT suggestions.

INCIDENT CONTEXT:
System: {system}
Severity: {severity}
Issue: {issue}

ERROR EXCERPT:
{excerpt}

KNOWLEDGE BASE RESULTS:

Contacts Found ({contact_count}):
{contacts}

Runbooks Found ({runbook_count}):
{runbooks}

Past Incidents ({incident_count}):
{incidents}

YOUR TASK:
Synthesize this KB data and return a JSON object with your SUGGESTIONS (not facts):

{{
    "suggested_system": "System name based on KB evidence",
    "confidence": 0.85,
    "primary_contact": {{"name": "", "role": "", "email": "", "team": ""}},
    "backup_contacts": [{{"name": "", "role": ""}}],
    "best_runbook": {{"title": "", "owner": "", "steps_preview": "First 3 steps..."}},
    "alternative_runbooks": [],
    "similar_incidents": [
        {{"id": "", "similarity": 0.89, "resolution_summary": "", "cost": ""}}
    ],
    "financial_context": {{
        "historical_costs": ["$X for incident Y"],
        "estimated_range": "$X - $Y"
    }},
    "reasoning": "Why these KB items are relevant...",
    "kb_sources_used": {sources}
}}

IMPORTANT: These are SUGGESTIONS to be validated by other agents, NOT definitive facts.
Return valid JSON only."#,
            system = ctx.system_label(),
            severity = ctx.severity,
            issue = ctx.issue_type_label(),
            excerpt = head(&ctx.error_excerpt, KNOWLEDGE_EXCERPT_BYTES),
            contact_count = kb.contacts.len(),
            runbook_count = kb.runbooks.len(),
            incident_count = kb.past_incidents.len(),
            contacts = contacts,
            runbooks = runbooks,
            incidents = incidents,
            sources = kb.source_count(),
        )
    }

    /// Consistency instruction comparing the three analysis roles.
    ///
    /// Knowledge is appended as reference material and explicitly excluded
    /// from the comparison.
    pub fn consistency(
        root_cause: &RootCauseOutput,
        impact: &ImpactOutput,
        actions: &ActionsOutput,
        knowledge: &KnowledgeOutput,
        agreement_note: Option<&str>,
    ) -> String {
        let analysis = [
            format!(
                "ROOT CAUSE AGENT says:\n  Identified System: {}\n  Trigger: {}\n  Causal Chain: {}\n  Confidence: {}%\n  Reasoning: {}",
                root_cause.identified_system,
                root_cause.trigger,
                root_cause.causal_chain.join(" → "),
                root_cause.confidence,
                truncate(&root_cause.reasoning, 200)
            ),
            format!(
                "IMPACT AGENT says:\n  Primary System: {}\n  Affected Systems: {}\n  User Impact: {}\n  Financial Impact: {}\n  Severity: {}",
                impact.primary_system,
                impact.affected_systems.join(", "),
                impact.user_impact,
                impact.financial_impact,
                truncate(&impact.severity_justification, 100)
            ),
            format!(
                "ACTIONS AGENT says:\n  Target System: {}\n  Immediate Actions: {} steps\n  First Action: {}\n  Rollback: {}",
                actions.target_system,
                actions.immediate.len(),
                actions.immediate.first().map(String::as_str).unwrap_or("None"),
                truncate(&actions.rollback_plan, 100)
            ),
        ]
        .join("\n\n");

        let reference = format!(
            "KNOWLEDGE BASE (REFERENCE ONLY - NOT COMPARED):\n  System: {} (confidence: {:.0}%)\n  Primary Contact: {}\n  Best Runbook: {}\n  Similar Incidents: {} found",
            or_default(&knowledge.suggested_system, "Unknown"),
            knowledge.confidence * 100.0,
            if knowledge.primary_contact.is_empty() {
                "Unknown".to_string()
            } else {
                format!(
                    "{} ({})",
                    knowledge.primary_contact.name,
                    or_default(&knowledge.primary_contact.role, "Unknown")
                )
            },
            or_default(&knowledge.best_runbook.title, "Not found"),
            knowledge.similar_incidents.len()
        );

        let mut prompt = format!(
            r#"You are a consistency validator for a multi-agent incident response system.

IMPORTANT: Only compare the 3 ANALYSIS agents (Root Cause, Impact, Actions) with each other.
The Knowledge Base provides company context and should NOT be compared to analysis agents.

ANALYSIS AGENTS TO COMPARE:
{}

{}
"#,
            analysis, reference
        );

        if let Some(note) = agreement_note {
            prompt.push_str(&format!("\n{}\n", note));
        }

        prompt.push_str(
            r#"
YOUR TASK:
Compare ONLY the 3 analysis agents and classify conflicts into TWO types:

1. FACTUAL CONFLICTS - Objective facts where agents disagree (SERIOUS)
   Examples: Different system IDs, mismatched severity, actions targeting wrong system

2. INTERPRETATION CONFLICTS - Subjective perspectives (EXPECTED)
   Examples: Different root cause theories, different action priorities

CRITICAL FORMATTING RULES:
- If NO conflicts exist in a category, output ONLY the header with NO text below it
- DO NOT write "None found", "No conflicts", or any explanatory text

Analyze and return EXACTLY this structure:

FACTUAL CONFLICTS:
- [Specific disagreement 1]

INTERPRETATION CONFLICTS:
- [Subjective difference 1]

AGREEMENTS:
- [What all agents agree on]

QUALITY ASSESSMENT:
[HIGH if 0 factual conflicts / MEDIUM if 1-2 factual OR many interpretation / LOW if 3+ factual]

RECOMMENDATION:
[What engineer should focus on - prioritize factual conflicts]"#,
        );

        prompt
    }

    /// Digest of first-phase findings handed to Actions in the staged plan.
    ///
    /// Returns `None` when no first-phase role produced anything usable.
    pub fn agent_digest(
        root_cause: &RootCauseOutput,
        impact: &ImpactOutput,
        knowledge: &KnowledgeOutput,
    ) -> Option<String> {
        let mut parts = Vec::new();

        if !knowledge.suggested_system.is_empty() {
            parts.push(format!(
                "KB Suggests: {} (confidence: {:.0}%)",
                knowledge.suggested_system,
                knowledge.confidence * 100.0
            ));
        }
        if !root_cause.trigger.is_empty() {
            parts.push(format!("Root Cause: {}", root_cause.trigger));
            if !root_cause.causal_chain.is_empty() {
                parts.push(format!("Chain: {}", root_cause.causal_chain.join(" → ")));
            }
        }
        if !impact.user_impact.is_empty() {
            parts.push(format!("Impact: {}", impact.user_impact));
        }
        if !impact.affected_systems.is_empty() {
            parts.push(format!("Affected: {}", impact.affected_systems.join(", ")));
        }

        (!parts.is_empty()).then(|| parts.join("\n"))
    }

    fn incident_block(ctx: &SharedContext) -> String {
        format!(
            "INCIDENT DATA:\nSystem: {}\nSeverity: {}\nIssue Type: {}\n\nTIMELINE:\n{}\n\nERROR EXCERPT:\n{}",
            ctx.system_label(),
            ctx.severity,
            ctx.issue_type_label(),
            ctx.timeline_text,
            ctx.error_excerpt
        )
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::facts::{Contact, IncidentFacts, PastIncident, Runbook};
    use crate::incident::severity::Severity;

    fn context() -> SharedContext {
        let facts = IncidentFacts::new("Server_A", 0.9, Severity::Critical)
            .with_issue_type("db_pool")
            .with_log_text("INFO ok\nERROR pool exhausted")
            .with_contacts(vec![Contact::new("Ana Ruiz", "DBA").with_team("Data")])
            .with_runbooks(vec![Runbook::new("DB pool exhaustion", "Data")]);
        SharedContext::assemble(&facts)
    }

    #[test]
    fn test_root_cause_prompt_layout() {
        let prompt = PromptTemplate::root_cause(&context());
        assert!(prompt.starts_with("You are a Root Cause Analysis expert"));
        assert!(prompt.contains("System: Server_A"));
        assert!(prompt.contains("Severity: CRITICAL"));
        assert!(prompt.contains("ERROR pool exhausted"));
        for label in ["SYSTEM:", "TRIGGER:", "CHAIN:", "CONFIDENCE:", "REASONING:"] {
            assert!(prompt.contains(label), "missing {label}");
        }
    }

    #[test]
    fn test_impact_prompt_layout() {
        let prompt = PromptTemplate::impact(&context());
        assert!(prompt.contains("PRIMARY SYSTEM:"));
        assert!(prompt.contains("FINANCIAL IMPACT:"));
    }

    #[test]
    fn test_actions_prompt_with_and_without_digest() {
        let ctx = context();
        let plain = PromptTemplate::actions(&ctx, None);
        assert!(!plain.contains("OTHER AGENTS FOUND"));
        assert!(plain.contains("KNOWN RUNBOOK: DB pool exhaustion"));
        assert!(plain.contains("KNOWN CONTACT: Ana Ruiz (DBA)"));
        assert!(plain.contains("IMMEDIATE (within 5 minutes):"));

        let staged = PromptTemplate::actions(&ctx, Some("Root Cause: pool exhausted"));
        assert!(staged.contains("OTHER AGENTS FOUND:\nRoot Cause: pool exhausted"));
    }

    #[test]
    fn test_knowledge_prompt_limits() {
        let kb = KnowledgeSearchResults {
            contacts: (0..8).map(|i| Contact::new(format!("c{i}"), "SRE")).collect(),
            runbooks: vec![],
            past_incidents: vec![PastIncident::new("INC-9", "x".repeat(300))],
        };
        let prompt = PromptTemplate::knowledge(&context(), &kb);
        assert!(prompt.contains("Contacts Found (8):"));
        assert!(prompt.contains("- c4 (SRE) - Unknown"));
        assert!(!prompt.contains("- c5 (SRE)"));
        assert!(prompt.contains("No runbooks found"));
        assert!(prompt.contains(&format!("- INC-9: {}\n", "x".repeat(100))));
        assert!(prompt.contains("\"kb_sources_used\": 9"));
    }

    #[test]
    fn test_consistency_prompt_marks_knowledge_reference_only() {
        let knowledge = KnowledgeOutput {
            suggested_system: "Server_B".into(),
            confidence: 0.6,
            ..Default::default()
        };
        let prompt = PromptTemplate::consistency(
            &RootCauseOutput::default(),
            &ImpactOutput::default(),
            &ActionsOutput::default(),
            &knowledge,
            Some("NOTE: agreed"),
        );
        assert!(prompt.contains("REFERENCE ONLY - NOT COMPARED"));
        assert!(prompt.contains("System: Server_B (confidence: 60%)"));
        assert!(prompt.contains("First Action: None"));
        assert!(prompt.contains("NOTE: agreed"));
    }

    #[test]
    fn test_agent_digest() {
        assert!(
            PromptTemplate::agent_digest(
                &RootCauseOutput::default(),
                &ImpactOutput::default(),
                &KnowledgeOutput::default()
            )
            .is_none()
        );

        let root_cause = RootCauseOutput {
            trigger: "Pool exhausted".into(),
            causal_chain: vec!["Slow query".into(), "Pool exhausted".into()],
            ..Default::default()
        };
        let knowledge = KnowledgeOutput {
            suggested_system: "Server_A".into(),
            confidence: 0.85,
            ..Default::default()
        };
        let digest =
            PromptTemplate::agent_digest(&root_cause, &ImpactOutput::default(), &knowledge)
                .unwrap();
        assert_eq!(
            digest,
            "KB Suggests: Server_A (confidence: 85%)\nRoot Cause: Pool exhausted\nChain: Slow query → Pool exhausted"
        );
    }
}
