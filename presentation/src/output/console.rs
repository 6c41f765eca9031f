//! Console output formatter for analysis results

use colored::Colorize;
use incident_domain::{AgentRole, ExecutionMode, ImpactOutput, MultiAgentResult, QualityTier};
use regex::Regex;
use std::sync::LazyLock;

static USER_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:,\d+)?)").expect("Invalid regex"));

/// Formats analysis results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete analysis result
    pub fn format(result: &MultiAgentResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Multi-Agent Incident Analysis"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}  |  {:.2}s total\n",
            "Mode:".cyan().bold(),
            Self::mode_label(result.mode),
            result.total_time.as_secs_f64()
        ));

        output.push_str(&Self::root_cause_section(result));
        output.push_str(&Self::impact_section(result));
        output.push_str(&Self::actions_section(result));
        output.push_str(&Self::knowledge_section(result));
        output.push_str(&Self::consistency_section(result));
        output.push_str(&Self::timing_section(result));
        output.push_str(&Self::errors_section(result));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(result: &MultiAgentResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Combined summary plus the consistency verdict (concise output)
    pub fn format_summary(result: &MultiAgentResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Incident Analysis Summary ===".cyan().bold()
        ));
        output.push_str(&result.summary());
        output.push('\n');

        if result.requires_manual_review() {
            output.push_str(&format!("\n{}\n", Self::manual_review_banner(result)));
        }
        if result.consistency.quality != QualityTier::Unrated {
            output.push_str(&format!(
                "\n{} {} ({}%)\n",
                "Quality:".dimmed(),
                Self::quality_label(result.consistency.quality),
                result.consistency.confidence
            ));
        }
        if result.is_degraded() {
            output.push_str(&format!(
                "{} {}\n",
                "Degraded:".dimmed(),
                result
                    .errors
                    .iter()
                    .map(|e| e.role.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        output
    }

    /// Placeholder shown for a role that returned nothing
    pub fn missing_output_message(role: AgentRole) -> String {
        format!("{} agent did not produce a result.", role.display_name())
    }

    fn mode_label(mode: ExecutionMode) -> String {
        match mode {
            ExecutionMode::PartialSequential => "Partial Sequential (CRITICAL)".yellow().to_string(),
            ExecutionMode::Parallel => "Parallel".green().to_string(),
        }
    }

    fn quality_label(quality: QualityTier) -> String {
        match quality {
            QualityTier::High => quality.as_str().green().bold().to_string(),
            QualityTier::Medium => quality.as_str().yellow().bold().to_string(),
            QualityTier::Low => quality.as_str().red().bold().to_string(),
            QualityTier::Unrated => quality.as_str().dimmed().to_string(),
        }
    }

    fn manual_review_banner(result: &MultiAgentResult) -> String {
        format!(
            "{} {} factual conflict(s): analysis agents disagree on objective facts. MANUAL REVIEW REQUIRED",
            "!!".red().bold(),
            result.consistency.factual_conflicts.len()
        )
        .red()
        .to_string()
    }

    fn missing(role: AgentRole) -> String {
        format!("\n{}\n", Self::missing_output_message(role).dimmed())
    }

    fn root_cause_section(result: &MultiAgentResult) -> String {
        let rc = &result.root_cause;
        let mut out = Self::section_header("Root Cause");

        if rc.trigger.is_empty() {
            out.push_str(&Self::missing(AgentRole::RootCause));
            return out;
        }

        out.push_str(&format!("\n{} {}\n", "Trigger:".bold(), rc.trigger));
        if !rc.identified_system.is_empty() {
            out.push_str(&format!("{} {}\n", "System:".bold(), rc.identified_system));
        }
        if !rc.causal_chain.is_empty() {
            let arrow = format!(" {} ", "→".cyan());
            out.push_str(&format!(
                "{} {}\n",
                "Chain:".bold(),
                rc.causal_chain.join(arrow.as_str())
            ));
        }
        if rc.confidence > 0 {
            out.push_str(&format!("{} {}%\n", "Confidence:".bold(), rc.confidence));
        }
        if !rc.reasoning.is_empty() {
            out.push_str(&format!("{}\n{}\n", "Reasoning:".bold(), Self::indent(&rc.reasoning, "  ")));
        }
        out
    }

    fn impact_section(result: &MultiAgentResult) -> String {
        let imp = &result.impact;
        let mut out = Self::section_header("Impact");

        if imp.affected_systems.is_empty()
            && imp.user_impact.is_empty()
            && imp.estimated_duration.is_empty()
        {
            out.push_str(&Self::missing(AgentRole::Impact));
            return out;
        }

        out.push('\n');
        if !imp.primary_system.is_empty() {
            out.push_str(&format!("{} {}\n", "Primary System:".bold(), imp.primary_system));
        }
        if !imp.affected_systems.is_empty() {
            out.push_str(&format!("{}\n", "Affected Systems:".bold()));
            for system in &imp.affected_systems {
                out.push_str(&format!("  * {}\n", system));
            }
        }
        if !imp.user_impact.is_empty() {
            out.push_str(&format!("{}\n{}\n", "User Impact:".bold(), Self::indent(&imp.user_impact, "  > ")));
        }
        if !imp.estimated_duration.is_empty() {
            out.push_str(&format!("{} {}\n", "Duration:".bold(), imp.estimated_duration));
        }
        out.push_str(&format!("{} {}\n", "Financial Impact:".bold(), Self::financial_line(imp)));
        if !imp.severity_justification.is_empty() {
            out.push_str(&format!(
                "{} {}\n",
                "Why this severity:".bold(),
                imp.severity_justification
            ));
        }
        out
    }

    /// The reported estimate, or a user-count based range when it is unknown
    fn financial_line(imp: &ImpactOutput) -> String {
        if !imp.financial_impact.to_lowercase().contains("unknown") {
            return imp.financial_impact.clone();
        }
        match Self::estimate_cost_from_users(&imp.user_impact) {
            Some(estimate) => format!("{} {}", estimate, "(estimated, actual cost may vary)".dimmed()),
            None => imp.financial_impact.clone(),
        }
    }

    /// Rough cost range from the first user count mentioned in the impact text
    pub fn estimate_cost_from_users(user_impact: &str) -> Option<String> {
        let users: u64 = USER_COUNT
            .captures(user_impact)?
            .get(1)?
            .as_str()
            .replace(',', "")
            .parse()
            .ok()?;

        let range = if users > 10_000 {
            "$500k-$1M"
        } else if users > 1_000 {
            "$50k-$500k"
        } else if users > 100 {
            "$5k-$50k"
        } else {
            return None;
        };
        Some(format!("{} estimated (based on {} users affected)", range, users))
    }

    fn actions_section(result: &MultiAgentResult) -> String {
        let act = &result.actions;
        let mut out = Self::section_header("Actions");

        if act.immediate.is_empty() && act.short_term.is_empty() && act.preventive.is_empty() {
            out.push_str(&Self::missing(AgentRole::Actions));
            return out;
        }

        if !act.target_system.is_empty() {
            out.push_str(&format!("\n{} {}\n", "Target System:".bold(), act.target_system));
        }
        for (title, steps) in [
            ("Immediate (do now)".red().bold(), &act.immediate),
            ("Short-term (next 1-2 hours)".yellow().bold(), &act.short_term),
            ("Preventive (after the incident)".green().bold(), &act.preventive),
        ] {
            if steps.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{}\n", title));
            for (i, step) in steps.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, step));
            }
        }
        if !act.rollback_plan.is_empty() {
            out.push_str(&format!("\n{} {}\n", "Rollback Plan:".bold(), act.rollback_plan));
        }
        out
    }

    fn knowledge_section(result: &MultiAgentResult) -> String {
        let kb = &result.knowledge;
        if kb.is_empty() {
            return String::new();
        }

        let mut out = Self::section_header("Knowledge Base (suggestions, not compared)");
        out.push('\n');
        if !kb.suggested_system.is_empty() {
            out.push_str(&format!(
                "{} {} ({:.0}%)\n",
                "Suggested System:".bold(),
                kb.suggested_system,
                kb.confidence * 100.0
            ));
        }
        if !kb.primary_contact.is_empty() {
            let contact = &kb.primary_contact;
            out.push_str(&format!("{} {}", "Contact:".bold(), contact.name));
            if !contact.role.is_empty() {
                out.push_str(&format!(" ({})", contact.role));
            }
            if !contact.email.is_empty() {
                out.push_str(&format!(" <{}>", contact.email));
            }
            out.push('\n');
        }
        if !kb.best_runbook.is_empty() {
            out.push_str(&format!("{} {}\n", "Runbook:".bold(), kb.best_runbook.title));
        }
        for incident in &kb.similar_incidents {
            out.push_str(&format!(
                "  * {} ({:.0}% similar) {}\n",
                incident.id,
                incident.similarity * 100.0,
                incident.resolution_summary
            ));
        }
        if !kb.reasoning.is_empty() {
            out.push_str(&format!("{} {}\n", "Reasoning:".dimmed(), kb.reasoning));
        }
        out
    }

    fn consistency_section(result: &MultiAgentResult) -> String {
        let cons = &result.consistency;
        let mut out = Self::section_header("Consistency Check");

        if cons.is_empty() {
            out.push_str(&Self::missing(AgentRole::Consistency));
            return out;
        }

        if result.requires_manual_review() {
            out.push_str(&format!("\n{}\n", Self::manual_review_banner(result)));
            for (i, conflict) in cons.factual_conflicts.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, conflict));
            }
        }
        if !cons.interpretation_conflicts.is_empty() {
            out.push_str(&format!(
                "\n{} {} perspective(s), expected across roles\n",
                "Interpretation Variance:".yellow().bold(),
                cons.interpretation_conflicts.len()
            ));
            for (i, conflict) in cons.interpretation_conflicts.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, conflict));
            }
        }
        if !cons.agreements.is_empty() {
            out.push_str(&format!("\n{}\n", "Agreements:".green().bold()));
            for agreement in &cons.agreements {
                out.push_str(&format!("  * {}\n", agreement));
            }
        }

        out.push_str(&format!(
            "\n{} {}  |  {} {}%\n",
            "Quality:".bold(),
            Self::quality_label(cons.quality),
            "Coherence:".bold(),
            cons.confidence
        ));
        if !cons.recommendation.is_empty() {
            out.push_str(&format!("{} {}\n", "Recommendation:".bold(), cons.recommendation));
        }
        out
    }

    fn timing_section(result: &MultiAgentResult) -> String {
        if result.agent_times.is_empty() {
            return String::new();
        }

        let mut out = Self::section_header("Timings");
        out.push('\n');
        for (role, timing) in &result.agent_times {
            out.push_str(&format!(
                "  {:<12} {:>6.2}s -> {:>6.2}s  ({:.2}s)\n",
                role.as_str(),
                timing.started_at.as_secs_f64(),
                timing.finished_at().as_secs_f64(),
                timing.elapsed.as_secs_f64()
            ));
        }
        out
    }

    fn errors_section(result: &MultiAgentResult) -> String {
        if result.errors.is_empty() {
            return String::new();
        }

        let mut out = Self::section_header("Errors");
        out.push('\n');
        for message in result.error_messages() {
            out.push_str(&format!("  {} {}\n", "x".red(), message));
        }
        out
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
