//! Progress reporting for analysis execution

use colored::Colorize;
use incident_application::ports::progress::ProgressNotifier;
use incident_domain::{AgentRole, Phase};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during an analysis with one bar per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn role_status(role: AgentRole, success: bool) -> String {
        if success {
            format!("{} {}", "v".green(), role.display_name())
        } else {
            format!("{} {}", "x".red(), role.display_name())
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name());
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.phase_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_role_complete(&self, _phase: &Phase, role: AgentRole, success: bool) {
        if let Ok(bar) = self.phase_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(Self::role_status(role, success));
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &Phase) {
        if let Ok(mut bar) = self.phase_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("{} complete", phase.display_name().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} role(s))",
            "->".cyan(),
            phase.display_name().bold(),
            total_tasks
        );
    }

    fn on_role_complete(&self, _phase: &Phase, role: AgentRole, success: bool) {
        if success {
            eprintln!("  {}", ProgressReporter::role_status(role, true));
        } else {
            eprintln!("  {} (failed)", ProgressReporter::role_status(role, false));
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_phase_bar() {
        let reporter = ProgressReporter::new();
        reporter.on_phase_start(&Phase::Analysis, 3);
        reporter.on_role_complete(&Phase::Analysis, AgentRole::Impact, false);
        assert_eq!(
            reporter
                .phase_bar
                .lock()
                .unwrap()
                .as_ref()
                .map(|pb| pb.position()),
            Some(1)
        );

        reporter.on_phase_complete(&Phase::Analysis);
        assert!(reporter.phase_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_role_status() {
        colored::control::set_override(false);
        assert_eq!(ProgressReporter::role_status(AgentRole::RootCause, true), "v Root cause");
        assert_eq!(ProgressReporter::role_status(AgentRole::Actions, false), "x Actions");
    }
}
