//! Progress port for analysis phases
//!
//! The use case reports phase boundaries and per-role outcomes through
//! [`ProgressNotifier`]; renderers live in the presentation crate.

use incident_domain::{AgentRole, Phase};

/// Receives phase and role progress while an analysis runs
pub trait ProgressNotifier: Send + Sync {
    /// A phase dispatched `total_tasks` roles
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// One role of the phase finished; `success` is false when it degraded
    fn on_role_complete(&self, phase: &Phase, role: AgentRole, success: bool);

    /// The phase's join barrier was reached
    fn on_phase_complete(&self, phase: &Phase);
}

/// Discards all progress
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _: &Phase, _: usize) {}
    fn on_role_complete(&self, _: &Phase, _: AgentRole, _: bool) {}
    fn on_phase_complete(&self, _: &Phase) {}
}
