//! Run Analysis use case
//!
//! Orchestrates the full multi-agent incident analysis: context assembly,
//! mode selection, phased role dispatch, the consistency check, and result
//! aggregation.

use crate::config::AnalysisParams;
use crate::ports::analysis_logger::{AnalysisEvent, AnalysisLogger, NoAnalysisLogger};
use crate::ports::completion::CompletionGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::execute_role::{RoleExecutor, RoleRun};
use incident_domain::{
    ActionsOutput, AgentRole, ConsistencyOutput, ExecutionMode, ImpactOutput, IncidentFacts,
    KnowledgeOutput, KnowledgeSearchResults, MultiAgentResult, Phase, PromptTemplate, RoleError,
    RoleTiming, RootCauseOutput, SharedContext, SystemAgreement, parse_actions,
    parse_consistency, parse_impact, parse_knowledge, parse_root_cause,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Errors that fail an analysis outright.
///
/// Degraded roles are not errors: they are reported in
/// [`MultiAgentResult::errors`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunAnalysisError {
    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid analysis parameters: {0}")]
    InvalidParams(String),
}

/// Input for the RunAnalysis use case
#[derive(Debug, Clone)]
pub struct RunAnalysisInput {
    pub facts: IncidentFacts,
    /// Pre-fetched knowledge-base candidates. Built from the facts' known
    /// contacts and runbooks when absent.
    pub knowledge: Option<KnowledgeSearchResults>,
}

impl RunAnalysisInput {
    pub fn new(facts: IncidentFacts) -> Self {
        Self {
            facts,
            knowledge: None,
        }
    }

    pub fn with_knowledge(mut self, knowledge: KnowledgeSearchResults) -> Self {
        self.knowledge = Some(knowledge);
        self
    }
}

/// Parsed output of whichever role a task ran
#[derive(Debug)]
enum RoleOutput {
    RootCause(RootCauseOutput),
    Impact(ImpactOutput),
    Actions(ActionsOutput),
    Knowledge(KnowledgeOutput),
    Consistency(ConsistencyOutput),
}

/// Use case for running a multi-agent analysis
pub struct RunAnalysisUseCase<G: CompletionGateway + 'static> {
    gateway: Arc<G>,
    params: AnalysisParams,
    logger: Arc<dyn AnalysisLogger>,
}

impl<G: CompletionGateway + 'static> RunAnalysisUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            params: AnalysisParams::default(),
            logger: Arc::new(NoAnalysisLogger),
        }
    }

    pub fn with_params(mut self, params: AnalysisParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn AnalysisLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunAnalysisInput,
    ) -> Result<MultiAgentResult, RunAnalysisError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunAnalysisInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<MultiAgentResult, RunAnalysisError> {
        if self.params.max_concurrency == 0 {
            return Err(RunAnalysisError::InvalidParams(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        match self.params.overall_timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(input, progress))
                .await
                .map_err(|_| {
                    warn!("Analysis exceeded overall timeout of {:?}", limit);
                    RunAnalysisError::Timeout(limit)
                }),
            None => Ok(self.run(input, progress).await),
        }
    }

    async fn run(&self, input: RunAnalysisInput, progress: &dyn ProgressNotifier) -> MultiAgentResult {
        let origin = Instant::now();

        let ctx = SharedContext::assemble(&input.facts);
        let knowledge = input
            .knowledge
            .unwrap_or_else(|| input.facts.default_knowledge());
        let mode = ExecutionMode::select(&ctx.severity, ctx.system_confidence);

        info!(
            "Starting analysis of {} ({}, confidence {:.2}) in {} mode",
            ctx.system_label(),
            ctx.severity,
            ctx.system_confidence,
            mode
        );
        self.logger.log(AnalysisEvent::analysis_started(
            ctx.system_label(),
            &ctx.severity,
            mode,
        ));

        let executor = RoleExecutor::new(Arc::clone(&self.gateway), origin)
            .with_temperature(self.params.temperature)
            .with_call_timeout(self.params.call_timeout)
            .with_limiter(Arc::new(Semaphore::new(self.params.max_concurrency)));

        let mut result = MultiAgentResult {
            mode,
            ..Default::default()
        };

        // Phase 1: independent roles (all four in parallel mode)
        let jobs: Vec<(AgentRole, String)> = Phase::Analysis
            .roles(mode)
            .iter()
            .map(|&role| {
                let prompt = match role {
                    AgentRole::RootCause => PromptTemplate::root_cause(&ctx),
                    AgentRole::Impact => PromptTemplate::impact(&ctx),
                    AgentRole::Knowledge => PromptTemplate::knowledge(&ctx, &knowledge),
                    _ => PromptTemplate::actions(&ctx, None),
                };
                (role, prompt)
            })
            .collect();
        self.run_phase(Phase::Analysis, jobs, &executor, origin, &mut result, progress)
            .await;

        // Phase 2 (staged only): Actions informed by phase 1
        if mode.is_staged() {
            let digest =
                PromptTemplate::agent_digest(&result.root_cause, &result.impact, &result.knowledge);
            debug!("Actions digest: {:?}", digest);
            let prompt = PromptTemplate::actions(&ctx, digest.as_deref());
            self.run_phase(
                Phase::Remediation,
                vec![(AgentRole::Actions, prompt)],
                &executor,
                origin,
                &mut result,
                progress,
            )
            .await;
        }

        // Consistency over the three analysis roles
        let agreement = SystemAgreement::assess(&result.root_cause, &result.impact, &result.actions);
        debug!("System agreement: {:?}", agreement);
        let prompt = PromptTemplate::consistency(
            &result.root_cause,
            &result.impact,
            &result.actions,
            &result.knowledge,
            agreement.prompt_note().as_deref(),
        );
        self.run_phase(
            Phase::Consistency,
            vec![(AgentRole::Consistency, prompt)],
            &executor,
            origin,
            &mut result,
            progress,
        )
        .await;

        if result.role_error(AgentRole::Consistency).is_none() {
            result.consistency = agreement.reconcile(std::mem::take(&mut result.consistency));
        }

        if result.requires_manual_review() {
            warn!(
                "{} factual conflict(s): analysis roles disagree on objective facts",
                result.consistency.factual_conflicts.len()
            );
        }
        if !result.consistency.interpretation_conflicts.is_empty() {
            info!(
                "Interpretation variance: {} (expected across perspectives)",
                result.consistency.interpretation_conflicts.len()
            );
        }

        result.errors.sort_by_key(|e| e.role);
        result.total_time = origin.elapsed();

        info!(
            "Analysis complete in {:.2}s ({} mode, {} role error(s))",
            result.total_time.as_secs_f64(),
            result.mode,
            result.errors.len()
        );
        self.logger.log(AnalysisEvent::analysis_completed(&result));

        result
    }

    /// Dispatch one phase and block on its join barrier
    async fn run_phase(
        &self,
        phase: Phase,
        jobs: Vec<(AgentRole, String)>,
        executor: &RoleExecutor<G>,
        origin: Instant,
        result: &mut MultiAgentResult,
        progress: &dyn ProgressNotifier,
    ) {
        info!("Phase {}: {} role(s)", phase, jobs.len());
        progress.on_phase_start(&phase, jobs.len());

        let phase_start = origin.elapsed();
        let mut pending: HashMap<task::Id, AgentRole> = HashMap::new();
        let mut join_set = JoinSet::new();

        for (role, prompt) in jobs {
            let executor = executor.clone();
            let max_tokens = self.params.max_tokens_for(role);

            let handle = join_set.spawn(async move {
                match role {
                    AgentRole::RootCause => executor
                        .run(role, &prompt, max_tokens, parse_root_cause)
                        .await
                        .map(RoleOutput::RootCause),
                    AgentRole::Impact => executor
                        .run(role, &prompt, max_tokens, parse_impact)
                        .await
                        .map(RoleOutput::Impact),
                    AgentRole::Actions => executor
                        .run(role, &prompt, max_tokens, parse_actions)
                        .await
                        .map(RoleOutput::Actions),
                    AgentRole::Knowledge => executor
                        .run(role, &prompt, max_tokens, parse_knowledge)
                        .await
                        .map(RoleOutput::Knowledge),
                    AgentRole::Consistency => executor
                        .run(role, &prompt, max_tokens, parse_consistency)
                        .await
                        .map(RoleOutput::Consistency),
                }
            });
            pending.insert(handle.id(), role);
        }

        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((id, run)) => {
                    pending.remove(&id);
                    progress.on_role_complete(&phase, run.role, run.is_success());
                    self.logger.log(AnalysisEvent::role_completed(
                        run.role,
                        &run.timing,
                        run.error.as_deref(),
                    ));
                    store(result, run);
                }
                Err(e) => {
                    warn!("Task join error in phase {}: {}", phase, e);
                    // A task that panicked never reported its role
                    if let Some(role) = pending.remove(&e.id()) {
                        let message = format!("task failed: {}", e);
                        self.record_lost_role(
                            &phase,
                            role,
                            phase_start,
                            origin,
                            message,
                            result,
                            progress,
                        );
                    }
                }
            }
        }

        progress.on_phase_complete(&phase);
    }

    /// Zero-valued outcome for a role whose task died before reporting
    #[allow(clippy::too_many_arguments)]
    fn record_lost_role(
        &self,
        phase: &Phase,
        role: AgentRole,
        phase_start: Duration,
        origin: Instant,
        message: String,
        result: &mut MultiAgentResult,
        progress: &dyn ProgressNotifier,
    ) {
        let elapsed = origin.elapsed().saturating_sub(phase_start);
        let timing = RoleTiming::new(phase_start, elapsed);
        progress.on_role_complete(phase, role, false);
        self.logger
            .log(AnalysisEvent::role_completed(role, &timing, Some(&message)));
        result.agent_times.insert(role, timing);
        result.errors.push(RoleError::new(role, message));
    }
}

/// Write one role's outcome into its own slot of the result
fn store(result: &mut MultiAgentResult, run: RoleRun<RoleOutput>) {
    result.agent_times.insert(run.role, run.timing);
    if let Some(message) = run.error {
        result.errors.push(RoleError::new(run.role, message));
    }

    match run.output {
        RoleOutput::RootCause(out) => result.root_cause = out,
        RoleOutput::Impact(out) => result.impact = out,
        RoleOutput::Actions(out) => result.actions = out,
        RoleOutput::Knowledge(out) => result.knowledge = out,
        RoleOutput::Consistency(out) => result.consistency = out,
    }
}
