//! Domain layer for incident-quorum
//!
//! This crate contains the core analysis logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Roles
//!
//! An incident is examined by independent roles, each mapped to one model call:
//!
//! - **Root-Cause**, **Impact**, **Actions**: the analysis roles, compared
//!   against each other
//! - **Knowledge**: reference material synthesized from the knowledge base,
//!   never compared
//! - **Consistency**: separates factual conflicts from interpretation
//!   variance across the analysis roles
//!
//! ## Execution Mode
//!
//! - **Parallel** (default): all four roles in one phase
//! - **PartialSequential**: CRITICAL incidents detected with confidence
//!   ≥ 0.75 run Actions after the other three, informed by their findings

pub mod analysis;
pub mod core;
pub mod incident;
pub mod orchestration;
pub mod parsing;
pub mod prompt;

// Re-export commonly used types
pub use analysis::{
    agreement::SystemAgreement,
    outputs::{
        ActionsOutput, ConsistencyOutput, ContactRef, ImpactOutput, KnowledgeOutput,
        QualityTier, RootCauseOutput, RunbookRef, SimilarIncident,
    },
    result::{MultiAgentResult, RoleError, RoleTiming},
    role::AgentRole,
};
pub use core::error::DomainError;
pub use incident::{
    context::SharedContext,
    facts::{Contact, IncidentFacts, KnowledgeSearchResults, PastIncident, Runbook, TimelineEvent},
    severity::Severity,
};
pub use orchestration::{mode::ExecutionMode, phase::Phase};
pub use parsing::{
    KnowledgeParse, decode_knowledge, parse_actions, parse_consistency, parse_impact,
    parse_knowledge, parse_root_cause,
};
pub use prompt::PromptTemplate;
