//! Incident inputs and the shared context built from them.
//!
//! - [`facts`]: upstream facts (detected system, timeline, KB candidates)
//! - [`severity::Severity`]: severity tier value object
//! - [`context::SharedContext`]: the read-only context every role sees

pub mod context;
pub mod facts;
pub mod severity;
