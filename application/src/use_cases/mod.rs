//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod execute_role;
pub mod run_analysis;
