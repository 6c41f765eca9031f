//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod analysis_logger;
pub mod completion;
pub mod progress;
