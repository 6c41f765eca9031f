//! Application-level configuration.
//!
//! - [`AnalysisParams`]: token budgets, temperature, timeouts and concurrency

pub mod execution_params;

pub use execution_params::AnalysisParams;
