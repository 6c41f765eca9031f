//! Orchestration planning: which roles run together, and in what order

pub mod mode;
pub mod phase;
