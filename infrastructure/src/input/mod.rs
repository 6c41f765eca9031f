//! Incident input files: classifier facts, raw log and knowledge-base results

mod loader;

pub use loader::{IncidentInputLoader, InputError};
