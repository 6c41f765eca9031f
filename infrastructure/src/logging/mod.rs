//! Logging infrastructure: structured analysis event logging.
//!
//! Provides [`JsonlAnalysisLogger`], a JSONL file writer that implements
//! the [`AnalysisLogger`](incident_application::AnalysisLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlAnalysisLogger;
