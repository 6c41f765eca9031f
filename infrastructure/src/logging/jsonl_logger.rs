//! JSONL file writer for analysis events.
//!
//! Each [`AnalysisEvent`] becomes one JSON line carrying its payload fields
//! plus `type` and an RFC 3339 `timestamp`.

use incident_application::ports::analysis_logger::{AnalysisEvent, AnalysisLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Analysis event logger that appends one JSON object per line.
///
/// Roles complete on separate tasks, so the writer sits behind a `Mutex`.
/// Flushes after every record and on `Drop`.
pub struct JsonlAnalysisLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAnalysisLogger {
    /// Open the log for appending, creating the file and parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Merge the payload with `type` and `timestamp`; non-object payloads go under `data`
fn record(event: AnalysisEvent, timestamp: String) -> Value {
    let mut map = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::String(event.event_type.to_string()));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(map)
}

impl AnalysisLogger for JsonlAnalysisLogger {
    fn log(&self, event: AnalysisEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(line) = serde_json::to_string(&record(event, timestamp)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock()
            && let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush())
        {
            warn!("Could not write event log {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlAnalysisLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_domain::{AgentRole, ExecutionMode, MultiAgentResult, RoleTiming, Severity};
    use std::time::Duration;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let logger = JsonlAnalysisLogger::open(&path).unwrap();

        logger.log(AnalysisEvent::analysis_started(
            "Server_A",
            &Severity::Critical,
            ExecutionMode::PartialSequential,
        ));
        logger.log(AnalysisEvent::role_completed(
            AgentRole::Impact,
            &RoleTiming::new(Duration::ZERO, Duration::from_millis(1500)),
            Some("empty response"),
        ));
        logger.log(AnalysisEvent::analysis_completed(&MultiAgentResult::default()));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        for line in &lines {
            let timestamp = line["timestamp"].as_str().unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        }

        assert_eq!(lines[0]["type"], "analysis_started");
        assert_eq!(lines[0]["system"], "Server_A");
        assert_eq!(lines[1]["type"], "role_completed");
        assert_eq!(lines[1]["role"], "impact");
        assert_eq!(lines[1]["elapsed_ms"], 1500);
        assert_eq!(lines[1]["error"], "empty response");
        assert_eq!(lines[2]["type"], "analysis_completed");
        assert_eq!(lines[2]["requires_manual_review"], false);
    }

    #[test]
    fn test_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/events.jsonl");

        for _ in 0..2 {
            let logger = JsonlAnalysisLogger::open(&path).unwrap();
            logger.log(AnalysisEvent::new("ping", serde_json::json!({"n": 1})));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_non_object_payload_goes_under_data() {
        let value = record(
            AnalysisEvent::new("note", serde_json::json!("just a string")),
            "2024-01-01T00:00:00.000Z".to_string(),
        );
        assert_eq!(value["type"], "note");
        assert_eq!(value["data"], "just a string");
    }

    #[test]
    fn test_open_fails_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        assert!(JsonlAnalysisLogger::open(blocker.join("events.jsonl")).is_err());
    }
}
