//! JSONL transcript writer.
//!
//! Each [`TranscriptEvent`] becomes one JSON line carrying its payload plus
//! `type` and `timestamp`. Existing files are appended to, so one transcript
//! can span several sessions.

use bookbot_application::ports::transcript_logger::{TranscriptEvent, TranscriptLogger};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only JSONL transcript logger.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlTranscriptLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTranscriptLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    ///
    /// Returns `None` and logs a warning when the file cannot be opened;
    /// a missing transcript never stops the program.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn build_record(event: TranscriptEvent) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    match event.payload {
        Value::Object(mut map) => {
            map.insert("type".to_string(), Value::String(event.event_type.to_string()));
            map.insert("timestamp".to_string(), Value::String(timestamp));
            Value::Object(map)
        }
        other => serde_json::json!({
            "type": event.event_type,
            "timestamp": timestamp,
            "data": other,
        }),
    }
}

impl TranscriptLogger for JsonlTranscriptLogger {
    fn log(&self, event: TranscriptEvent) {
        let Ok(line) = serde_json::to_string(&build_record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.jsonl");
        let logger = JsonlTranscriptLogger::new(&path).unwrap();

        logger.log(TranscriptEvent::new(
            "prompt",
            serde_json::json!({"language": "en", "user": "I like Mystery"}),
        ));
        logger.log(TranscriptEvent::new(
            "completion",
            serde_json::json!({"attempt": 1, "text": "[]"}),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "prompt");
        assert_eq!(records[0]["language"], "en");
        assert_eq!(records[1]["type"], "completion");
        assert_eq!(records[1]["attempt"], 1);
        for record in &records {
            assert!(record["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrapped.jsonl");
        let logger = JsonlTranscriptLogger::new(&path).unwrap();
        logger.log(TranscriptEvent::new("note", serde_json::json!("plain text")));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "note");
        assert_eq!(records[0]["data"], "plain text");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.jsonl");

        let first = JsonlTranscriptLogger::new(&path).unwrap();
        first.log(TranscriptEvent::new("prompt", serde_json::json!({})));
        drop(first);

        let second = JsonlTranscriptLogger::new(&path).unwrap();
        assert_eq!(second.path(), path.as_path());
        second.log(TranscriptEvent::new("prompt", serde_json::json!({})));
        drop(second);

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_directory_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlTranscriptLogger::new(dir.path()).is_none());
    }
}
