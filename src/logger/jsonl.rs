//! JSONL event log: append-only line-delimited JSON for the watch session.
//!
//! Each line is a self-contained JSON object, assembled in memory and
//! written with a single `write_all` so a tailing process never sees a
//! partial line. Logging is opt-in (`--log-file`) and must never take the
//! watch loop down: on write failure the sink degrades from the file to
//! stderr, and from stderr to silent discard.

#![allow(missing_docs)]

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Event types in the watch-session activity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    SessionStop,
    CaptureComplete,
    CaptureTimeout,
    Resize,
    FatalError,
}

/// A single JSONL log entry — all fields optional except `ts`, `event`,
/// `severity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Severity level.
    pub severity: Severity,
    /// Watched command (session start only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Capture duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Captured byte count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    /// Grid height after layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_rows: Option<usize>,
    /// Grid width after layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_cols: Option<usize>,
    /// Terminal rows (resize events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_rows: Option<usize>,
    /// Terminal columns (resize events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_cols: Option<usize>,
    /// VGL error code for failure events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            command: None,
            duration_ms: None,
            bytes: None,
            grid_rows: None,
            grid_cols: None,
            term_rows: None,
            term_cols: None,
            error_code: None,
            details: None,
        }
    }
}

/// Degradation state of the log sink.
#[derive(Debug)]
enum Sink {
    /// Logging was not requested.
    Disabled,
    /// Writing to the configured file.
    File(BufWriter<File>),
    /// File write failed; lines go to stderr with a prefix.
    Stderr,
    /// Stderr failed too; entries are dropped.
    Discard,
}

/// Append-only JSONL event log with write-failure degradation.
#[derive(Debug)]
pub struct EventLog {
    sink: Sink,
}

impl EventLog {
    /// A log that drops everything (the default when `--log-file` is absent).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            sink: Sink::Disabled,
        }
    }

    /// Open `path` for appending. On failure the log starts in the stderr
    /// state rather than failing the session.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Sink::File(BufWriter::with_capacity(16 * 1024, file)),
            },
            Err(e) => {
                let _ = writeln!(
                    io::stderr(),
                    "[VGL-LOG] cannot open {}: {e}; logging to stderr",
                    path.display()
                );
                Self { sink: Sink::Stderr }
            }
        }
    }

    /// Write one entry as one atomic JSONL line.
    pub fn record(&mut self, entry: &LogEntry) {
        if matches!(self.sink, Sink::Disabled | Sink::Discard) {
            return;
        }
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[VGL-LOG] serialize error: {e}");
                return;
            }
        };
        self.write_line(&line);
    }

    /// Flush buffered lines.
    pub fn flush(&mut self) {
        if let Sink::File(w) = &mut self.sink {
            let _ = w.flush();
        }
    }

    /// Current sink state, for diagnostics and tests.
    #[must_use]
    pub const fn state(&self) -> &'static str {
        match self.sink {
            Sink::Disabled => "disabled",
            Sink::File(_) => "file",
            Sink::Stderr => "stderr",
            Sink::Discard => "discard",
        }
    }

    fn write_line(&mut self, line: &str) {
        match &mut self.sink {
            Sink::File(w) => {
                if w.write_all(line.as_bytes()).is_err() {
                    self.sink = Sink::Stderr;
                    self.write_line(line);
                }
            }
            Sink::Stderr => {
                if write!(io::stderr(), "[VGL-LOG] {line}").is_err() {
                    self.sink = Sink::Discard;
                }
            }
            Sink::Disabled | Sink::Discard => {}
        }
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Format current UTC time as ISO 8601.
fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_log_records_nothing() {
        let mut log = EventLog::disabled();
        log.record(&LogEntry::new(EventType::SessionStart, Severity::Info));
        assert_eq!(log.state(), "disabled");
    }

    #[test]
    fn entries_are_valid_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.jsonl");
        let mut log = EventLog::open(&path);
        assert_eq!(log.state(), "file");

        let mut entry = LogEntry::new(EventType::CaptureComplete, Severity::Info);
        entry.duration_ms = Some(12);
        entry.bytes = Some(512);
        log.record(&entry);
        log.record(&LogEntry::new(EventType::SessionStop, Severity::Info));
        log.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["event"], "capture_complete");
        assert_eq!(parsed["duration_ms"], 12);
    }

    #[test]
    fn none_fields_are_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparse.jsonl");
        let mut log = EventLog::open(&path);
        log.record(&LogEntry::new(EventType::SessionStart, Severity::Info));
        log.flush();

        let line = std::fs::read_to_string(&path).unwrap();
        assert!(!line.contains("\"duration_ms\""));
        assert!(!line.contains("\"grid_rows\""));
    }

    #[test]
    fn unwritable_path_degrades_to_stderr() {
        let log = EventLog::open(Path::new(
            "/nonexistent_vigil_test_dir_29301/watch.jsonl",
        ));
        assert_eq!(log.state(), "stderr");
    }

    #[test]
    fn appends_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("append.jsonl");
        {
            let mut log = EventLog::open(&path);
            log.record(&LogEntry::new(EventType::SessionStart, Severity::Info));
        }
        {
            let mut log = EventLog::open(&path);
            log.record(&LogEntry::new(EventType::SessionStop, Severity::Info));
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
