//! Session event logging: opt-in JSONL with graceful degradation.

pub mod jsonl;

pub use jsonl::{EventLog, EventType, LogEntry, Severity};
