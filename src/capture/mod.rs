//! Bounded process capture: run the watched command, collect its merged
//! output, enforce the deadline, reap the child.

pub mod runner;

pub use runner::{CaptureOutcome, TIMEOUT_PAYLOAD, run_capture};
