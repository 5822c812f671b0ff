//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use vigil::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, VigilError};

// Capture
pub use crate::capture::{CaptureOutcome, run_capture};

// Layout
pub use crate::grid::ContentGrid;

// View
pub use crate::view::navigation::{InputMode, NavEvent, Navigator, Outcome};
pub use crate::view::viewport::ViewportState;

// Watch
pub use crate::watch::clock::RefreshClock;
pub use crate::watch::signals::SignalFlags;

// Logging
pub use crate::logger::{EventLog, EventType, LogEntry, Severity};
