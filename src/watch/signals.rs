//! Fatal-signal handling: SIGTERM/SIGINT/SIGHUP raise a shutdown flag.
//!
//! Uses `signal-hook` flag registration; the watch loop polls the flag once
//! per iteration instead of doing anything inside a handler. Shutting down
//! through the loop is what guarantees the terminal guard unwinds before
//! the process exits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::{SIGINT, SIGTERM};

/// Thread-safe shutdown state shared with the OS signal hooks.
///
/// `Relaxed` ordering suffices: the loop polls every iteration and no other
/// memory is published through this flag.
#[derive(Clone)]
pub struct SignalFlags {
    shutdown: Arc<AtomicBool>,
}

impl SignalFlags {
    /// Create the flags and register OS signal hooks. Registration is
    /// best-effort; a failure is reported on stderr but not fatal.
    #[must_use]
    pub fn new() -> Self {
        let flags = Self {
            shutdown: Arc::new(AtomicBool::new(false)),
        };
        flags.register();
        flags
    }

    /// Whether a termination signal has arrived.
    #[must_use]
    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Programmatically request shutdown.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    fn register(&self) {
        for sig in [SIGTERM, SIGINT] {
            if let Err(e) = signal_hook::flag::register(sig, Arc::clone(&self.shutdown)) {
                eprintln!("[VGL-SIGNAL] failed to register signal {sig}: {e}");
            }
        }

        #[cfg(unix)]
        {
            use signal_hook::consts::SIGHUP;
            if let Err(e) = signal_hook::flag::register(SIGHUP, Arc::clone(&self.shutdown)) {
                eprintln!("[VGL-SIGNAL] failed to register SIGHUP: {e}");
            }
        }
    }
}

impl Default for SignalFlags {
    fn default() -> Self {
        Self::new()
    }
}
