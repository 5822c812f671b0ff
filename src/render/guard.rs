//! RAII terminal lifecycle guard.
//!
//! [`TerminalGuard`] enters raw mode and the alternate screen on
//! construction and restores the terminal on [`Drop`] — including panics and
//! early error returns. A custom panic hook restores the terminal *before*
//! the default panic message prints, so the backtrace lands on a normal
//! screen and no error text is ever shown inside the raw-mode frame.

use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::cursor;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};

/// Global flag indicating raw mode is active. Checked by the panic hook to
/// decide whether terminal restoration is needed.
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// RAII guard over raw mode + alternate screen.
pub struct TerminalGuard {
    hook_installed: bool,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen, installing the panic-safe
    /// cleanup hook.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal_best_effort();
            prev(info);
        }));

        Ok(Self {
            hook_installed: true,
        })
    }

    /// Current terminal dimensions as `(rows, cols)`.
    pub fn size() -> io::Result<(usize, usize)> {
        let (cols, rows) = terminal::size()?;
        Ok((rows as usize, cols as usize))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal_best_effort();

        if self.hook_installed {
            // The previous hook was moved into our closure and cannot be
            // reinstated exactly; resetting to the default is equivalent
            // because the guard's lifetime brackets all screen usage.
            let _ = panic::take_hook();
        }
    }
}

/// Best-effort terminal restoration. Idempotent; the atomic flag prevents
/// redundant work when both the panic hook and `Drop` run.
fn restore_terminal_best_effort() {
    if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}
