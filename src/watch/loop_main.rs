//! The watch loop: one cooperative thread driving capture, layout,
//! viewport clamping, rendering, and input dispatch.
//!
//! Per iteration: poll the shutdown flag; run a capture when the interval
//! has elapsed (only in normal mode — goto-line entry pauses re-execution);
//! repaint when anything changed; then block up to one poll slice waiting
//! for input. The capture itself may block for up to the configured timeout
//! — deliberate back-pressure, so at most one child process is ever alive.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::capture::{CaptureOutcome, run_capture};
use crate::core::config::Config;
use crate::core::errors::{Result, VigilError};
use crate::grid::ContentGrid;
use crate::logger::{EventLog, EventType, LogEntry, Severity};
use crate::render::{self, Frame, TerminalGuard};
use crate::view::navigation::{NavEvent, Navigator, Outcome};
use crate::view::viewport::ViewportState;
use crate::watch::clock::RefreshClock;
use crate::watch::signals::SignalFlags;

/// How long one input poll may block before the loop re-checks the clock.
const POLL_SLICE: Duration = Duration::from_millis(50);

/// Run the watch session until quit, fatal error, or termination signal.
///
/// The terminal guard brackets the inner loop, so any error returned here
/// reaches the caller only after the terminal has been restored.
pub fn run(config: &Config, log: &mut EventLog) -> Result<()> {
    let mut start = LogEntry::new(EventType::SessionStart, Severity::Info);
    start.command = Some(config.command.clone());
    log.record(&start);

    let signals = SignalFlags::new();
    let guard = TerminalGuard::new().map_err(|e| VigilError::Terminal {
        details: e.to_string(),
    })?;
    let result = run_loop(config, log, &signals);
    drop(guard);

    match &result {
        Ok(()) => log.record(&LogEntry::new(EventType::SessionStop, Severity::Info)),
        Err(e) => {
            let mut entry = LogEntry::new(EventType::FatalError, Severity::Error);
            entry.error_code = Some(e.code().to_string());
            entry.details = Some(e.to_string());
            log.record(&entry);
        }
    }
    log.flush();
    result
}

fn run_loop(config: &Config, log: &mut EventLog, signals: &SignalFlags) -> Result<()> {
    let mut stdout = io::stdout();
    let (rows, cols) = TerminalGuard::size().map_err(|e| VigilError::Terminal {
        details: e.to_string(),
    })?;

    let mut view = ViewportState::new(rows, cols, config.show_lineno);
    let mut nav = Navigator::new();
    let mut clock = RefreshClock::new(Duration::from_secs(config.interval_secs));
    let timeout = Duration::from_secs(config.timeout_secs);

    let mut grid = ContentGrid::from_bytes(b"", config.tab_stop);
    view.on_refresh(grid.height(), grid.width());
    let mut captured_at: Option<DateTime<Local>> = None;
    let mut dirty = true;

    loop {
        if signals.should_shutdown() {
            return Err(VigilError::Runtime {
                details: "terminated by signal".to_string(),
            });
        }

        if nav.is_normal() && clock.is_due() {
            let started = Instant::now();
            let outcome = run_capture(&config.command, config.buffer_size, timeout)?;
            let duration = started.elapsed();

            grid = ContentGrid::from_bytes(outcome.bytes(), config.tab_stop);
            view.on_refresh(grid.height(), grid.width());
            clock.mark();
            captured_at = Some(Local::now());
            record_capture(log, &outcome, duration, &grid);
            dirty = true;
        }

        if dirty {
            let frame = Frame {
                grid: &grid,
                view: &view,
                command: &config.command,
                interval_secs: config.interval_secs,
                captured_at,
                goto_digits: nav.goto_digits(),
            };
            render::draw(&mut stdout, &frame).map_err(|e| VigilError::io("render", e))?;
            dirty = false;
        }

        if !event::poll(POLL_SLICE).map_err(|e| VigilError::io("input poll", e))? {
            continue;
        }
        match event::read().map_err(|e| VigilError::io("input read", e))? {
            Event::Key(key) => {
                let Some(nav_event) = NavEvent::from_key(&key) else {
                    continue;
                };
                match nav.handle(nav_event, &mut view) {
                    Outcome::Quit => return Ok(()),
                    Outcome::Help => run_help(&mut stdout, &mut view, signals)?,
                    Outcome::ForceRefresh => clock.force(),
                    Outcome::Bell => {
                        render::bell(&mut stdout).map_err(|e| VigilError::io("render", e))?;
                    }
                    Outcome::Continue => {}
                }
                dirty = true;
            }
            Event::Resize(new_cols, new_rows) => {
                view.on_resize(usize::from(new_rows), usize::from(new_cols));
                let mut entry = LogEntry::new(EventType::Resize, Severity::Info);
                entry.term_rows = Some(usize::from(new_rows));
                entry.term_cols = Some(usize::from(new_cols));
                log.record(&entry);
                dirty = true;
            }
            _ => {}
        }
    }
}

/// Modal help overlay loop. Esc or `q` closes; anything else rings the
/// bell; resizes re-clamp the main viewport so the frame behind the
/// overlay is correct when it repaints.
fn run_help(
    stdout: &mut impl Write,
    view: &mut ViewportState,
    signals: &SignalFlags,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if signals.should_shutdown() {
            return Err(VigilError::Runtime {
                details: "terminated by signal".to_string(),
            });
        }

        if dirty {
            render::draw_help(stdout, view.visible_rows(), view.visible_cols())
                .map_err(|e| VigilError::io("render", e))?;
            dirty = false;
        }

        if !event::poll(POLL_SLICE).map_err(|e| VigilError::io("input poll", e))? {
            continue;
        }
        match event::read().map_err(|e| VigilError::io("input read", e))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                _ => render::bell(stdout).map_err(|e| VigilError::io("render", e))?,
            },
            Event::Resize(new_cols, new_rows) => {
                view.on_resize(usize::from(new_rows), usize::from(new_cols));
                dirty = true;
            }
            _ => {}
        }
    }
}

fn record_capture(
    log: &mut EventLog,
    outcome: &CaptureOutcome,
    duration: Duration,
    grid: &ContentGrid,
) {
    let mut entry = if outcome.timed_out() {
        LogEntry::new(EventType::CaptureTimeout, Severity::Warning)
    } else {
        LogEntry::new(EventType::CaptureComplete, Severity::Info)
    };
    entry.duration_ms = Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
    entry.bytes = Some(outcome.bytes().len());
    entry.grid_rows = Some(grid.height());
    entry.grid_cols = Some(grid.width());
    log.record(&entry);
}
