//! Frame painting: header line, optional line-number gutter, and the
//! visible sub-rectangle of the content grid.
//!
//! Layout is a fixed grid repainted in full with queued crossterm commands;
//! row 0 is the header (or the goto-line prompt), rows 1.. hold content.

#![allow(clippy::cast_possible_truncation)]

use std::io::{self, Write};

use chrono::{DateTime, Local};
use crossterm::cursor::{self, MoveTo};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use crate::grid::ContentGrid;
use crate::view::viewport::ViewportState;

/// Everything one repaint needs, borrowed from loop state.
pub struct Frame<'a> {
    /// Current content.
    pub grid: &'a ContentGrid,
    /// Current scroll window.
    pub view: &'a ViewportState,
    /// The watched command, for the header.
    pub command: &'a str,
    /// Refresh interval, for the header.
    pub interval_secs: u64,
    /// Wall-clock stamp of the last capture.
    pub captured_at: Option<DateTime<Local>>,
    /// Digit string when goto-line mode is active.
    pub goto_digits: Option<&'a str>,
}

/// Repaint the whole frame.
pub fn draw(out: &mut impl Write, frame: &Frame<'_>) -> io::Result<()> {
    let rows = frame.view.visible_rows();
    let cols = frame.view.visible_cols();

    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    if let Some(digits) = frame.goto_digits {
        write!(out, "Line: {digits}")?;
    } else {
        let stamp = frame
            .captured_at
            .map(format_stamp)
            .unwrap_or_default();
        write!(
            out,
            "{}",
            header_line(cols, frame.interval_secs, frame.command, &stamp)
        )?;
    }

    let gutter = frame.view.gutter_width();
    let content_cols = cols.saturating_sub(gutter);
    let content_rows = rows.saturating_sub(1);

    for screen_row in 0..content_rows {
        let grid_row = frame.view.top_row() + screen_row;
        if grid_row >= frame.grid.height() {
            break;
        }
        queue!(out, MoveTo(0, (screen_row + 1) as u16))?;
        if gutter > 0 {
            write!(out, "{:>width$}:", grid_row + 1, width = gutter - 1)?;
        }
        let window = frame.grid.window(grid_row, frame.view.left_col(), content_cols);
        write!(out, "{window}")?;
    }

    // The prompt keeps a visible cursor right after the digits; everywhere
    // else the cursor stays hidden.
    if let Some(digits) = frame.goto_digits {
        let x = ("Line: ".len() + digits.chars().count()) as u16;
        queue!(out, MoveTo(x, 0), cursor::Show)?;
    } else {
        queue!(out, cursor::Hide)?;
    }

    out.flush()
}

/// Ring the terminal bell (invalid-key feedback).
pub fn bell(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"\x07")?;
    out.flush()
}

/// Compose the header: `Every N seconds: command`, with the capture stamp
/// right-aligned and the command truncated to whatever space remains.
#[must_use]
pub fn header_line(cols: usize, interval_secs: u64, command: &str, stamp: &str) -> String {
    let mut line = format!("Every {interval_secs} seconds: ");
    let stamp_width = stamp.chars().count();

    let available = cols.saturating_sub(line.chars().count() + stamp_width);
    line.extend(command.chars().take(available));

    let pad = cols.saturating_sub(line.chars().count() + stamp_width);
    line.extend(std::iter::repeat_n(' ', pad));
    line.push_str(stamp);

    line.chars().take(cols).collect()
}

/// ctime-style local timestamp, e.g. `Fri Aug  7 14:03:59 2026`.
#[must_use]
pub fn format_stamp(at: DateTime<Local>) -> String {
    at.format("%a %b %e %H:%M:%S %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_bytes(frame: &Frame<'_>) -> String {
        let mut out = Vec::new();
        draw(&mut out, frame).unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    fn view(rows: usize, cols: usize, grid: &ContentGrid, lineno: bool) -> ViewportState {
        let mut v = ViewportState::new(rows, cols, lineno);
        v.on_refresh(grid.height(), grid.width());
        v
    }

    #[test]
    fn header_right_aligns_stamp() {
        let line = header_line(60, 2, "uptime", "Fri Aug  7 14:03:59 2026");
        assert_eq!(line.chars().count(), 60);
        assert!(line.starts_with("Every 2 seconds: uptime"));
        assert!(line.ends_with("Fri Aug  7 14:03:59 2026"));
    }

    #[test]
    fn header_truncates_long_commands() {
        let cmd = "x".repeat(200);
        let line = header_line(40, 2, &cmd, "12:00:00");
        assert_eq!(line.chars().count(), 40);
        assert!(line.ends_with("12:00:00"));
    }

    #[test]
    fn header_survives_tiny_widths() {
        let line = header_line(5, 2, "uptime", "12:00:00");
        assert!(line.chars().count() <= 5);
    }

    #[test]
    fn frame_contains_visible_rows_only() {
        let grid = ContentGrid::from_bytes(b"alpha\nbeta\ngamma\ndelta\n", 8);
        let v = view(3, 40, &grid, false);
        let painted = frame_bytes(&Frame {
            grid: &grid,
            view: &v,
            command: "cmd",
            interval_secs: 2,
            captured_at: None,
            goto_digits: None,
        });
        // 3 terminal rows = header + 2 content rows.
        assert!(painted.contains("alpha"));
        assert!(painted.contains("beta"));
        assert!(!painted.contains("gamma"));
    }

    #[test]
    fn frame_honors_scroll_position() {
        let grid = ContentGrid::from_bytes(b"alpha\nbeta\ngamma\ndelta\necho\nfox\n", 8);
        let mut v = view(3, 40, &grid, false);
        v.scroll_down(2);
        let painted = frame_bytes(&Frame {
            grid: &grid,
            view: &v,
            command: "cmd",
            interval_secs: 2,
            captured_at: None,
            goto_digits: None,
        });
        assert!(!painted.contains("alpha"));
        assert!(painted.contains("gamma"));
        assert!(painted.contains("delta"));
    }

    #[test]
    fn gutter_numbers_are_one_based_and_aligned() {
        let mut body = Vec::new();
        for i in 1..=12 {
            body.extend_from_slice(format!("line{i}\n").as_bytes());
        }
        let grid = ContentGrid::from_bytes(&body, 8);
        let v = view(5, 40, &grid, true);
        let painted = frame_bytes(&Frame {
            grid: &grid,
            view: &v,
            command: "cmd",
            interval_secs: 2,
            captured_at: None,
            goto_digits: None,
        });
        // Height is 13 (trailing empty line): two-digit gutter.
        assert!(painted.contains(" 1:line1"));
        assert!(painted.contains(" 2:line2"));
    }

    #[test]
    fn goto_prompt_replaces_header() {
        let grid = ContentGrid::from_bytes(b"alpha\n", 8);
        let v = view(3, 40, &grid, false);
        let painted = frame_bytes(&Frame {
            grid: &grid,
            view: &v,
            command: "cmd",
            interval_secs: 2,
            captured_at: None,
            goto_digits: Some("42"),
        });
        assert!(painted.contains("Line: 42"));
        assert!(!painted.contains("Every 2 seconds"));
    }

    #[test]
    fn stamp_format_is_ctime_like() {
        let stamp = format_stamp(Local::now());
        // "Fri Aug  7 14:03:59 2026" — 24 chars, 4 space-separated groups
        // (the day-of-month is space-padded).
        assert_eq!(stamp.chars().count(), 24);
    }
}
