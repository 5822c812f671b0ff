//! Modal help overlay: a bordered box over the content listing every key
//! binding. Purely presentational — the watch loop owns the modal input.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

/// Key-binding reference shown in the overlay.
pub const HELP_TEXT: &str = "Press <Esc> or q to close this window.

Commands:
  <Esc>,q         - Quit this program

  <F5>,r          - Execute the command now

  <Up>,w          - Scroll up by one row
  <Down>,s        - Scroll down by one row
  <Left>,a        - Scroll left by one column
  <Right>,d       - Scroll right by one column
  <PageDn>,n      - Scroll down by one page
  <PageUp>,b      - Scroll up by one page
  <Home>,h        - Scroll to top
  <End>,e         - Scroll to end
  <,z             - Scroll far left
  >,x             - Scroll far right

Goto Line Number Mode:
  0 through 9     - Begin goto-line mode and/or add a digit
  <Backspace>     - Delete the last digit
  <Esc>           - Leave the mode without jumping
  <Any other key> - Jump to the entered line";

/// Horizontal margin of the overlay box.
const MARGIN_X: usize = 5;
/// Vertical margin of the overlay box.
const MARGIN_Y: usize = 1;

/// Paint the overlay. Skipped entirely when the terminal is too small for
/// a box plus one row of text.
pub fn draw_help(out: &mut impl Write, rows: usize, cols: usize) -> io::Result<()> {
    let width = cols.saturating_sub(MARGIN_X * 2);
    let height = rows.saturating_sub(MARGIN_Y * 2);
    if width < 4 || height < 3 {
        return Ok(());
    }

    let inner = width - 2;
    queue!(out, Clear(ClearType::All))?;

    let top = format!("┌{}┐", "─".repeat(inner));
    let bottom = format!("└{}┘", "─".repeat(inner));

    queue!(out, MoveTo(pos(MARGIN_X), pos(MARGIN_Y)))?;
    write!(out, "{top}")?;

    let mut lines = HELP_TEXT.lines().chain(std::iter::repeat(""));
    for row in 0..height - 2 {
        let text: String = lines.next().unwrap_or("").chars().take(inner).collect();
        queue!(out, MoveTo(pos(MARGIN_X), pos(MARGIN_Y + row + 1)))?;
        write!(out, "│{text:<inner$}│")?;
    }

    queue!(out, MoveTo(pos(MARGIN_X), pos(MARGIN_Y + height - 1)))?;
    write!(out, "{bottom}")?;

    out.flush()
}

fn pos(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}
