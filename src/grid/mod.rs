//! Content grid: the rectangular backing store behind the viewport.
//!
//! Captured bytes are split on line breaks and stored raw (tabs kept in
//! place); column accounting uses tab-expanded widths so scroll bounds match
//! what the terminal will actually paint. Expansion itself happens at paint
//! time in the renderer.

use std::borrow::Cow;

use memchr::memchr_iter;

/// Rectangular text store produced from one capture cycle.
///
/// Dimensions are never zero: empty input yields one empty line and a width
/// of one column, so the viewport arithmetic has no degenerate cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentGrid {
    lines: Vec<String>,
    width: usize,
    tab_stop: usize,
}

impl ContentGrid {
    /// Build a grid from captured bytes.
    ///
    /// Lines are split strictly on `\n`; a trailing line break therefore
    /// produces an empty final line. Non-UTF-8 sequences are replaced
    /// lossily (the grid stores text, and escape interpretation is out of
    /// scope anyway).
    #[must_use]
    pub fn from_bytes(bytes: &[u8], tab_stop: usize) -> Self {
        let tab_stop = tab_stop.max(1);
        let mut lines = Vec::new();
        let mut width = 1;
        let mut start = 0;

        for newline in memchr_iter(b'\n', bytes) {
            width = width.max(push_line(&mut lines, &bytes[start..newline], tab_stop));
            start = newline + 1;
        }
        width = width.max(push_line(&mut lines, &bytes[start..], tab_stop));

        Self {
            lines,
            width,
            tab_stop,
        }
    }

    /// Number of lines, always ≥ 1.
    #[must_use]
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Maximum tab-expanded line width in columns, always ≥ 1.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Tab stop the width accounting was computed with.
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Raw (un-expanded) line text.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// The visible window of one row: tab-expanded, then sliced to the
    /// column range `[left_col, left_col + cols)`.
    ///
    /// Returns an empty string for rows past the end of the content.
    #[must_use]
    pub fn window(&self, row: usize, left_col: usize, cols: usize) -> String {
        let Some(line) = self.line(row) else {
            return String::new();
        };
        expand_tabs(line, self.tab_stop)
            .chars()
            .skip(left_col)
            .take(cols)
            .collect()
    }
}

fn push_line(lines: &mut Vec<String>, raw: &[u8], tab_stop: usize) -> usize {
    let text = match String::from_utf8_lossy(raw) {
        Cow::Borrowed(s) => s.to_owned(),
        Cow::Owned(s) => s,
    };
    let width = expanded_width(&text, tab_stop);
    lines.push(text);
    width
}

/// Tab-expanded column count of a line.
#[must_use]
pub fn expanded_width(line: &str, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            col += tab_stop - (col % tab_stop);
        } else {
            col += 1;
        }
    }
    col
}

/// Expand tabs to spaces at multiples of `tab_stop`.
#[must_use]
pub fn expand_tabs(line: &str, tab_stop: usize) -> String {
    let tab_stop = tab_stop.max(1);
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = tab_stop - (col % tab_stop);
            for _ in 0..pad {
                out.push(' ');
            }
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}
