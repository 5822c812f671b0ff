#![forbid(unsafe_code)]

//! vigil — a scrollable watch command.
//!
//! Periodically re-runs a shell command, captures its merged stdout+stderr
//! into a bounded buffer, lays the text out as a rectangular grid, and
//! presents it through a pager-style viewport:
//! 1. **Bounded capture** — one child process at a time, hard byte cap,
//!    wall-clock timeout with a fixed diagnostic on expiry
//! 2. **Grid layout** — tab-aware column accounting so scroll bounds match
//!    what the terminal paints
//! 3. **Viewport + navigation** — scroll/page/jump operations and a modal
//!    goto-line entry mode, all re-clamped across refresh and resize
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use vigil::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use vigil::grid::ContentGrid;
//! use vigil::view::viewport::ViewportState;
//! ```

pub mod prelude;

pub mod capture;
pub mod core;
pub mod grid;
pub mod logger;
pub mod render;
pub mod view;
pub mod watch;
