//! Terminal output: lifecycle guard, frame painting, help overlay.

pub mod frame;
pub mod guard;
pub mod help;

pub use frame::{Frame, bell, draw};
pub use guard::TerminalGuard;
pub use help::draw_help;
