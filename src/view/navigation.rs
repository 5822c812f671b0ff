//! Navigation state machine: discrete key events against two input modes.
//!
//! `Normal` routes keys straight to viewport operations. `GotoLine` is a
//! numeric-entry sub-mode created by the first digit keypress and destroyed
//! by any non-digit, non-backspace key — which either commits the jump or
//! (Esc) abandons it. The terminating key is consumed by the mode exit and
//! never double-dispatched as a navigation command.

#![allow(missing_docs)]

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::view::viewport::ViewportState;

/// Entered line numbers saturate here; further digits are refused so a
/// hostile paste cannot overflow the accumulator.
pub const GOTO_LINE_CAP: u64 = 200_000_000;

/// Discrete input events the state machine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// Digit key `0`-`9`.
    Digit(u8),
    Backspace,
    Escape,
    Quit,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    FarLeft,
    FarRight,
    Help,
    ForceRefresh,
    /// Any key with no binding.
    Other,
}

impl NavEvent {
    /// Map a terminal key event to a navigation event. Returns `None` for
    /// non-press events (key repeat releases on some platforms).
    #[must_use]
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Self::Quit),
                _ => Some(Self::Other),
            };
        }
        let event = match key.code {
            KeyCode::Char(c @ '0'..='9') => Self::Digit(c as u8 - b'0'),
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Esc => Self::Escape,
            KeyCode::Char('q') => Self::Quit,
            KeyCode::Up | KeyCode::Char('w') => Self::Up,
            KeyCode::Down | KeyCode::Char('s') => Self::Down,
            KeyCode::Left | KeyCode::Char('a') => Self::Left,
            KeyCode::Right | KeyCode::Char('d') => Self::Right,
            KeyCode::PageUp | KeyCode::Char('b') => Self::PageUp,
            KeyCode::PageDown | KeyCode::Char('n') => Self::PageDown,
            KeyCode::Home | KeyCode::Char('h') => Self::Home,
            KeyCode::End | KeyCode::Char('e') => Self::End,
            KeyCode::Char('<' | 'z') => Self::FarLeft,
            KeyCode::Char('>' | 'x') => Self::FarRight,
            KeyCode::F(1) | KeyCode::Char('?') => Self::Help,
            KeyCode::F(5) | KeyCode::Char('r') => Self::ForceRefresh,
            _ => Self::Other,
        };
        Some(event)
    }
}

/// Current input mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Plain navigation.
    Normal,
    /// Numeric line entry. `digits` is the raw string shown in the prompt;
    /// `value` is its parsed form.
    GotoLine {
        /// Digits typed so far (no leading zeros).
        digits: String,
        /// Accumulated value, capped at [`GOTO_LINE_CAP`].
        value: u64,
    },
}

/// Effect of one handled event, for the loop to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing beyond (possibly) a viewport mutation.
    Continue,
    /// Terminate the program.
    Quit,
    /// Open the help overlay.
    Help,
    /// Re-run the command immediately.
    ForceRefresh,
    /// Unrecognized key: ring the bell.
    Bell,
}

/// The state machine. Owns the mode; mutates the viewport it is handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    mode: InputMode,
}

impl Navigator {
    /// Start in `Normal` mode.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: InputMode::Normal,
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> &InputMode {
        &self.mode
    }

    /// Whether plain navigation is active (refresh is only permitted then).
    #[must_use]
    pub const fn is_normal(&self) -> bool {
        matches!(self.mode, InputMode::Normal)
    }

    /// Digit string for the goto-line prompt, when that mode is active.
    #[must_use]
    pub fn goto_digits(&self) -> Option<&str> {
        match &self.mode {
            InputMode::Normal => None,
            InputMode::GotoLine { digits, .. } => Some(digits),
        }
    }

    /// Feed one event through the machine.
    pub fn handle(&mut self, event: NavEvent, view: &mut ViewportState) -> Outcome {
        if self.is_normal() {
            self.handle_normal(event, view)
        } else {
            self.handle_goto(event, view)
        }
    }

    fn handle_normal(&mut self, event: NavEvent, view: &mut ViewportState) -> Outcome {
        match event {
            // A leading zero is meaningless as a line number; ignore it.
            NavEvent::Digit(0) => Outcome::Continue,
            NavEvent::Digit(d) => {
                self.mode = InputMode::GotoLine {
                    digits: d.to_string(),
                    value: u64::from(d),
                };
                Outcome::Continue
            }
            NavEvent::Up => {
                view.scroll_up(1);
                Outcome::Continue
            }
            NavEvent::Down => {
                view.scroll_down(1);
                Outcome::Continue
            }
            NavEvent::Left => {
                view.scroll_left(1);
                Outcome::Continue
            }
            NavEvent::Right => {
                view.scroll_right(1);
                Outcome::Continue
            }
            NavEvent::PageUp => {
                view.page_up();
                Outcome::Continue
            }
            NavEvent::PageDown => {
                view.page_down();
                Outcome::Continue
            }
            NavEvent::Home => {
                view.jump_home();
                Outcome::Continue
            }
            NavEvent::End => {
                view.jump_end();
                Outcome::Continue
            }
            NavEvent::FarLeft => {
                view.far_left();
                Outcome::Continue
            }
            NavEvent::FarRight => {
                view.far_right();
                Outcome::Continue
            }
            NavEvent::Help => Outcome::Help,
            NavEvent::ForceRefresh => Outcome::ForceRefresh,
            NavEvent::Escape | NavEvent::Quit => Outcome::Quit,
            NavEvent::Backspace | NavEvent::Other => Outcome::Bell,
        }
    }

    fn handle_goto(&mut self, event: NavEvent, view: &mut ViewportState) -> Outcome {
        let InputMode::GotoLine { digits, value } = &mut self.mode else {
            unreachable!("handle_goto called outside goto-line mode");
        };

        match event {
            NavEvent::Digit(0) if *value == 0 => Outcome::Continue,
            NavEvent::Digit(d) => {
                if *value < GOTO_LINE_CAP {
                    *value = *value * 10 + u64::from(d);
                    digits.push(char::from(b'0' + d));
                }
                Outcome::Continue
            }
            NavEvent::Backspace => {
                if *value != 0 {
                    *value /= 10;
                    digits.pop();
                }
                Outcome::Continue
            }
            NavEvent::Escape => {
                self.mode = InputMode::Normal;
                Outcome::Continue
            }
            _ => {
                // Commit: jump if anything was entered; the terminating key
                // is consumed by the mode exit either way.
                let target = *value;
                self.mode = InputMode::Normal;
                if target > 0 {
                    view.jump_to_line(usize::try_from(target).unwrap_or(usize::MAX));
                }
                Outcome::Continue
            }
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
