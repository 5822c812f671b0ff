//! Property tests for the scroll-bounds arithmetic: no sequence of
//! navigation commands, refreshes, or resizes may ever move the viewport
//! outside its clamped ranges.

use proptest::prelude::*;

use vigil::view::navigation::{NavEvent, Navigator};
use vigil::view::viewport::ViewportState;

/// One step of an arbitrary interaction sequence.
#[derive(Debug, Clone)]
enum Step {
    Nav(NavEvent),
    Refresh { height: usize, width: usize },
    Resize { rows: usize, cols: usize },
}

fn arb_nav_event() -> impl Strategy<Value = NavEvent> {
    prop_oneof![
        (0u8..=9).prop_map(NavEvent::Digit),
        Just(NavEvent::Backspace),
        Just(NavEvent::Escape),
        Just(NavEvent::Up),
        Just(NavEvent::Down),
        Just(NavEvent::Left),
        Just(NavEvent::Right),
        Just(NavEvent::PageUp),
        Just(NavEvent::PageDown),
        Just(NavEvent::Home),
        Just(NavEvent::End),
        Just(NavEvent::FarLeft),
        Just(NavEvent::FarRight),
        Just(NavEvent::Other),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        5 => arb_nav_event().prop_map(Step::Nav),
        1 => (1usize..500, 1usize..500)
            .prop_map(|(height, width)| Step::Refresh { height, width }),
        1 => (2usize..120, 2usize..250).prop_map(|(rows, cols)| Step::Resize { rows, cols }),
    ]
}

/// The invariants every mutation must uphold. `jump_end` may park one row
/// past the flush-bottom position for short content, which `max_top`
/// already accounts for; nothing may exceed it.
fn assert_view_invariants(view: &ViewportState) {
    assert!(
        view.top_row() <= view.max_top(),
        "top_row {} escaped bound {} (content {} x {}, visible {} x {})",
        view.top_row(),
        view.max_top(),
        view.content_height(),
        view.content_width(),
        view.visible_rows(),
        view.visible_cols(),
    );
    assert!(
        view.left_col() <= view.max_left(),
        "left_col {} escaped bound {}",
        view.left_col(),
        view.max_left(),
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Arbitrary interaction sequences keep the viewport inside its bounds.
    #[test]
    fn navigation_never_escapes_bounds(
        lineno in any::<bool>(),
        steps in prop::collection::vec(arb_step(), 1..80)
    ) {
        let mut view = ViewportState::new(24, 80, lineno);
        view.on_refresh(1, 1);
        let mut nav = Navigator::new();

        for step in steps {
            match step {
                Step::Nav(event) => {
                    let _ = nav.handle(event, &mut view);
                }
                Step::Refresh { height, width } => view.on_refresh(height, width),
                Step::Resize { rows, cols } => view.on_resize(rows, cols),
            }
            assert_view_invariants(&view);
        }
    }

    /// Repeated scroll_down saturates exactly at the bound.
    #[test]
    fn scroll_down_saturates(
        height in 1usize..1000,
        rows in 2usize..100,
        presses in 1usize..2000
    ) {
        let mut view = ViewportState::new(rows, 80, false);
        view.on_refresh(height, 10);
        for _ in 0..presses {
            view.scroll_down(1);
        }
        let expected = (height + 1).saturating_sub(rows).min(presses);
        prop_assert_eq!(view.top_row(), expected);
    }

    /// Content that fits the viewport pins top_row to zero on refresh.
    #[test]
    fn short_content_refresh_pins_top(
        height in 1usize..100,
        rows in 1usize..100,
        scrolls in 0usize..50
    ) {
        prop_assume!(height <= rows);
        let mut view = ViewportState::new(rows, 80, false);
        view.on_refresh(1000, 10);
        for _ in 0..scrolls {
            view.scroll_down(3);
        }
        view.on_refresh(height, 10);
        prop_assert_eq!(view.top_row(), 0);
    }

    /// jump_to_line is idempotent for any line/content combination.
    #[test]
    fn jump_to_line_is_idempotent(
        line in 1usize..100_000,
        height in 1usize..5000,
        rows in 2usize..100
    ) {
        let mut view = ViewportState::new(rows, 80, false);
        view.on_refresh(height, 10);
        view.jump_to_line(line);
        let first = view.top_row();
        view.jump_to_line(line);
        prop_assert_eq!(view.top_row(), first);
    }

    /// A resize wider than the display always snaps left_col to zero.
    #[test]
    fn wide_resize_forces_left_zero(
        width in 1usize..200,
        scrolls in 0usize..300
    ) {
        let mut view = ViewportState::new(24, 40, false);
        view.on_refresh(10, width);
        for _ in 0..scrolls {
            view.scroll_right(1);
        }
        view.on_resize(24, width + 1);
        prop_assert_eq!(view.left_col(), 0);
    }

    /// The goto-line accumulator mirrors its digit string exactly (short
    /// sequences stay below the saturation cap).
    #[test]
    fn goto_digits_match_value(digits in prop::collection::vec(0u8..=9, 1..9)) {
        let mut view = ViewportState::new(24, 80, false);
        view.on_refresh(100, 10);
        let mut nav = Navigator::new();

        for &d in &digits {
            nav.handle(NavEvent::Digit(d), &mut view);
        }
        match nav.goto_digits() {
            None => {
                // Only possible when every digit was a leading zero.
                prop_assert!(digits.iter().all(|&d| d == 0));
            }
            Some(text) => {
                let expected: String = digits
                    .iter()
                    .skip_while(|&&d| d == 0)
                    .map(|&d| char::from(b'0' + d))
                    .collect();
                prop_assert_eq!(text, expected.as_str());
            }
        }
    }
}
