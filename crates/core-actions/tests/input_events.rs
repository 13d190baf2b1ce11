mod common;

use common::*;
use core_actions::{KeyTranslator, handle_input};
use core_events::{InputEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pretty_assertions::assert_eq;

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> InputEvent {
    InputEvent::Mouse(MouseEvent {
        kind,
        column,
        row,
        mods: KeyModifiers::empty(),
    })
}

#[test]
fn left_click_moves_point_and_clears_prefix() {
    let mut t = KeyTranslator::default();
    let mut m = model("aaa\nbbb\nccc\n", 20, 8);
    press(&mut t, &mut m, &[core_events::KeyEvent::ctrl('x')]);
    assert!(t.is_pending());
    let r = handle_input(&mut t, &mut m, mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));
    assert!(r.dirty);
    assert!(!t.is_pending());
    assert_eq!(point(&m), 5);
}

#[test]
fn click_past_line_end_clamps() {
    let mut t = KeyTranslator::default();
    let mut m = model("aaa\nb\n", 20, 8);
    handle_input(&mut t, &mut m, mouse(MouseEventKind::Down(MouseButton::Left), 15, 1));
    assert_eq!(point(&m), 5);
}

#[test]
fn wheel_moves_three_lines() {
    let text: String = (0..10).map(|i| format!("l{i}\n")).collect();
    let mut t = KeyTranslator::default();
    let mut m = model(&text, 20, 8);
    handle_input(&mut t, &mut m, mouse(MouseEventKind::ScrollDown, 0, 0));
    assert_eq!(point(&m), 9);
    handle_input(&mut t, &mut m, mouse(MouseEventKind::ScrollUp, 0, 0));
    assert_eq!(point(&m), 0);
}

#[test]
fn other_mouse_events_are_ignored() {
    let mut t = KeyTranslator::default();
    let mut m = model("abc", 20, 8);
    let r = handle_input(&mut t, &mut m, mouse(MouseEventKind::Moved, 2, 0));
    assert!(!r.dirty);
    assert_eq!(point(&m), 0);
}

#[test]
fn paste_inserts_as_one_edit() {
    let mut t = KeyTranslator::default();
    let mut m = model("", 20, 8);
    handle_input(&mut t, &mut m, InputEvent::Paste("one\ntwo".into()));
    assert_eq!(contents(&m), "one\ntwo");
    assert_eq!(point(&m), 7);
}

#[test]
fn paste_into_prompt_drops_control_chars() {
    let mut t = KeyTranslator::default();
    let mut m = model("", 40, 8);
    m.state_mut().prompt = Some(core_state::Prompt::new(core_state::PromptKind::SwitchBuffer));
    handle_input(&mut t, &mut m, InputEvent::Paste("ab\ncd".into()));
    assert_eq!(
        m.state().prompt.as_ref().map(|p| p.response.as_str()),
        Some("abcd")
    );
    assert_eq!(contents(&m), "");
}

#[test]
fn resize_updates_dimensions() {
    let mut t = KeyTranslator::default();
    let mut m = model("abc", 20, 8);
    handle_input(&mut t, &mut m, InputEvent::Resize(50, 12));
    assert_eq!((m.state().cols, m.state().rows), (50, 12));
}

#[test]
fn input_error_ends_the_session() {
    let mut t = KeyTranslator::default();
    let mut m = model("abc", 20, 8);
    let r = handle_input(&mut t, &mut m, InputEvent::Error("boom".into()));
    assert!(r.quit);
    assert!(m.state().done);
    assert_eq!(contents(&m), "abc");
}
