#![allow(dead_code)] // Each test binary uses a subset of helpers.

use core_actions::{DispatchResult, KeyTranslator, handle_key};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_model::EditorModel;
use core_state::EditorState;
use core_text::Buffer;

pub fn model(text: &str, cols: u16, rows: u16) -> EditorModel {
    let mut state = EditorState::new(Buffer::from_str("main", text).unwrap());
    state.resize(cols, rows);
    EditorModel::new(state)
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

/// Feed keys through the translator, returning the last dispatch result.
pub fn press(t: &mut KeyTranslator, m: &mut EditorModel, keys: &[KeyEvent]) -> DispatchResult {
    let mut last = DispatchResult::clean();
    for k in keys {
        last = handle_key(t, m, k);
    }
    last
}

/// Type printable text one key at a time.
pub fn type_str(t: &mut KeyTranslator, m: &mut EditorModel, text: &str) {
    for c in text.chars() {
        handle_key(t, m, &KeyEvent::plain(c));
    }
}

pub fn contents(m: &EditorModel) -> String {
    m.state().current_buffer().contents()
}

pub fn point(m: &EditorModel) -> usize {
    m.state().current_buffer().point()
}

pub fn message(m: &EditorModel) -> Option<String> {
    m.state().message_line()
}
