//! KeyTranslator: stateful key -> Action translation.
//!
//! State machine:
//! * Idle: a printable key inserts itself; `Esc` arms the meta prefix; any
//!   other key is looked up as a chord.
//! * Meta armed: the next key is looked up as `M-<key>` (`Esc <` == `M-<`).
//! * Pending prefix: keys are appended to the pending chord (`C-x` then
//!   `C-s` looks up `"C-x C-s"`) until the sequence resolves or is unbound.
//! * `C-g` cancels any pending state.
//!
//! While a minibuffer prompt is active keys edit the answer instead.

use crate::{Action, EditKind, Keymap};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Action(Action),
    /// A prefix is waiting for more keys; carries the echo text (`"C-x-"`).
    Pending(String),
    /// The sequence resolved to nothing.
    Unbound(String),
}

#[derive(Debug)]
pub struct KeyTranslator {
    keymap: Keymap,
    pending: Option<String>,
    meta: bool,
}

impl Default for KeyTranslator {
    fn default() -> Self {
        Self::new(Keymap::emacs())
    }
}

impl KeyTranslator {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            pending: None,
            meta: false,
        }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.meta = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some() || self.meta
    }

    pub fn translate(&mut self, key: &KeyEvent, prompt_active: bool) -> Translation {
        if prompt_active {
            self.reset();
            return translate_prompt_key(key);
        }
        if *key == KeyEvent::ctrl('g') {
            self.reset();
            return Translation::Action(Action::Cancel);
        }
        if !self.is_pending() {
            if key.code == KeyCode::Esc && key.mods.is_empty() {
                self.meta = true;
                return Translation::Pending("ESC-".to_string());
            }
            if let Some(c) = key.printable() {
                return Translation::Action(Action::Edit(EditKind::InsertChar(c)));
            }
        }

        let mut key = *key;
        if std::mem::take(&mut self.meta) {
            key.mods |= KeyModifiers::ALT;
        }
        let chord = match self.pending.take() {
            Some(prefix) => format!("{prefix} {key}"),
            None => key.to_string(),
        };
        trace!(target: "actions.translate", chord = %chord, "lookup");
        if let Some(action) = self.keymap.lookup(&chord) {
            return Translation::Action(action.clone());
        }
        if self.keymap.is_prefix(&chord) {
            let echo = format!("{chord}-");
            self.pending = Some(chord);
            return Translation::Pending(echo);
        }
        Translation::Unbound(chord)
    }
}

fn translate_prompt_key(key: &KeyEvent) -> Translation {
    if let Some(c) = key.printable() {
        return Translation::Action(Action::PromptChar(c));
    }
    let action = match (key.code, key.mods.contains(KeyModifiers::CTRL)) {
        (KeyCode::Enter, _) | (KeyCode::Char('m'), true) => Action::PromptSubmit,
        (KeyCode::Backspace, _) | (KeyCode::Char('h'), true) => Action::PromptBackspace,
        (KeyCode::Tab, _) => Action::PromptChar('\t'),
        (KeyCode::Esc, _) | (KeyCode::Char('g'), true) => Action::Cancel,
        _ => return Translation::Unbound(key.to_string()),
    };
    Translation::Action(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MotionKind;

    #[test]
    fn printable_inserts_when_idle() {
        let mut t = KeyTranslator::default();
        assert_eq!(
            t.translate(&KeyEvent::plain('q'), false),
            Translation::Action(Action::Edit(EditKind::InsertChar('q')))
        );
    }

    #[test]
    fn escape_acts_as_meta() {
        let mut t = KeyTranslator::default();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::empty());
        assert_eq!(t.translate(&esc, false), Translation::Pending("ESC-".into()));
        assert_eq!(
            t.translate(&KeyEvent::plain('<'), false),
            Translation::Action(Action::Motion(MotionKind::BufferTop))
        );
        assert!(!t.is_pending());
    }

    #[test]
    fn printable_after_prefix_is_a_chord() {
        let mut t = KeyTranslator::default();
        assert_eq!(
            t.translate(&KeyEvent::ctrl('x'), false),
            Translation::Pending("C-x-".into())
        );
        assert_eq!(
            t.translate(&KeyEvent::plain('2'), false),
            Translation::Action(Action::SplitWindow)
        );
    }

    #[test]
    fn unbound_sequence_resets() {
        let mut t = KeyTranslator::default();
        t.translate(&KeyEvent::ctrl('x'), false);
        assert_eq!(
            t.translate(&KeyEvent::plain('z'), false),
            Translation::Unbound("C-x z".into())
        );
        assert!(!t.is_pending());
    }

    #[test]
    fn ctrl_g_cancels_prefix() {
        let mut t = KeyTranslator::default();
        t.translate(&KeyEvent::ctrl('x'), false);
        assert_eq!(
            t.translate(&KeyEvent::ctrl('g'), false),
            Translation::Action(Action::Cancel)
        );
        assert!(!t.is_pending());
    }

    #[test]
    fn prompt_keys_edit_the_answer() {
        let mut t = KeyTranslator::default();
        assert_eq!(
            t.translate(&KeyEvent::plain('a'), true),
            Translation::Action(Action::PromptChar('a'))
        );
        assert_eq!(
            t.translate(&KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()), true),
            Translation::Action(Action::PromptSubmit)
        );
        assert_eq!(
            t.translate(&KeyEvent::ctrl('g'), true),
            Translation::Action(Action::Cancel)
        );
    }
}
