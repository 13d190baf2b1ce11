//! Chord keymap.
//!
//! Chords are written the way `KeyEvent`'s `Display` renders keys, with
//! multi-key sequences separated by single spaces: `"C-f"`, `"M-<"`,
//! `"C-x C-s"`. Every leading part of a multi-key sequence is a prefix;
//! a prefix cannot also be bound to an action.

use crate::{Action, EditKind, MotionKind};
use core_state::PromptKind;
use std::collections::{HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<String, Action>,
    prefixes: HashSet<String>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default emacs-style bindings.
    pub fn emacs() -> Self {
        use Action::*;
        use MotionKind as M;
        let table: Vec<(&str, Action)> = vec![
            ("C-f", Motion(M::Right)),
            ("<right>", Motion(M::Right)),
            ("C-b", Motion(M::Left)),
            ("<left>", Motion(M::Left)),
            ("C-n", Motion(M::Down)),
            ("<down>", Motion(M::Down)),
            ("C-p", Motion(M::Up)),
            ("<up>", Motion(M::Up)),
            ("C-a", Motion(M::LineStart)),
            ("<home>", Motion(M::LineStart)),
            ("C-e", Motion(M::LineEnd)),
            ("<end>", Motion(M::LineEnd)),
            ("M-<", Motion(M::BufferTop)),
            ("M->", Motion(M::BufferBottom)),
            ("C-v", Motion(M::PageDown)),
            ("<next>", Motion(M::PageDown)),
            ("M-v", Motion(M::PageUp)),
            ("<prior>", Motion(M::PageUp)),
            ("RET", Edit(EditKind::Newline)),
            ("C-j", Edit(EditKind::Newline)),
            ("TAB", Edit(EditKind::InsertChar('\t'))),
            ("DEL", Edit(EditKind::Backspace)),
            ("C-h", Edit(EditKind::Backspace)),
            ("C-d", Edit(EditKind::DeleteForward)),
            ("<delete>", Edit(EditKind::DeleteForward)),
            ("C-k", Edit(EditKind::KillLine)),
            ("C-y", Edit(EditKind::Yank)),
            ("C-l", Redraw),
            ("C-g", Cancel),
            ("C-x C-s", SaveBuffer),
            ("C-x C-f", Prompt(PromptKind::FindFile)),
            ("C-x C-w", Prompt(PromptKind::WriteFile)),
            ("C-x b", Prompt(PromptKind::SwitchBuffer)),
            ("C-x n", NextBuffer),
            ("C-x k", KillBuffer),
            ("C-x 2", SplitWindow),
            ("C-x 1", DeleteOtherWindows),
            ("C-x o", OtherWindow),
            ("C-x C-d", DumpPieces),
            ("C-x C-c", Quit),
        ];
        let mut km = Self::new();
        for (chord, action) in table {
            km.bind(chord, action);
        }
        km
    }

    /// Bind `chord`, replacing any previous binding. Binding a chord that is
    /// already a prefix of a longer sequence is refused.
    pub fn bind(&mut self, chord: &str, action: Action) -> bool {
        if self.prefixes.contains(chord) {
            warn!(target: "actions.keymap", chord, "bind_refused_prefix");
            return false;
        }
        let parts: Vec<&str> = chord.split(' ').collect();
        for end in 1..parts.len() {
            let prefix = parts[..end].join(" ");
            self.bindings.remove(&prefix);
            self.prefixes.insert(prefix);
        }
        self.bindings.insert(chord.to_string(), action);
        true
    }

    pub fn lookup(&self, chord: &str) -> Option<&Action> {
        self.bindings.get(chord)
    }

    pub fn is_prefix(&self, chord: &str) -> bool {
        self.prefixes.contains(chord)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// `(chord, action)` pairs sorted by chord.
    pub fn bindings(&self) -> Vec<(&str, &Action)> {
        let mut out: Vec<_> = self
            .bindings
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}
