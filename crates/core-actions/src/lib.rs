//! Editor commands: the `Action` vocabulary, the chord keymap, the stateful
//! key translator and the dispatcher that applies actions to an
//! `EditorModel`.
//!
//! Flow per key: `KeyTranslator::translate` resolves prefixes (`C-x`, `Esc`)
//! and looks the chord up in the `Keymap`; `dispatch` mutates the model and
//! reports whether the screen needs a redraw or the editor should exit.

pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;
pub mod keymap;

pub use dispatcher::{DispatchResult, dispatch, find_file, handle_input, handle_key};
pub use key_translator::{KeyTranslator, Translation};
pub use keymap::Keymap;

use core_state::PromptKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    Edit(EditKind),
    /// Point to the cell under a mouse click.
    MouseClick { column: u16, row: u16 },
    /// Mouse wheel; positive moves towards the end of the buffer.
    Scroll(i32),
    Resize { cols: u16, rows: u16 },
    SaveBuffer,
    /// Open a minibuffer prompt.
    Prompt(PromptKind),
    PromptChar(char),
    PromptBackspace,
    PromptSubmit,
    NextBuffer,
    KillBuffer,
    SplitWindow,
    DeleteOtherWindows,
    OtherWindow,
    /// Reframe the current window around the point.
    Redraw,
    /// Abort a prefix or prompt.
    Cancel,
    /// Write the current piece table to the log.
    DumpPieces,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    BufferTop,
    BufferBottom,
    PageDown,
    PageUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    InsertText(String),
    Newline,
    Backspace,
    DeleteForward,
    /// Remove to end of line (the newline itself when already there) into the scrap.
    KillLine,
    /// Insert the scrap at the point.
    Yank,
}

impl Action {
    /// Variant name for logs; never includes buffer text.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Motion(_) => "motion",
            Action::Edit(_) => "edit",
            Action::MouseClick { .. } => "mouse_click",
            Action::Scroll(_) => "scroll",
            Action::Resize { .. } => "resize",
            Action::SaveBuffer => "save_buffer",
            Action::Prompt(_) => "prompt",
            Action::PromptChar(_) => "prompt_char",
            Action::PromptBackspace => "prompt_backspace",
            Action::PromptSubmit => "prompt_submit",
            Action::NextBuffer => "next_buffer",
            Action::KillBuffer => "kill_buffer",
            Action::SplitWindow => "split_window",
            Action::DeleteOtherWindows => "delete_other_windows",
            Action::OtherWindow => "other_window",
            Action::Redraw => "redraw",
            Action::Cancel => "cancel",
            Action::DumpPieces => "dump_pieces",
            Action::Quit => "quit",
        }
    }
}
