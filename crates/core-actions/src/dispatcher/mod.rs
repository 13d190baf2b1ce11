//! Dispatcher applying `Action` to the editor model.
//!
//! Sub-modules:
//! * `motion` - point movement
//! * `edit`   - text mutation, kill and yank
//! * `files`  - saving, the minibuffer prompt and buffer switching
//!
//! Window commands are small enough to live here.

use crate::{Action, KeyTranslator, MotionKind, Translation};
use core_events::{InputEvent, KeyEvent, MouseButton, MouseEventKind};
use core_model::EditorModel;
use tracing::{debug, info, trace};

mod edit;
mod files;
mod motion;

pub use files::find_file;

/// Lines moved per mouse wheel notch.
pub const SCROLL_LINES: i32 = 3;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }
}

/// Apply an action to the model. Returns whether a render is needed
/// (`dirty`) or the editor should exit (`quit`).
pub fn dispatch(action: Action, model: &mut EditorModel) -> DispatchResult {
    trace!(target: "actions.dispatch", action = action.label(), "dispatch");
    if action != Action::Quit {
        model.state_mut().quit_armed = false;
    }
    match action {
        Action::Motion(kind) => motion::handle_motion(kind, model),
        Action::Edit(kind) => edit::handle_edit(kind, model),
        Action::MouseClick { column, row } => {
            model.set_point_for_mouse(column, row);
            DispatchResult::dirty()
        }
        Action::Scroll(lines) => {
            let kind = if lines < 0 {
                MotionKind::Up
            } else {
                MotionKind::Down
            };
            for _ in 0..lines.unsigned_abs() {
                motion::handle_motion(kind, model);
            }
            DispatchResult::dirty()
        }
        Action::Resize { cols, rows } => {
            model.resize(cols, rows);
            DispatchResult::dirty()
        }
        Action::SaveBuffer => files::save_buffer(model),
        Action::Prompt(kind) => files::start_prompt(kind, model),
        Action::PromptChar(c) => {
            if let Some(p) = model.state_mut().prompt.as_mut() {
                p.response.push(c);
            }
            DispatchResult::dirty()
        }
        Action::PromptBackspace => {
            if let Some(p) = model.state_mut().prompt.as_mut() {
                p.response.pop();
            }
            DispatchResult::dirty()
        }
        Action::PromptSubmit => files::submit_prompt(model),
        Action::NextBuffer => {
            model.next_buffer();
            DispatchResult::dirty()
        }
        Action::KillBuffer => files::kill_buffer(model),
        Action::SplitWindow => {
            if model.split_window().is_none() {
                model.state_mut().set_message("Window too small to split");
            }
            DispatchResult::dirty()
        }
        Action::DeleteOtherWindows => {
            model.delete_other_windows();
            DispatchResult::dirty()
        }
        Action::OtherWindow => {
            model.other_window();
            DispatchResult::dirty()
        }
        Action::Redraw => {
            model.state_mut().current_buffer_mut().reframe = true;
            model.parts_mut().1.mark_all_updated();
            DispatchResult::dirty()
        }
        Action::Cancel => {
            let state = model.state_mut();
            state.prompt = None;
            state.set_message("Quit");
            DispatchResult::dirty()
        }
        Action::DumpPieces => {
            let state = model.state_mut();
            state.current_buffer().table().dump();
            let pieces = state.current_buffer().table().pieces().len();
            state.set_message(format!("{pieces} pieces written to the log"));
            DispatchResult::dirty()
        }
        Action::Quit => quit(model),
    }
}

/// Exit, unless modified buffers exist and this is the first request.
fn quit(model: &mut EditorModel) -> DispatchResult {
    let state = model.state_mut();
    if state.any_modified() && !state.quit_armed {
        state.quit_armed = true;
        state.set_message("Modified buffers exist; C-x C-c again to quit");
        return DispatchResult::dirty();
    }
    state.done = true;
    info!(target: "actions.dispatch", "quit");
    DispatchResult::quit()
}

/// Translate one key and dispatch the result. Pending prefixes are echoed on
/// the message line; unbound sequences are reported there.
pub fn handle_key(
    translator: &mut KeyTranslator,
    model: &mut EditorModel,
    key: &KeyEvent,
) -> DispatchResult {
    let prompt_active = model.state().prompt.is_some();
    match translator.translate(key, prompt_active) {
        Translation::Action(action) => {
            if !prompt_active {
                model.state_mut().clear_message();
            }
            dispatch(action, model)
        }
        Translation::Pending(echo) => {
            model.state_mut().set_message(echo);
            DispatchResult::dirty()
        }
        Translation::Unbound(chord) => {
            debug!(target: "actions.dispatch", chord = %chord, "unbound");
            model.state_mut().set_message(format!("{chord} is undefined"));
            DispatchResult::dirty()
        }
    }
}

/// Apply one input event: keys go through the translator, mouse and resize
/// events map straight to actions.
pub fn handle_input(
    translator: &mut KeyTranslator,
    model: &mut EditorModel,
    event: InputEvent,
) -> DispatchResult {
    match event {
        InputEvent::Key(key) => handle_key(translator, model, &key),
        InputEvent::Resize(cols, rows) => dispatch(Action::Resize { cols, rows }, model),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                translator.reset();
                dispatch(
                    Action::MouseClick {
                        column: m.column,
                        row: m.row,
                    },
                    model,
                )
            }
            MouseEventKind::ScrollUp => dispatch(Action::Scroll(-SCROLL_LINES), model),
            MouseEventKind::ScrollDown => dispatch(Action::Scroll(SCROLL_LINES), model),
            _ => DispatchResult::clean(),
        },
        InputEvent::Paste(text) => {
            if model.state().prompt.is_some() {
                let mut result = DispatchResult::clean();
                for c in text.chars().filter(|c| !c.is_control()) {
                    result = dispatch(Action::PromptChar(c), model);
                }
                result
            } else {
                dispatch(Action::Edit(crate::EditKind::InsertText(text)), model)
            }
        }
        InputEvent::Error(msg) => {
            tracing::error!(target: "actions.dispatch", error = %msg, "input_error");
            model.state_mut().done = true;
            DispatchResult::quit()
        }
    }
}
