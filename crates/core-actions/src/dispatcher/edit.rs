//! Text edits at the point.
//!
//! Every edit goes through the `Buffer` entry points, which clamp offsets
//! before touching the piece table. After a change, other windows showing
//! the same buffer are flagged for redraw.

use super::DispatchResult;
use crate::EditKind;
use core_model::EditorModel;
use core_state::EditorState;
use core_text::TextError;
use tracing::{error, trace};

pub(crate) fn handle_edit(kind: EditKind, model: &mut EditorModel) -> DispatchResult {
    let state = model.state_mut();
    let outcome = match kind {
        EditKind::InsertChar(c) => state.current_buffer_mut().insert_char(c).map(|_| true),
        EditKind::InsertText(text) => {
            trace!(target: "actions.dispatch", op = "insert_text", len = text.len(), "edit");
            state.current_buffer_mut().insert(&text).map(|_| !text.is_empty())
        }
        EditKind::Newline => state.current_buffer_mut().insert_char('\n').map(|_| true),
        EditKind::Backspace => state.current_buffer_mut().backspace().map(|removed| {
            if removed.is_none() {
                state.set_message("Beginning of buffer");
            }
            removed.is_some()
        }),
        EditKind::DeleteForward => state.current_buffer_mut().delete_forward().map(|removed| {
            if removed.is_none() {
                state.set_message("End of buffer");
            }
            removed.is_some()
        }),
        EditKind::KillLine => kill_line(state),
        EditKind::Yank => {
            if state.scrap.is_empty() {
                state.set_message("Scrap is empty");
                Ok(false)
            } else {
                let scrap = state.scrap.clone();
                state.current_buffer_mut().insert(&scrap).map(|_| true)
            }
        }
    };
    match outcome {
        Ok(true) => {
            model.mark_buffer_updated();
            DispatchResult::dirty()
        }
        Ok(false) => DispatchResult::dirty(),
        Err(e) => {
            error!(target: "actions.dispatch", error = %e, "edit_failed");
            model.state_mut().set_message(format!("{e:#}"));
            DispatchResult::dirty()
        }
    }
}

/// Kill to the end of the line; at the end of a line kill the newline.
fn kill_line(state: &mut EditorState) -> Result<bool, TextError> {
    let buf = state.current_buffer_mut();
    let start = buf.point();
    let mut end = buf.line_end(start);
    if end == start {
        end = (start + 1).min(buf.len());
    }
    if end == start {
        state.set_message("End of buffer");
        return Ok(false);
    }
    let removed = buf.delete_range(start, end)?;
    trace!(target: "actions.dispatch", op = "kill_line", len = removed.chars().count(), "edit");
    state.scrap = removed;
    Ok(true)
}
