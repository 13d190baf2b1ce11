//! Saving, the minibuffer prompt and buffer switching.

use super::DispatchResult;
use crate::io_ops::{self, WriteFileResult};
use core_model::EditorModel;
use core_state::{Prompt, PromptKind};
use std::path::Path;
use tracing::{debug, warn};

pub(crate) fn save_buffer(model: &mut EditorModel) -> DispatchResult {
    let state = model.state_mut();
    match io_ops::write_file(state.current_buffer_mut(), None) {
        Ok(WriteFileResult::Success(bytes)) => {
            let name = state.current_buffer().name.clone();
            state.set_message(format!("Wrote {bytes} bytes to {name}"));
            model.parts_mut().1.mark_all_updated();
            DispatchResult::dirty()
        }
        Ok(WriteFileResult::NoFilename) => start_prompt(PromptKind::WriteFile, model),
        Err(e) => {
            state.set_message(format!("{e:#}"));
            DispatchResult::dirty()
        }
    }
}

pub(crate) fn start_prompt(kind: PromptKind, model: &mut EditorModel) -> DispatchResult {
    debug!(target: "actions.prompt", ?kind, "prompt_start");
    let state = model.state_mut();
    state.clear_message();
    state.prompt = Some(Prompt::new(kind));
    DispatchResult::dirty()
}

pub(crate) fn submit_prompt(model: &mut EditorModel) -> DispatchResult {
    let Some(prompt) = model.state_mut().prompt.take() else {
        return DispatchResult::clean();
    };
    let answer = prompt.response.trim();
    debug!(target: "actions.prompt", kind = ?prompt.kind, len = answer.len(), "prompt_submit");
    match prompt.kind {
        PromptKind::FindFile if answer.is_empty() => {
            model.state_mut().set_message("No file name given");
        }
        PromptKind::FindFile => find_file(model, Path::new(answer)),
        PromptKind::WriteFile if answer.is_empty() => {
            model.state_mut().set_message("No file name given");
        }
        PromptKind::WriteFile => {
            let state = model.state_mut();
            match io_ops::write_file(state.current_buffer_mut(), Some(Path::new(answer))) {
                Ok(_) => state.set_message(format!("Wrote {answer}")),
                Err(e) => state.set_message(format!("{e:#}")),
            }
            model.parts_mut().1.mark_all_updated();
        }
        PromptKind::SwitchBuffer if answer.is_empty() => model.next_buffer(),
        PromptKind::SwitchBuffer => match model.state_mut().find_or_create(answer) {
            Ok(id) => {
                model.switch_to_buffer(id);
            }
            Err(e) => model.state_mut().set_message(format!("{e:#}")),
        },
    }
    DispatchResult::dirty()
}

/// Visit `path`: reuse a buffer already bound to it, otherwise load it into a
/// new buffer named after the file (`name<2>` on a clash).
pub fn find_file(model: &mut EditorModel, path: &Path) {
    let existing = model
        .state()
        .buffers()
        .find(|(_, b)| b.file_name.as_deref() == Some(path))
        .map(|(id, _)| id);
    if let Some(id) = existing {
        model.switch_to_buffer(id);
        return;
    }
    let mut buffer = match io_ops::open_file(path) {
        Ok(b) => b,
        Err(e) => {
            warn!(target: "actions.prompt", error = %e, "find_file_failed");
            model.state_mut().set_message(format!("{e:#}"));
            return;
        }
    };
    let state = model.state_mut();
    let base = buffer.name.clone();
    let mut n = 2;
    while state.find_buffer(&buffer.name).is_some() {
        buffer.name = format!("{base}<{n}>");
        n += 1;
    }
    let lines = buffer.line_count();
    let id = state.add_buffer(buffer);
    model.switch_to_buffer(id);
    model
        .state_mut()
        .set_message(format!("Read {lines} lines from {}", path.display()));
}

pub(crate) fn kill_buffer(model: &mut EditorModel) -> DispatchResult {
    if model.state().current_buffer().modified {
        model
            .state_mut()
            .set_message("Buffer modified; save it before killing");
    } else if !model.kill_current_buffer() {
        model
            .state_mut()
            .set_message("Cannot kill the only buffer or one shown in another window");
    }
    DispatchResult::dirty()
}
