//! Point movement. Page motions use the current window's height and the
//! same row metrics as the display.

use super::DispatchResult;
use crate::MotionKind;
use core_model::EditorModel;
use core_text::motion;

pub(crate) fn handle_motion(kind: MotionKind, model: &mut EditorModel) -> DispatchResult {
    let metrics = model.row_metrics();
    let rows = usize::from(model.current_window().rows);
    let buf = model.state_mut().current_buffer_mut();
    let before = buf.point();
    match kind {
        MotionKind::Left => motion::left(buf),
        MotionKind::Right => motion::right(buf),
        MotionKind::Up => motion::up(buf),
        MotionKind::Down => motion::down(buf),
        MotionKind::LineStart => motion::line_start(buf),
        MotionKind::LineEnd => motion::line_end(buf),
        MotionKind::BufferTop => motion::buffer_top(buf),
        MotionKind::BufferBottom => motion::buffer_bottom(buf),
        MotionKind::PageDown => motion::page_down(buf, metrics),
        MotionKind::PageUp => motion::page_up(buf, rows, metrics),
    }
    tracing::trace!(target: "actions.dispatch", op = ?kind, from = before, to = buf.point(), "motion");
    DispatchResult::dirty()
}
