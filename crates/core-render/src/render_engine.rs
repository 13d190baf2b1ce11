//! Display engine: keeps every window's page frame around its point, lays
//! buffer text into the `Frame`, and composites windows, mode lines and the
//! message line.
//!
//! Column rules are shared with `core_text::segment` (`RowMetrics::advance`)
//! so the rows drawn here start exactly where `seg_start` / `up_up` /
//! `down_down` say they do:
//! * `'\r'` is dropped (it still owns the offset, but no column);
//! * a tab advances `tab_width` columns, drawn as blanks;
//! * `'\n'` pads the rest of its row and moves to the next row;
//! * anything else, printable or not, is written as-is and advances one
//!   column; reaching `cols` wraps to the next row.
//!
//! Frame invariant restored by every window render:
//! `page_start <= point <= page_end`, where `page_end` is the last offset that
//! received a screen position.

use crate::status::{ModeLineContext, build_message_line, build_mode_line};
use crate::writer::Writer;
use crate::{CellFlags, Frame, timing};
use anyhow::Result;
use core_model::{EditorModel, Window};
use core_text::{Buffer, RowMetrics};
use std::io::Write;
use tracing::{debug, trace};

/// Owns the previously flushed frame so unchanged rows and untouched windows
/// are not repainted.
#[derive(Default)]
pub struct RenderEngine {
    prev: Option<Frame>,
    frames: u64,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the next frame. Windows that are neither current, sharing the
    /// current buffer nor flagged `updated` keep their rows from the previous
    /// frame.
    pub fn compose(&mut self, model: &mut EditorModel) -> Frame {
        let (cols, rows) = (model.state().cols, model.state().rows);
        let base = match self.prev.as_ref() {
            Some(f) if f.width == cols && f.height == rows => f.clone(),
            _ => {
                model.parts_mut().1.mark_all_updated();
                Frame::new(cols, rows)
            }
        };
        display(model, base)
    }

    /// Compose and flush to `out`.
    pub fn render<W: Write>(&mut self, model: &mut EditorModel, out: &mut W) -> Result<()> {
        let start = std::time::Instant::now();
        let frame = self.compose(model);
        let mut writer = Writer::new();
        writer.emit_frame(&frame, self.prev.as_ref());
        let commands = writer.len();
        writer.flush_to(out)?;
        self.prev = Some(frame);
        self.frames += 1;
        let ns = start.elapsed().as_nanos() as u64;
        timing::record_render_ns(ns);
        trace!(target: "render.engine", frames = self.frames, commands, ns, "render");
        Ok(())
    }

    /// Drop the cached frame; the next render clears and repaints everything.
    pub fn invalidate_for_resize(&mut self) {
        self.prev = None;
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.prev.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

/// Composite every window that needs it into `frame`.
///
/// The current window is rendered first so its buffer's frame is settled.
/// Each other window showing the current buffer, or flagged `updated`, then
/// has its saved frame loaded into the buffer, rendered and saved back.
/// Finally the current window's frame is restored into its buffer and its
/// cursor becomes the terminal cursor.
pub fn display(model: &mut EditorModel, mut frame: Frame) -> Frame {
    let metrics = model.row_metrics();
    let (state, wm) = model.parts_mut();
    let fill = state.fill_glyphs;
    let current = wm.current_index();
    let current_buffer = state.current_id();
    {
        let win = &mut wm.windows_mut()[current];
        let buf = &mut state[win.buffer];
        render_window(buf, win, metrics, fill, &mut frame);
        win.save_frame(buf);
    }
    for (idx, win) in wm.windows_mut().iter_mut().enumerate() {
        if idx == current || !(win.buffer == current_buffer || win.updated) {
            continue;
        }
        let buf = &mut state[win.buffer];
        win.load_frame(buf);
        render_window(buf, win, metrics, fill, &mut frame);
        win.save_frame(buf);
    }
    let cur = &wm.windows()[current];
    cur.load_frame(&mut state[cur.buffer]);

    let width = usize::from(frame.width);
    for (idx, win) in wm.windows().iter().enumerate() {
        let buf = &state[win.buffer];
        let ctx = ModeLineContext {
            current: idx == current,
            modified: buf.modified,
            name: &buf.name,
            line: buf.line_for_point(win.point),
            col: buf.column_at(win.point),
        };
        frame.put_str(0, win.mode_line_row(), &build_mode_line(&ctx, width), CellFlags::REVERSE);
    }
    let message_row = state.rows.saturating_sub(1);
    frame.clear_row_from(message_row, 0);
    let message = build_message_line(state.message_line().as_deref(), width);
    let message_end = frame.put_str(0, message_row, &message, CellFlags::empty());

    let cur = &wm.windows()[current];
    frame.cursor = if state.prompt.is_some() {
        Some((message_end.min(frame.width.saturating_sub(1)), message_row))
    } else {
        Some((cur.cursor_col, cur.top + cur.cursor_row))
    };
    for win in wm.windows_mut() {
        win.updated = false;
    }
    frame
}

/// Reframe and paint one window. When the point does not land inside the
/// painted rows (an edit re-wrapped rows below it) the window is reframed
/// around the point and painted once more.
pub fn render_window(
    buf: &mut Buffer,
    win: &mut Window,
    m: RowMetrics,
    fill: bool,
    frame: &mut Frame,
) {
    let rows = usize::from(win.rows);
    if rows == 0 {
        return;
    }
    frame_window(buf, rows, m);
    if !paint_window(buf, win, m, fill, frame) {
        debug!(target: "render.engine", window = win.id.0, "point_outside_frame");
        buf.reframe = true;
        frame_window(buf, rows, m);
        paint_window(buf, win, m, fill, frame);
    }
}

/// Adjust `page_start` so the point will fall inside a window of `rows` rows.
pub fn frame_window(buf: &mut Buffer, rows: usize, m: RowMetrics) {
    let len = buf.len();
    let point = buf.point();
    if buf.page_start > len {
        buf.reframe = true;
    } else {
        let start = buf.page_start;
        buf.page_start = buf.seg_start(buf.line_start(start), start, m);
    }
    if point < buf.page_start {
        buf.page_start = buf.seg_start(buf.line_start(point), point, m);
    }
    if buf.reframe || (point > buf.page_end && point != len) {
        buf.reframe = false;
        let row = buf.seg_start(buf.line_start(point), point, m);
        let bottom = buf.down_down(point, m);
        // Scrolling onto end of buffer leaves the empty end-of-buffer row
        // visible under the point.
        let eof_row_below =
            bottom == len && bottom != row && buf.seg_start(buf.line_start(len), len, m) == len;
        let above = if eof_row_below {
            rows.saturating_sub(2)
        } else {
            rows - 1
        };
        let mut start = row;
        for _ in 0..above {
            start = buf.up_up(start, m);
        }
        buf.page_start = start;
        trace!(target: "render.engine", page_start = start, rows, "reframe");
    }
}

fn pad_row(frame: &mut Frame, y: u16, from: usize, fill: bool) {
    let cols = frame.width;
    for x in (from as u16)..cols {
        let ch = if !fill {
            ' '
        } else if x == cols - 1 {
            '$'
        } else if x == 0 {
            '^'
        } else {
            '~'
        };
        let flags = if fill { CellFlags::FILL } else { CellFlags::empty() };
        frame.set(x, y, ch, flags);
    }
}

/// Lay the buffer into the window's rows from `page_start`, recording the
/// cursor cell and `page_end`. Returns whether the point received a cell.
pub fn paint_window(
    buf: &mut Buffer,
    win: &mut Window,
    m: RowMetrics,
    fill: bool,
    frame: &mut Frame,
) -> bool {
    let rows = usize::from(win.rows);
    let point = buf.point();
    let mut offset = buf.page_start;
    let mut page_end = offset;
    let mut row = 0usize;
    let mut col = 0usize;
    let mut found = false;
    let mut chars = buf.chars_from(offset);
    while row < rows {
        page_end = offset;
        if offset == point {
            win.cursor_row = row as u16;
            win.cursor_col = col as u16;
            found = true;
        }
        let Some(ch) = chars.next() else {
            break;
        };
        offset += 1;
        let y = win.top + row as u16;
        match ch {
            '\r' => continue,
            '\n' => {
                pad_row(frame, y, col, fill);
                row += 1;
                col = 0;
                continue;
            }
            '\t' => {
                for x in col..(col + m.tab_width).min(m.cols) {
                    frame.set(x as u16, y, ' ', CellFlags::empty());
                }
            }
            _ => frame.set(col as u16, y, ch, CellFlags::empty()),
        }
        col = m.advance(col, ch);
        if col >= m.cols {
            row += 1;
            col = 0;
        }
    }
    if row < rows {
        pad_row(frame, win.top + row as u16, col, fill);
        row += 1;
    }
    while row < rows {
        pad_row(frame, win.top + row as u16, 0, fill);
        row += 1;
    }
    buf.page_end = page_end;
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::EditorState;

    fn model(text: &str, cols: u16, rows: u16) -> EditorModel {
        let mut st = EditorState::new(Buffer::from_str("test", text).unwrap());
        st.resize(cols, rows);
        EditorModel::new(st)
    }

    fn frame_for(m: &mut EditorModel) -> Frame {
        RenderEngine::new().compose(m)
    }

    #[test]
    fn short_text_pads_rows_with_fill_glyphs() {
        let mut m = model("ab\n\ncd", 6, 6);
        let f = frame_for(&mut m);
        assert_eq!(f.row_text(0), "ab~~~$");
        assert_eq!(f.row_text(1), "^~~~~$");
        assert_eq!(f.row_text(2), "cd~~~$");
        assert_eq!(f.row_text(3), "^~~~~$");
        assert!(f.row_text(4).starts_with("=== pi"));
        assert_eq!(f.row_text(5), "      ");
    }

    #[test]
    fn fill_glyphs_can_be_disabled() {
        let mut m = model("ab", 4, 4);
        m.state_mut().fill_glyphs = false;
        let f = frame_for(&mut m);
        assert_eq!(f.row_text(0), "ab  ");
        assert_eq!(f.row_text(1), "    ");
    }

    #[test]
    fn tab_and_carriage_return_columns() {
        let mut m = model("\tx\r\ny", 10, 4);
        m.state_mut().current_buffer_mut().set_point(2);
        let f = frame_for(&mut m);
        assert_eq!(&f.row_text(0)[..6], "    x~");
        // the '\r' after 'x' owns no column, so its cursor cell is column 5
        assert_eq!(f.cursor, Some((5, 0)));
    }

    #[test]
    fn long_line_wraps_and_cursor_follows() {
        let mut m = model("0123456789", 4, 5);
        m.state_mut().current_buffer_mut().set_point(9);
        let f = frame_for(&mut m);
        assert_eq!(f.row_text(0), "0123");
        assert_eq!(f.row_text(1), "4567");
        assert_eq!(f.row_text(2), "89~$");
        assert_eq!(f.cursor, Some((1, 2)));
    }

    #[test]
    fn scroll_up_snaps_page_start_to_point_row() {
        let text: String = (0..30).map(|i| format!("r{i}\n")).collect();
        let mut m = model(&text, 10, 7); // 5 text rows
        let p20 = m.state().current_buffer().point_for_line(20);
        {
            let b = m.state_mut().current_buffer_mut();
            b.page_start = p20;
            b.page_end = b.point_for_line(25) - 1;
            b.set_point(b.point_for_line(12) + 1);
        }
        let f = frame_for(&mut m);
        let b = m.state().current_buffer();
        assert_eq!(b.page_start, b.point_for_line(12));
        assert_eq!(f.cursor, Some((1, 0)));
    }

    #[test]
    fn end_of_buffer_keeps_blank_bottom_row() {
        let text: String = (0..30).map(|i| format!("r{i}\n")).collect();
        let mut m = model(&text, 10, 7);
        {
            let b = m.state_mut().current_buffer_mut();
            let end = b.len();
            b.set_point(end);
            b.reframe = true;
        }
        let f = frame_for(&mut m);
        let b = m.state().current_buffer();
        assert_eq!(b.page_start, b.point_for_line(26));
        assert_eq!(f.cursor, Some((0, 4)));
        assert_eq!(f.row_text(0), "r26~~~~~~$");
    }

    #[test]
    fn typing_past_last_row_reframes() {
        let mut m = model("", 4, 4); // 2 text rows
        for _ in 0..3 {
            m.state_mut().current_buffer_mut().insert("abcd").unwrap();
            frame_for(&mut m);
        }
        let b = m.state().current_buffer();
        assert!(b.page_start <= b.point() && b.point() <= b.page_end);
    }

    #[test]
    fn split_windows_share_buffer_with_independent_frames() {
        let text: String = (0..40).map(|i| format!("l{i}\n")).collect();
        let mut m = model(&text, 12, 24);
        m.split_window().unwrap();
        let target = m.state().current_buffer().point_for_line(30);
        m.state_mut().current_buffer_mut().set_point(target);
        let f = frame_for(&mut m);
        // upper window scrolled to line 30, lower still shows the top
        assert_eq!(m.windows()[1].page_start, 0);
        assert_eq!(f.row_text(12).trim_end_matches(['~', '$']), "l0");
        let upper_cursor_row = f.cursor.unwrap().1;
        assert!(upper_cursor_row < 11);
        assert!(f.row_text(11).starts_with("==="));
        assert!(f.row_text(22).starts_with("---"));
        assert_eq!(m.state().current_buffer().point(), target);
    }

    #[test]
    fn prompt_takes_the_cursor() {
        let mut m = model("x", 20, 4);
        let mut p = core_state::Prompt::new(core_state::PromptKind::SwitchBuffer);
        p.response.push('a');
        m.state_mut().prompt = Some(p);
        let f = frame_for(&mut m);
        assert_eq!(f.row_text(3), "Switch to buffer: a ");
        assert_eq!(f.cursor, Some((19, 3)));
    }

    #[test]
    fn second_render_rewrites_only_changed_rows() {
        let mut m = model("abc\ndef\n", 10, 5);
        let mut engine = RenderEngine::new();
        let mut first = Vec::new();
        engine.render(&mut m, &mut first).unwrap();
        let row0 = engine.last_frame().map(|f| f.row_text(0));
        assert!(row0.is_some_and(|r| r.starts_with("abc")));

        m.state_mut().current_buffer_mut().insert("x").unwrap();
        let mut second = Vec::new();
        engine.render(&mut m, &mut second).unwrap();
        let last = engine.last_frame().unwrap();
        assert!(last.row_text(0).starts_with("xabc"));
        assert!(last.row_text(1).starts_with("def"));
        assert_eq!(engine.frames_rendered(), 2);
        assert!(second.len() < first.len());
    }

    #[test]
    fn message_line_is_last_row() {
        let mut m = model("x", 10, 4);
        m.state_mut().set_message("saved");
        let f = frame_for(&mut m);
        assert_eq!(f.row_text(3), "saved     ");
    }
}
