//! High-level editor model: the stacked window list over the buffer registry.
//!
//! A `Window` is a viewport (a run of text rows plus one mode line) bound to
//! one buffer. Several windows may show the same buffer; each keeps its own
//! saved frame (point, page start, page end).
//!
//! Frame ownership protocol:
//! * The current window's live frame is stored *in its buffer*
//!   (`Buffer::point`, `page_start`, `page_end`). Its own saved copy is stale
//!   until the window loses focus.
//! * Every other window's frame lives in the window. Before such a window is
//!   rendered its frame is loaded into the buffer and saved back afterwards
//!   (see `core-render`).
//!
//! Core invariants (must hold after every public call):
//! * `windows` is never empty and `current < windows.len()`.
//! * The current window's buffer is the registry's current buffer.
//! * Every window's buffer is live in the registry and its `window_count`
//!   counts the windows showing it.
//! * Windows tile the terminal top to bottom:
//!   `sum(rows) + windows + 1 (message line) == terminal rows` whenever the
//!   terminal is large enough for the list.

use core_state::{BufferId, EditorState};
use core_text::{Buffer, RowMetrics};
use tracing::debug;

mod layout;
pub use layout::{Layout, LayoutRegion};

/// Stable identifier for a `Window`. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub usize);

#[derive(Debug, Clone)]
pub struct Window {
    pub id: WindowId,
    pub buffer: BufferId,
    /// First screen row of the text area.
    pub top: u16,
    /// Number of text rows (the mode line is extra).
    pub rows: u16,
    pub cursor_row: u16,
    pub cursor_col: u16,
    /// Needs redrawing even though it is not current.
    pub updated: bool,
    pub point: usize,
    pub page_start: usize,
    pub page_end: usize,
}

impl Window {
    pub fn new(id: WindowId, buffer: BufferId, top: u16, rows: u16) -> Self {
        Self {
            id,
            buffer,
            top,
            rows,
            cursor_row: 0,
            cursor_col: 0,
            updated: true,
            point: 0,
            page_start: 0,
            page_end: 0,
        }
    }

    pub fn mode_line_row(&self) -> u16 {
        self.top + self.rows
    }

    /// Copy the buffer's live frame into this window.
    pub fn save_frame(&mut self, buf: &Buffer) {
        self.point = buf.point();
        self.page_start = buf.page_start;
        self.page_end = buf.page_end;
    }

    /// Make this window's saved frame the buffer's live frame.
    pub fn load_frame(&self, buf: &mut Buffer) {
        buf.set_point(self.point);
        buf.page_start = self.page_start;
        buf.page_end = self.page_end;
    }

    pub fn region(&self, cols: u16) -> LayoutRegion {
        LayoutRegion::new(0, self.top, cols, self.rows)
    }
}

/// Owns the window list in screen order plus the current index.
#[derive(Debug)]
pub struct WindowManager {
    windows: Vec<Window>,
    current: usize,
    next_id: usize,
}

impl WindowManager {
    pub fn new_single(initial: Window) -> Self {
        let next_id = initial.id.0 + 1;
        Self {
            windows: vec![initial],
            current: 0,
            next_id,
        }
    }

    pub fn current(&self) -> &Window {
        &self.windows[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Window {
        &mut self.windows[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut [Window] {
        &mut self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn alloc_id(&mut self) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn mark_all_updated(&mut self) {
        for w in &mut self.windows {
            w.updated = true;
        }
    }
}

pub struct EditorModel {
    state: EditorState,
    windows: WindowManager,
}

impl EditorModel {
    /// One window on the registry's current buffer spanning the terminal.
    pub fn new(mut state: EditorState) -> Self {
        let layout = Layout::single(state.cols, state.rows);
        let region = *layout.primary();
        let buffer = state.current_id();
        state.current_buffer_mut().attach_window();
        let mut window = Window::new(WindowId(0), buffer, region.y, region.height);
        window.save_frame(state.current_buffer());
        Self {
            state,
            windows: WindowManager::new_single(window),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn current_window(&self) -> &Window {
        self.windows.current()
    }

    pub fn current_window_mut(&mut self) -> &mut Window {
        self.windows.current_mut()
    }

    pub fn windows(&self) -> &[Window] {
        self.windows.windows()
    }

    /// Disjoint mutable access to the registry and the whole window list.
    pub fn parts_mut(&mut self) -> (&mut EditorState, &mut WindowManager) {
        (&mut self.state, &mut self.windows)
    }

    pub fn row_metrics(&self) -> RowMetrics {
        RowMetrics::new(usize::from(self.state.cols), self.state.tab_width)
    }

    pub fn layout(&self) -> Layout {
        let cols = self.state.cols;
        let regions = self.windows().iter().map(|w| w.region(cols)).collect();
        Layout::from_regions(regions, self.state.rows.saturating_sub(1))
    }

    /// Mark every other window showing the current buffer for redraw.
    pub fn mark_buffer_updated(&mut self) {
        let buffer = self.state.current_id();
        let current = self.windows.current;
        for (idx, w) in self.windows.windows.iter_mut().enumerate() {
            if idx != current && w.buffer == buffer {
                w.updated = true;
            }
        }
    }

    fn select_index(&mut self, idx: usize) {
        if idx == self.windows.current || idx >= self.windows.len() {
            return;
        }
        let old = self.windows.current().buffer;
        self.windows.current_mut().save_frame(&self.state[old]);
        self.windows.current = idx;
        let w = self.windows.current();
        self.state.set_current(w.buffer);
        w.load_frame(&mut self.state[w.buffer]);
        debug!(target: "model.window", window = w.id.0, "select_window");
    }

    /// Make the next window in screen order current, wrapping at the end.
    pub fn other_window(&mut self) {
        let next = (self.windows.current + 1) % self.windows.len();
        self.select_index(next);
    }

    /// Split the current window in two. The lower half gets `(rows - 1) / 2`
    /// text rows, the upper keeps the rest minus its new mode line. Both show
    /// the same buffer; the upper one stays current. `None` when the window
    /// has fewer than three text rows.
    pub fn split_window(&mut self) -> Option<WindowId> {
        let rows = self.windows.current().rows;
        if rows < 3 {
            return None;
        }
        let buffer = self.windows.current().buffer;
        let lower = (rows - 1) / 2;
        let upper = rows - 1 - lower;
        let id = self.windows.alloc_id();
        let cur = self.windows.current_mut();
        cur.save_frame(&self.state[buffer]);
        cur.rows = upper;
        let mut new = cur.clone();
        new.id = id;
        new.top = cur.top + upper + 1;
        new.rows = lower;
        self.state[buffer].attach_window();
        let at = self.windows.current + 1;
        self.windows.windows.insert(at, new);
        self.windows.mark_all_updated();
        debug!(target: "model.window", upper, lower, windows = self.windows.len(), "split_window");
        Some(id)
    }

    /// Close every window but the current one, which then spans the terminal.
    pub fn delete_other_windows(&mut self) {
        let current = self.windows.current;
        for (idx, w) in self.windows.windows.iter().enumerate() {
            if idx != current {
                self.state[w.buffer].detach_window();
            }
        }
        let keep = self.windows.windows.swap_remove(current);
        self.windows.windows.clear();
        self.windows.windows.push(keep);
        self.windows.current = 0;
        let region = *Layout::single(self.state.cols, self.state.rows).primary();
        let w = self.windows.current_mut();
        w.top = region.y;
        w.rows = region.height;
        w.updated = true;
        debug!(target: "model.window", rows = region.height, "delete_other_windows");
    }

    /// Show `id` in the current window and make it the current buffer.
    pub fn switch_to_buffer(&mut self, id: BufferId) -> bool {
        let old = self.windows.current().buffer;
        if old == id {
            return true;
        }
        if !self.state.set_current(id) {
            return false;
        }
        self.state[old].detach_window();
        self.state[id].attach_window();
        let w = self.windows.current_mut();
        w.buffer = id;
        w.save_frame(&self.state[id]);
        w.updated = true;
        true
    }

    pub fn next_buffer(&mut self) {
        let next = self.state.next_buffer();
        self.switch_to_buffer(next);
    }

    /// Kill the current buffer, showing the next one in its place. Refused
    /// when it is the only buffer or another window still shows it.
    pub fn kill_current_buffer(&mut self) -> bool {
        let old = self.state.current_id();
        if self.state.buffer_count() < 2 || self.state[old].window_count() > 1 {
            return false;
        }
        let next = self.state.next_buffer();
        self.switch_to_buffer(next) && self.state.kill_buffer(old)
    }

    /// Re-tile the window list for a new terminal size. Collapses to the
    /// current window when the terminal cannot hold them all.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.state.resize(cols, rows);
        match Layout::stacked(cols, rows, self.windows.len()) {
            Some(layout) => {
                for (w, region) in self.windows.windows.iter_mut().zip(layout.regions()) {
                    w.top = region.y;
                    w.rows = region.height;
                }
                self.windows.mark_all_updated();
            }
            None => self.delete_other_windows(),
        }
        debug!(target: "model.window", cols, rows, windows = self.windows.len(), "resize");
    }

    /// Move the point to the buffer position under a mouse click, selecting
    /// the window that owns the row.
    pub fn set_point_for_mouse(&mut self, col: u16, row: u16) {
        let Some((idx, text_row)) = self.layout().region_at_row(row) else {
            return;
        };
        self.select_index(idx);
        let buf = self.state.current_buffer_mut();
        let line = buf.line_for_point(buf.page_start) + usize::from(text_row);
        let point = buf.point_for_xy(usize::from(col), line);
        buf.set_point(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(text: &str, cols: u16, rows: u16) -> EditorModel {
        let mut st = EditorState::new(Buffer::from_str("test", text).unwrap());
        st.resize(cols, rows);
        EditorModel::new(st)
    }

    fn assert_tiled(m: &EditorModel) {
        let text: u16 = m.windows().iter().map(|w| w.rows).sum();
        assert_eq!(text + m.windows().len() as u16 + 1, m.state().rows);
        let mut next_top = 0;
        for w in m.windows() {
            assert_eq!(w.top, next_top);
            next_top = w.mode_line_row() + 1;
        }
    }

    #[test]
    fn single_window_initialized() {
        let m = model("hello\n", 80, 24);
        let w = m.current_window();
        assert_eq!(w.id, WindowId(0));
        assert_eq!(w.top, 0);
        assert_eq!(w.rows, 22);
        assert_eq!(m.state().current_buffer().window_count(), 1);
        assert_tiled(&m);
    }

    #[test]
    fn split_gives_lower_half_to_new_window() {
        let mut m = model("abc\n", 80, 24);
        let id = m.split_window().unwrap();
        let ws = m.windows();
        assert_eq!(ws.len(), 2);
        assert_eq!(ws[0].rows, 11);
        assert_eq!(ws[1].rows, 10);
        assert_eq!(ws[1].id, id);
        assert_eq!(ws[1].top, 12);
        assert!(ws.iter().all(|w| w.updated));
        assert_eq!(m.current_window().id, WindowId(0));
        assert_eq!(m.state().current_buffer().window_count(), 2);
        assert_tiled(&m);
    }

    #[test]
    fn split_refuses_tiny_window() {
        let mut m = model("", 80, 5); // 3 text rows
        assert!(m.split_window().is_some());
        assert!(m.split_window().is_none());
    }

    #[test]
    fn delete_other_windows_restores_full_height() {
        let mut m = model("abc\n", 80, 24);
        m.split_window().unwrap();
        m.split_window().unwrap();
        m.delete_other_windows();
        assert_eq!(m.windows().len(), 1);
        assert_eq!(m.current_window().rows, 22);
        assert_eq!(m.state().current_buffer().window_count(), 1);
        assert_tiled(&m);
    }

    #[test]
    fn other_window_swaps_frames() {
        let mut m = model("0123456789", 80, 24);
        m.split_window().unwrap();
        m.state_mut().current_buffer_mut().set_point(7);
        m.other_window();
        assert_eq!(m.windows.current_index(), 1);
        // the new window was split off while the point was at 0
        assert_eq!(m.state().current_buffer().point(), 0);
        m.other_window();
        assert_eq!(m.state().current_buffer().point(), 7);
    }

    #[test]
    fn mouse_click_maps_row_to_line_and_clamps_column() {
        let text: String = (0..20).map(|i| format!("line {i}\n")).collect();
        let mut m = model(&text, 80, 24);
        let start = m.state().current_buffer().point_for_line(5);
        m.state_mut().current_buffer_mut().page_start = start;
        m.set_point_for_mouse(3, 2);
        let buf = m.state().current_buffer();
        assert_eq!(buf.point(), buf.point_for_line(7) + 3);
        m.set_point_for_mouse(60, 2);
        let buf = m.state().current_buffer();
        assert_eq!(buf.point(), buf.point_for_line(7) + "line 7".len());
    }

    #[test]
    fn mouse_click_selects_owning_window() {
        let mut m = model("a\nb\nc\nd\n", 80, 24);
        m.split_window().unwrap();
        m.set_point_for_mouse(0, 13);
        assert_eq!(m.windows.current_index(), 1);
        assert_eq!(m.state().current_buffer().point(), 2);
        // message line clamps to the last row of the last window
        m.set_point_for_mouse(0, 23);
        assert_eq!(m.windows.current_index(), 1);
    }

    #[test]
    fn resize_retiles_or_collapses() {
        let mut m = model("", 80, 24);
        m.split_window().unwrap();
        m.resize(80, 40);
        assert_eq!(m.windows().len(), 2);
        assert_tiled(&m);
        m.resize(80, 4);
        assert_eq!(m.windows().len(), 1);
        assert_eq!(m.current_window().rows, 2);
    }

    #[test]
    fn buffer_switch_and_kill() {
        let mut m = model("x", 80, 24);
        let other = m.state_mut().find_or_create("other").unwrap();
        m.next_buffer();
        assert_eq!(m.state().current_id(), other);
        assert_eq!(m.current_window().buffer, other);
        assert!(m.kill_current_buffer());
        assert!(m.state().buffer(other).is_none());
        assert_eq!(m.state().current_buffer().name, "test");
        assert!(!m.kill_current_buffer());
    }

    #[test]
    fn edits_mark_sibling_windows() {
        let mut m = model("abc", 80, 24);
        m.split_window().unwrap();
        for w in m.windows.windows_mut() {
            w.updated = false;
        }
        m.mark_buffer_updated();
        assert!(!m.windows()[0].updated);
        assert!(m.windows()[1].updated);
    }
}
