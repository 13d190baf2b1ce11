//! Cursor motion helpers.
//!
//! These operate purely on a `Buffer` (its point and page frame) and are free
//! of window or registry state. Up/down move by logical line and keep the
//! column where the target line is long enough.

use crate::{Buffer, RowMetrics};

/// Move left one character.
pub fn left(buf: &mut Buffer) {
    let p = buf.point();
    buf.set_point(p.saturating_sub(1));
}

/// Move right one character.
pub fn right(buf: &mut Buffer) {
    let p = buf.point();
    buf.set_point(p + 1);
}

/// Move to start of line.
pub fn line_start(buf: &mut Buffer) {
    let p = buf.line_start(buf.point());
    buf.set_point(p);
}

/// Move to the end of line (onto the newline, or end of document).
pub fn line_end(buf: &mut Buffer) {
    let p = buf.line_end(buf.point());
    buf.set_point(p);
}

/// Move up one logical line preserving the column (clamped to the line).
pub fn up(buf: &mut Buffer) {
    let start = buf.line_start(buf.point());
    if start == 0 {
        return;
    }
    let col = buf.point() - start;
    let prev = buf.line_start(start - 1);
    let prev_len = start - 1 - prev;
    buf.set_point(prev + col.min(prev_len));
}

/// Move down one logical line preserving the column (clamped to the line).
pub fn down(buf: &mut Buffer) {
    let end = buf.line_end(buf.point());
    if end >= buf.len() {
        return;
    }
    let col = buf.column_at(buf.point());
    let next = end + 1;
    let next_len = buf.line_end(next) - next;
    buf.set_point(next + col.min(next_len));
}

pub fn buffer_top(buf: &mut Buffer) {
    buf.set_point(0);
}

/// Jump to end of document and ask the display to frame it.
pub fn buffer_bottom(buf: &mut Buffer) {
    let len = buf.len();
    buf.set_point(len);
    buf.reframe = true;
}

/// Scroll forward by a window: the last visible row becomes the first.
pub fn page_down(buf: &mut Buffer, m: RowMetrics) {
    if buf.page_end >= buf.len() {
        let len = buf.len();
        buf.set_point(len);
        return;
    }
    let top = buf.seg_start(buf.line_start(buf.page_end), buf.page_end, m);
    let top = if top <= buf.page_start {
        buf.down_down(buf.page_end, m)
    } else {
        top
    };
    buf.page_start = top;
    buf.set_point(top);
}

/// Scroll back by `rows` screen rows, placing the point at the new top.
pub fn page_up(buf: &mut Buffer, rows: usize, m: RowMetrics) {
    let mut top = buf.page_start;
    for _ in 0..rows.saturating_sub(1).max(1) {
        if top == 0 {
            break;
        }
        top = buf.up_up(top, m);
    }
    buf.page_start = top;
    buf.set_point(top);
}
