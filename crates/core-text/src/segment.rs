//! Screen segment arithmetic.
//!
//! A screen segment is the part of a logical line that fits one screen row.
//! These helpers use exactly the column rules of the render pass (see
//! [`RowMetrics::advance`]) so the reframe logic and the drawn rows agree on
//! where every row starts:
//! - `'\n'` ends the row;
//! - `'\r'` occupies no column;
//! - a tab advances `tab_width` columns, any other character one;
//! - a row breaks once the column reaches `cols`.

use crate::Buffer;

/// Width of a window row and the tab advance used to lay text into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMetrics {
    pub cols: usize,
    pub tab_width: usize,
}

impl RowMetrics {
    pub fn new(cols: usize, tab_width: usize) -> Self {
        Self {
            cols: cols.max(1),
            tab_width: tab_width.max(1),
        }
    }

    /// Column after placing `ch` at `col`. Newlines are handled by callers.
    pub fn advance(&self, col: usize, ch: char) -> usize {
        match ch {
            '\r' => col,
            '\t' => col + self.tab_width,
            _ => col + 1,
        }
    }
}

impl Buffer {
    /// Start offset of the screen segment containing `finish`, scanning from
    /// `start` (which must be a line start).
    pub fn seg_start(&self, start: usize, finish: usize, m: RowMetrics) -> usize {
        let finish = finish.min(self.len());
        let mut col = 0;
        let mut seg = start;
        for (k, ch) in (start..finish).zip(self.chars_from(start)) {
            if ch == '\n' {
                col = 0;
                seg = k + 1;
                continue;
            }
            col = m.advance(col, ch);
            if col >= m.cols {
                col = 0;
                seg = k + 1;
            }
        }
        seg
    }

    /// Start offset of the screen segment following the one that contains
    /// `finish`; `len()` when that segment runs to the end of the document.
    pub fn seg_next(&self, start: usize, finish: usize, m: RowMetrics) -> usize {
        let mut scan = self.seg_start(start, finish, m);
        let mut col = 0;
        for ch in self.chars_from(scan) {
            scan += 1;
            if ch == '\n' {
                return scan;
            }
            col = m.advance(col, ch);
            if col >= m.cols {
                return scan;
            }
        }
        self.len()
    }

    /// Start of the screen row above the one containing `offset`. Row 0 maps
    /// to itself.
    pub fn up_up(&self, offset: usize, m: RowMetrics) -> usize {
        let curr = self.line_start(offset);
        let seg = self.seg_start(curr, offset, m);
        if curr < seg {
            self.seg_start(curr, seg - 1, m)
        } else if curr == 0 {
            0
        } else {
            self.seg_start(self.line_start(curr - 1), curr - 1, m)
        }
    }

    /// Start of the screen row below the one containing `offset`.
    pub fn down_down(&self, offset: usize, m: RowMetrics) -> usize {
        self.seg_next(self.line_start(offset), offset, m)
    }
}
