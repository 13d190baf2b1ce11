//! Rendering primitives, the display engine and the terminal writer.
//!
//! `Frame` is the screen sink: a grid of single-character cells plus the
//! terminal cursor position. The display engine (`render_engine`) lays every
//! window's page frame into it, draws mode lines and the message line, and
//! the writer flushes the rows that changed since the previous frame.
//!
//! One cell holds one code point. Wide or combining characters are written
//! as-is and left to the terminal.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001; // mode line
        const FILL    = 0b0000_0010; // padding glyph past the end of a row
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub flags: CellFlags,
}

impl Cell {
    pub fn new(ch: char, flags: CellFlags) -> Self {
        Self { ch, flags }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new(' ', CellFlags::empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
    /// Terminal cursor `(col, row)`.
    pub cursor: Option<(u16, u16)>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
            cursor: None,
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, ch: char, flags: CellFlags) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::new(ch, flags);
        }
    }

    /// Write `s` from `(x, y)` clipped to the row; returns the column after
    /// the last character written.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, flags: CellFlags) -> u16 {
        let mut col = x;
        for ch in s.chars() {
            if col >= self.width {
                break;
            }
            self.set(col, y, ch, flags);
            col += 1;
        }
        col
    }

    /// Blank `[from, width)` of row `y`.
    pub fn clear_row_from(&mut self, y: u16, from: u16) {
        for x in from..self.width {
            self.set(x, y, ' ', CellFlags::empty());
        }
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        match self.index(0, y) {
            Some(start) => &self.cells[start..start + self.width as usize],
            None => &[],
        }
    }

    /// Row `y` as text (testing / diagnostics).
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|c| c.ch).collect()
    }
}

pub mod render_engine;
pub mod status;
pub mod timing;
pub mod writer;

pub use render_engine::{RenderEngine, display, frame_window, paint_window, render_window};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_str_clips_at_width() {
        let mut f = Frame::new(4, 2);
        let end = f.put_str(2, 1, "abcdef", CellFlags::empty());
        assert_eq!(end, 4);
        assert_eq!(f.row_text(1), "  ab");
        assert_eq!(f.row_text(0), "    ");
    }

    #[test]
    fn out_of_bounds_set_is_ignored() {
        let mut f = Frame::new(2, 2);
        f.set(5, 5, 'x', CellFlags::empty());
        assert!(f.get(5, 5).is_none());
        assert!(f.row(9).is_empty());
    }
}
