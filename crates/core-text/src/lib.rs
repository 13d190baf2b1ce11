//! Piece-table text buffer.
//!
//! `Buffer` couples a [`table::PieceTable`] with the cursor (point), the page
//! frame last shown in a window and a few flags the display layer reads.
//! Offsets everywhere are code-point indices into the document.

use anyhow::Result;
use std::path::PathBuf;

pub mod motion;
pub mod segment;
pub mod table;

pub use segment::RowMetrics;
pub use table::{Piece, PieceTable, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("offset {offset} out of range for document of length {len}")]
    OutOfRange { offset: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct Buffer {
    table: PieceTable,
    point: usize,
    /// First offset shown in the window currently bound to this buffer.
    pub page_start: usize,
    /// Last offset that received a screen position on the previous render.
    pub page_end: usize,
    pub modified: bool,
    /// Forces the next display pass to recompute the page frame.
    pub reframe: bool,
    pub name: String,
    pub file_name: Option<PathBuf>,
    window_count: usize,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            table: PieceTable::new(content),
            point: 0,
            page_start: 0,
            page_end: 0,
            modified: false,
            reframe: false,
            name: name.into(),
            file_name: None,
            window_count: 0,
        })
    }

    pub fn table(&self) -> &PieceTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn point(&self) -> usize {
        self.point
    }

    /// Move the point, clamped to `[0, len()]`. Never reframes.
    pub fn set_point(&mut self, offset: usize) {
        self.point = offset.min(self.len());
    }

    pub fn contents(&self) -> String {
        self.table.all_contents()
    }

    /// Text in `[start, end)`, both clamped to the document.
    pub fn read(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        let start = start.min(end);
        self.table.read(start, end).unwrap_or_default()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.table.char_at(offset)
    }

    pub fn chars_from(&self, offset: usize) -> table::Chars<'_> {
        self.table.chars_from(offset)
    }

    pub fn window_count(&self) -> usize {
        self.window_count
    }

    pub fn attach_window(&mut self) {
        self.window_count += 1;
    }

    pub fn detach_window(&mut self) {
        self.window_count = self.window_count.saturating_sub(1);
    }

    /// Offset of the first character on the line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        let back = self
            .table
            .chars_before(offset)
            .position(|c| c == '\n')
            .unwrap_or(offset);
        offset - back
    }

    /// Offset of the newline ending the line containing `offset`, or `len()`
    /// on the last line.
    pub fn line_end(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        match self.table.chars_from(offset).position(|c| c == '\n') {
            Some(n) => offset + n,
            None => self.len(),
        }
    }

    /// Start offset of 0-based line `line`, clamped to `len()` past the end.
    pub fn point_for_line(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        let mut seen = 0;
        for (offset, ch) in self.table.chars_from(0).enumerate() {
            if ch == '\n' {
                seen += 1;
                if seen == line {
                    return offset + 1;
                }
            }
        }
        self.len()
    }

    /// 0-based line number of `offset` (newlines strictly before it).
    pub fn line_for_point(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        self.table
            .chars_from(0)
            .take(offset)
            .filter(|&c| c == '\n')
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.line_for_point(self.len()) + 1
    }

    /// Length of the line containing `offset`, newline excluded.
    pub fn line_len_at_point(&self, offset: usize) -> usize {
        self.line_end(offset) - self.line_start(offset)
    }

    /// Line `idx` without its newline, `None` past the last line.
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.line_count() {
            return None;
        }
        let start = self.point_for_line(idx);
        Some(self.read(start, self.line_end(start)))
    }

    /// Offset at column `col` of line `line`; the column is clamped to the
    /// line length.
    pub fn point_for_xy(&self, col: usize, line: usize) -> usize {
        let start = self.point_for_line(line);
        start + col.min(self.line_len_at_point(start))
    }

    pub fn column_at(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        offset - self.line_start(offset)
    }

    /// Insert `text` at the point; the point moves past it.
    pub fn insert(&mut self, text: &str) -> Result<(), TextError> {
        self.table.insert(text, self.point)?;
        self.point += text.chars().count();
        if !text.is_empty() {
            self.modified = true;
        }
        Ok(())
    }

    pub fn insert_char(&mut self, ch: char) -> Result<(), TextError> {
        let mut tmp = [0u8; 4];
        self.insert(ch.encode_utf8(&mut tmp))
    }

    /// Delete the character before the point. `None` at the start of the
    /// document.
    pub fn backspace(&mut self) -> Result<Option<char>, TextError> {
        if self.point == 0 {
            return Ok(None);
        }
        let removed = self.table.delete_char(self.point - 1)?;
        self.point -= 1;
        self.modified = true;
        Ok(Some(removed))
    }

    /// Delete the character under the point. `None` at the end of the
    /// document.
    pub fn delete_forward(&mut self) -> Result<Option<char>, TextError> {
        if self.point >= self.len() {
            return Ok(None);
        }
        let removed = self.table.delete_char(self.point)?;
        self.modified = true;
        Ok(Some(removed))
    }

    /// Remove `[start, end)` (clamped). The point is pulled back to `start`
    /// when it was inside or after the removed span.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<String, TextError> {
        let end = end.min(self.len());
        let start = start.min(end);
        let removed = self.table.delete_range(start, end)?;
        if self.point > start {
            self.point = start.max(self.point.saturating_sub(end - start));
        }
        if !removed.is_empty() {
            self.modified = true;
        }
        Ok(removed)
    }
}
