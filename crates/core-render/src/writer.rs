//! Terminal writer.
//!
//! A short-lived list of primitive terminal commands built per frame, then
//! queued through crossterm and flushed once. Only rows that differ from the
//! previous frame are emitted; the first frame (or the first after a resize)
//! clears the screen and paints every row.
//!
//! Design invariants:
//! * Commands preserve ordering; no flushing mid-frame.
//! * All positions are absolute with a (0,0) origin.
//! * The cursor is hidden while rows are painted and shown at the frame's
//!   cursor position last.

use crate::{CellFlags, Frame};
use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    HideCursor,
    ClearAll,
    MoveTo(u16, u16),
    Reverse(bool),
    Print(String),
    ShowCursor(u16, u16),
}

#[derive(Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }
    pub fn len(&self) -> usize {
        self.cmds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Translate `frame` into commands, skipping rows identical in `prev`.
    pub fn emit_frame(&mut self, frame: &Frame, prev: Option<&Frame>) {
        self.cmds.push(Command::HideCursor);
        let prev = prev.filter(|p| p.width == frame.width && p.height == frame.height);
        if prev.is_none() {
            self.cmds.push(Command::ClearAll);
        }
        for y in 0..frame.height {
            let row = frame.row(y);
            if prev.is_some_and(|p| p.row(y) == row) {
                continue;
            }
            self.move_to(0, y);
            self.emit_row(row);
        }
        let (x, y) = frame.cursor.unwrap_or((0, 0));
        self.cmds.push(Command::ShowCursor(x, y));
    }

    /// Runs of equal reverse state become one `Print`.
    fn emit_row(&mut self, row: &[crate::Cell]) {
        let mut reverse = false;
        let mut run = String::new();
        for cell in row {
            let want = cell.flags.contains(CellFlags::REVERSE);
            if want != reverse {
                self.print(std::mem::take(&mut run));
                self.cmds.push(Command::Reverse(want));
                reverse = want;
            }
            run.push(cell.ch);
        }
        self.print(run);
        if reverse {
            self.cmds.push(Command::Reverse(false));
        }
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::HideCursor => queue!(out, Hide)?,
                Command::ClearAll => queue!(out, Clear(ClearType::All))?,
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::Reverse(true) => queue!(out, SetAttribute(Attribute::Reverse))?,
                Command::Reverse(false) => queue!(out, SetAttribute(Attribute::NoReverse))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::ShowCursor(x, y) => queue!(out, MoveTo(x, y), Show)?,
            }
        }
        out.flush()?;
        Ok(())
    }
}
