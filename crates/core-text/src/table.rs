//! Piece table storage.
//!
//! The document is described by an ordered run list (`pieces`) over two
//! backing stores: the immutable original content and an append-only log that
//! receives every inserted character. Edits never copy document text; they
//! only rewrite the run list around the edit point.
//!
//! Invariants (must hold after every public call):
//! * `pieces` never contains a zero-length piece. An empty document has an
//!   empty run list.
//! * The sum of piece lengths equals `len()`.
//! * `append_log` only grows at its end, so a range referenced by a piece stays
//!   valid for the lifetime of the table.
//!
//! Offsets are code-point indices (one `char` per position), not UTF-8 byte
//! offsets.

use crate::TextError;
use tracing::trace;

/// Which backing store a piece draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Original,
    AppendLog,
}

/// Descriptor of the half-open range `[start, start + len)` in one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub source: Source,
    pub start: usize,
    pub len: usize,
}

impl Piece {
    pub fn new(source: Source, start: usize, len: usize) -> Self {
        Self { source, start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Split into `[start, start+at)` and `[start+at, end)`. Either half may be
    /// empty; the splice step drops empty halves.
    fn split_at(self, at: usize) -> (Piece, Piece) {
        debug_assert!(at <= self.len, "split point inside piece");
        (
            Piece::new(self.source, self.start, at),
            Piece::new(self.source, self.start + at, self.len - at),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct PieceTable {
    original: Vec<char>,
    append_log: Vec<char>,
    pieces: Vec<Piece>,
    len: usize,
}

impl PieceTable {
    /// Build a table whose original store holds `text`.
    pub fn new(text: &str) -> Self {
        let original: Vec<char> = text.chars().collect();
        let len = original.len();
        let mut table = Self {
            original,
            append_log: Vec::new(),
            pieces: Vec::new(),
            len,
        };
        table.splice(0, 0, [Piece::new(Source::Original, 0, len)]);
        table
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Total characters ever appended (monotonic).
    pub fn append_log_len(&self) -> usize {
        self.append_log.len()
    }

    fn store(&self, source: Source) -> &[char] {
        match source {
            Source::Original => &self.original,
            Source::AppendLog => &self.append_log,
        }
    }

    /// The characters a piece refers to.
    pub fn run(&self, piece: &Piece) -> &[char] {
        &self.store(piece.source)[piece.start..piece.end()]
    }

    /// Resolve a document offset to `(piece_index, intra_offset)`.
    ///
    /// An offset on the first character of a piece resolves to that piece with
    /// intra offset 0. `offset == len()` resolves to the end boundary of the
    /// last piece, which is what appends at end-of-document rely on. An empty
    /// table resolves offset 0 to `(0, 0)`.
    pub fn locate(&self, offset: usize) -> Result<(usize, usize), TextError> {
        if offset > self.len {
            return Err(TextError::OutOfRange {
                offset,
                len: self.len,
            });
        }
        let mut remaining = offset;
        for (idx, piece) in self.pieces.iter().enumerate() {
            if remaining < piece.len {
                return Ok((idx, remaining));
            }
            remaining -= piece.len;
        }
        match self.pieces.last() {
            Some(last) => Ok((self.pieces.len() - 1, last.len)),
            None => Ok((0, 0)),
        }
    }

    /// Replace `remove` pieces at `index` with `with`, dropping any
    /// zero-length piece on the way in. Every run-list mutation goes through
    /// here so a degenerate piece can never be stored.
    fn splice<I>(&mut self, index: usize, remove: usize, with: I)
    where
        I: IntoIterator<Item = Piece>,
    {
        let replacement = with.into_iter().filter(|p| p.len > 0);
        self.pieces.splice(index..index + remove, replacement);
        debug_assert_eq!(
            self.pieces.iter().map(|p| p.len).sum::<usize>(),
            self.len,
            "piece lengths must sum to document length"
        );
    }

    /// Insert `text` so that its first character lands at `offset`.
    pub fn insert(&mut self, text: &str, offset: usize) -> Result<(), TextError> {
        let (index, intra) = self.locate(offset)?;
        let log_start = self.append_log.len();
        self.append_log.extend(text.chars());
        let added = self.append_log.len() - log_start;
        if added == 0 {
            return Ok(());
        }
        let piece = Piece::new(Source::AppendLog, log_start, added);
        self.len += added;
        if intra == 0 {
            self.splice(index, 0, [piece]);
        } else if intra == self.pieces[index].len {
            self.splice(index + 1, 0, [piece]);
        } else {
            let (left, right) = self.pieces[index].split_at(intra);
            self.splice(index, 1, [left, piece, right]);
        }
        trace!(target: "text.table", offset, added, pieces = self.pieces.len(), "insert");
        Ok(())
    }

    /// Remove the character at `offset`, returning it.
    ///
    /// Deleting the first or last character of a piece trims that edge;
    /// anything else splits the piece around the removed character.
    pub fn delete_char(&mut self, offset: usize) -> Result<char, TextError> {
        if offset >= self.len {
            return Err(TextError::OutOfRange {
                offset,
                len: self.len,
            });
        }
        let (index, intra) = self.locate(offset)?;
        let piece = self.pieces[index];
        let removed = self.run(&piece)[intra];
        self.len -= 1;
        if intra == 0 {
            self.splice(
                index,
                1,
                [Piece::new(piece.source, piece.start + 1, piece.len - 1)],
            );
        } else if intra == piece.len - 1 {
            self.splice(
                index,
                1,
                [Piece::new(piece.source, piece.start, piece.len - 1)],
            );
        } else {
            let left = Piece::new(piece.source, piece.start, intra);
            let right = Piece::new(piece.source, piece.start + intra + 1, piece.len - intra - 1);
            self.splice(index, 1, [left, right]);
        }
        trace!(target: "text.table", offset, pieces = self.pieces.len(), "delete_char");
        Ok(removed)
    }

    /// Remove `[start, end)` and return the removed text.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<String, TextError> {
        let removed = self.read(start, end)?;
        if start == end {
            return Ok(removed);
        }
        let (first_idx, first_intra) = self.locate(start)?;
        let (last_idx, last_intra) = self.locate(end)?;
        let first = self.pieces[first_idx];
        let last = self.pieces[last_idx];
        let head = Piece::new(first.source, first.start, first_intra);
        let tail = Piece::new(last.source, last.start + last_intra, last.len - last_intra);
        self.len -= end - start;
        self.splice(first_idx, last_idx - first_idx + 1, [head, tail]);
        trace!(target: "text.table", start, end, pieces = self.pieces.len(), "delete_range");
        Ok(removed)
    }

    /// Text in `[start, end)`.
    pub fn read(&self, start: usize, end: usize) -> Result<String, TextError> {
        if start > end {
            return Err(TextError::OutOfRange {
                offset: start,
                len: self.len,
            });
        }
        let (first_idx, first_intra) = self.locate(start)?;
        let (last_idx, last_intra) = self.locate(end)?;
        let mut out = String::with_capacity(end - start);
        if start == end {
            return Ok(out);
        }
        if first_idx == last_idx {
            out.extend(&self.run(&self.pieces[first_idx])[first_intra..last_intra]);
            return Ok(out);
        }
        out.extend(&self.run(&self.pieces[first_idx])[first_intra..]);
        for piece in &self.pieces[first_idx + 1..last_idx] {
            out.extend(self.run(piece));
        }
        out.extend(&self.run(&self.pieces[last_idx])[..last_intra]);
        Ok(out)
    }

    pub fn all_contents(&self) -> String {
        self.pieces.iter().flat_map(|p| self.run(p)).collect()
    }

    /// Character at `offset`, `None` at or past the end.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.len {
            return None;
        }
        let (index, intra) = self.locate(offset).ok()?;
        Some(self.run(&self.pieces[index])[intra])
    }

    /// Forward iterator over characters starting at `offset` (clamped).
    pub fn chars_from(&self, offset: usize) -> Chars<'_> {
        let (piece, intra) = self
            .locate(offset.min(self.len))
            .unwrap_or((self.pieces.len(), 0));
        Chars {
            table: self,
            piece,
            intra,
        }
    }

    /// Backward iterator yielding the characters before `offset` (clamped),
    /// nearest first.
    pub fn chars_before(&self, offset: usize) -> RevChars<'_> {
        let (piece, intra) = self.locate(offset.min(self.len)).unwrap_or((0, 0));
        RevChars {
            table: self,
            piece,
            intra,
        }
    }

    /// Emit the run list at DEBUG. Content is never logged, only descriptors.
    pub fn dump(&self) {
        tracing::debug!(
            target: "text.table",
            len = self.len,
            original_len = self.original.len(),
            append_log_len = self.append_log.len(),
            pieces = self.pieces.len(),
            "table_dump"
        );
        for (idx, piece) in self.pieces.iter().enumerate() {
            tracing::debug!(
                target: "text.table",
                idx,
                source = ?piece.source,
                start = piece.start,
                len = piece.len,
                "piece"
            );
        }
    }
}

pub struct Chars<'a> {
    table: &'a PieceTable,
    piece: usize,
    intra: usize,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            let piece = self.table.pieces.get(self.piece)?;
            if self.intra < piece.len {
                let ch = self.table.run(piece)[self.intra];
                self.intra += 1;
                return Some(ch);
            }
            self.piece += 1;
            self.intra = 0;
        }
    }
}

pub struct RevChars<'a> {
    table: &'a PieceTable,
    piece: usize,
    intra: usize,
}

impl Iterator for RevChars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if self.intra > 0 {
                self.intra -= 1;
                let piece = &self.table.pieces[self.piece];
                return Some(self.table.run(piece)[self.intra]);
            }
            if self.piece == 0 {
                return None;
            }
            self.piece -= 1;
            self.intra = self.table.pieces[self.piece].len;
        }
    }
}
