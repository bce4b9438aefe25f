//! Text buffer abstraction and coordinate conversion.
//!
//! The engine never talks to a concrete editor widget. Everything it needs
//! from the hosting editor is captured by [`TextBufferProvider`]: the full
//! document text, offset ↔ position conversion, and sub-range reads. All
//! offsets are **character** offsets (Unicode scalar values), rows are
//! 0-indexed, and columns are 1-indexed in characters.
//!
//! [`DocumentBuffer`] is the bundled Rope-backed implementation, suitable for
//! tests and embeddings that do not already own a text store. Its mutation
//! methods return the [`DocumentEdit`] records consumed by the key shift
//! protocol, so it doubles as the edit-change feed.

use crate::delta::DocumentEdit;
use ropey::Rope;
use std::cmp::Ordering;

/// A caret/character position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Zero-based row (logical line index).
    pub row: usize,
    /// One-based column in characters within the row.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A position range, start inclusive, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    /// Range start position (inclusive).
    pub start: Position,
    /// Range end position (exclusive).
    pub end: Position,
}

impl TextRange {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Capability set the engine requires from the hosting editor's text buffer.
///
/// Implementations must treat out-of-bounds inputs leniently: offsets clamp
/// to the document length and positions clamp to the nearest valid location,
/// matching how editor buffers behave when a stale coordinate arrives.
pub trait TextBufferProvider {
    /// Full document text.
    fn get_text(&self) -> String;

    /// Character offset of `position`.
    fn offset_at(&self, position: Position) -> usize;

    /// Position of the character offset `offset`.
    fn position_at(&self, offset: usize) -> Position;

    /// Text covered by `range`.
    fn text_in_range(&self, range: TextRange) -> String;
}

/// Rope-backed in-memory document, the reference [`TextBufferProvider`].
///
/// Rope gives O(log n) offset ↔ position conversion, so re-validating keys
/// after every keystroke stays cheap even on large documents.
#[derive(Debug, Clone)]
pub struct DocumentBuffer {
    rope: Rope,
}

impl DocumentBuffer {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a document from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total character count.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Insert `text` at `char_offset`, returning the edit record.
    pub fn insert(&mut self, char_offset: usize, text: &str) -> DocumentEdit {
        self.replace(char_offset, 0, text)
    }

    /// Delete `len_chars` characters starting at `char_offset`, returning the
    /// edit record. The range is clamped to the document.
    pub fn delete(&mut self, char_offset: usize, len_chars: usize) -> DocumentEdit {
        self.replace(char_offset, len_chars, "")
    }

    /// Replace `removed_len` characters at `char_offset` with `inserted`,
    /// returning the edit record consumed by the shift protocol.
    pub fn replace(
        &mut self,
        char_offset: usize,
        removed_len: usize,
        inserted: &str,
    ) -> DocumentEdit {
        let start = char_offset.min(self.rope.len_chars());
        let end = start.saturating_add(removed_len).min(self.rope.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
        if !inserted.is_empty() {
            self.rope.insert(start, inserted);
        }
        DocumentEdit {
            offset: start,
            removed_len: end - start,
            inserted_len: inserted.chars().count(),
        }
    }

    fn line_char_len(&self, row: usize) -> usize {
        let line_start = self.rope.line_to_char(row);
        if row + 1 < self.rope.len_lines() {
            // Exclude the trailing newline.
            self.rope.line_to_char(row + 1) - line_start - 1
        } else {
            self.rope.len_chars() - line_start
        }
    }
}

impl Default for DocumentBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBufferProvider for DocumentBuffer {
    fn get_text(&self) -> String {
        self.rope.to_string()
    }

    fn offset_at(&self, position: Position) -> usize {
        if position.row >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let line_start = self.rope.line_to_char(position.row);
        let column = position.column.saturating_sub(1);
        line_start + column.min(self.line_char_len(position.row))
    }

    fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let row = self.rope.char_to_line(offset);
        let line_start = self.rope.line_to_char(row);
        Position::new(row, offset - line_start + 1)
    }

    fn text_in_range(&self, range: TextRange) -> String {
        let a = self.offset_at(range.start);
        let b = self.offset_at(range.end);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.rope.slice(lo..hi).to_string()
    }
}
