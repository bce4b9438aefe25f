//! Statement boundary scanner.
//!
//! A single left-to-right pass over the document text, splitting it into
//! statement spans on semicolons. The scanner is deliberately not a SQL
//! parser: it tracks just enough lexical state to know when a `;` is real.
//! Quoted strings (`'...'`, backslash escapes honored), line comments
//! (`--` and `//`, to end of line) and block comments (`/*` to the first
//! `*/`, no nesting) all make their contents inert.
//!
//! The scan can be confined to a region of the document. Spans whose
//! terminating semicolon lies strictly before the region end are
//! *completed*; the span still open at the region end is scanned through to
//! its own terminator (or end of input) and reported as the *trailing* span.
//! That distinction is what lets the resolver tell "the statement just
//! finished" apart from "the statement still being typed".

use crate::buffer::{Position, TextRange};

/// Lexical state of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Outside any quote or comment.
    Plain,
    /// Inside a single-quoted string.
    Quote,
    /// Inside a `--` or `//` comment, until the next newline.
    LineComment,
    /// Inside a `/* ... */` comment.
    BlockComment,
}

/// A maximal substring of the document recognized as one SQL statement,
/// delimited by unquoted, uncommented semicolons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementSpan {
    /// Exact substring of the document covering the statement, excluding the
    /// separating semicolon.
    pub text: String,
    /// Character offset of the first meaningful character (inclusive).
    pub start_offset: usize,
    /// Character offset of the terminating semicolon, or of the end of the
    /// scanned text for a trailing span (exclusive).
    pub end_offset: usize,
    /// Position of the first meaningful character.
    pub start: Position,
    /// Position of the terminating semicolon (one past the last statement
    /// character).
    pub end: Position,
}

impl StatementSpan {
    /// Returns `true` if `row` falls within this span's row range.
    pub fn contains_row(&self, row: usize) -> bool {
        self.start.row <= row && row <= self.end.row
    }

    /// Length of the span in characters.
    pub fn char_len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    /// The span as a position range.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }

    /// Returns `true` if the half-open offset range `[start, end)` overlaps
    /// this span.
    pub fn overlaps_offsets(&self, start: usize, end: usize) -> bool {
        start < self.end_offset && self.start_offset < end
    }
}

/// Result of one scanner pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanOutcome {
    /// Spans terminated by an explicit `;` before the scan end, in document
    /// order.
    pub completed: Vec<StatementSpan>,
    /// The span still open at the scan end (or end of input), if any.
    pub trailing: Option<StatementSpan>,
}

impl ScanOutcome {
    /// All spans in document order, trailing span last.
    pub fn into_spans(self) -> Vec<StatementSpan> {
        let mut spans = self.completed;
        spans.extend(self.trailing);
        spans
    }

    /// Returns `true` if the scan produced no spans at all.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.trailing.is_none()
    }
}

/// Character walker with row/column and char-offset bookkeeping.
struct Walker<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    char_offset: usize,
    row: usize,
    column: usize,
}

impl<'a> Walker<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            char_offset: 0,
            row: 0,
            column: 1,
        }
    }

    /// Position of the next character to be consumed.
    fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let (byte, ch) = self.chars.next()?;
        self.char_offset += 1;
        if ch == '\n' {
            self.row += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some((byte, ch))
    }
}

/// Start coordinates of the span currently accumulating.
#[derive(Debug, Clone, Copy)]
struct SpanStart {
    char_offset: usize,
    byte_offset: usize,
    position: Position,
}

fn close_span(
    text: &str,
    start: SpanStart,
    end_byte: usize,
    end_offset: usize,
    end: Position,
) -> StatementSpan {
    StatementSpan {
        text: text[start.byte_offset..end_byte].to_string(),
        start_offset: start.char_offset,
        end_offset,
        start: start.position,
        end,
    }
}

/// Scan `text` for statement spans.
///
/// With no region given, the whole text is scanned from offset 0. A
/// `scan_start` confines the pass to text at or after that position (the
/// scanner walks there with plain bookkeeping and begins with fresh lexical
/// state; reported offsets stay absolute). A `scan_end` decides which spans
/// count as completed: a span whose semicolon lies at or after `scan_end` is
/// the trailing span and ends the pass.
///
/// A span starts at its first meaningful character (leading whitespace,
/// newlines, and comments are excluded), and segments with no meaningful
/// content produce no span. Consequently empty, whitespace-only, and
/// comment-only inputs all produce an empty outcome.
pub fn scan(text: &str, scan_start: Option<Position>, scan_end: Option<Position>) -> ScanOutcome {
    let mut walker = Walker::new(text);

    if let Some(start) = scan_start {
        while walker.position() < start {
            if walker.bump().is_none() {
                return ScanOutcome::default();
            }
        }
    }

    let mut state = LexState::Plain;
    let mut completed: Vec<StatementSpan> = Vec::new();
    let mut span_start: Option<SpanStart> = None;

    loop {
        let pos = walker.position();
        let offset = walker.char_offset;
        let Some((byte, ch)) = walker.bump() else {
            break;
        };
        let past_limit = scan_end.is_some_and(|limit| pos >= limit);

        match state {
            LexState::Plain => match ch {
                ';' => {
                    let span = span_start
                        .take()
                        .map(|s| close_span(text, s, byte, offset, pos));
                    if past_limit {
                        return ScanOutcome {
                            completed,
                            trailing: span,
                        };
                    }
                    if let Some(span) = span {
                        completed.push(span);
                    }
                }
                '\'' => {
                    if span_start.is_none() {
                        span_start = Some(SpanStart {
                            char_offset: offset,
                            byte_offset: byte,
                            position: pos,
                        });
                    }
                    state = LexState::Quote;
                }
                '-' if walker.peek_char() == Some('-') => {
                    walker.bump();
                    state = LexState::LineComment;
                }
                '/' if walker.peek_char() == Some('/') => {
                    walker.bump();
                    state = LexState::LineComment;
                }
                '/' if walker.peek_char() == Some('*') => {
                    walker.bump();
                    state = LexState::BlockComment;
                }
                c if c.is_whitespace() => {}
                _ => {
                    if span_start.is_none() {
                        span_start = Some(SpanStart {
                            char_offset: offset,
                            byte_offset: byte,
                            position: pos,
                        });
                    }
                }
            },
            LexState::Quote => match ch {
                '\\' => {
                    walker.bump();
                }
                '\'' => state = LexState::Plain,
                _ => {}
            },
            LexState::LineComment => {
                if ch == '\n' {
                    state = LexState::Plain;
                }
            }
            LexState::BlockComment => {
                if ch == '*' && walker.peek_char() == Some('/') {
                    walker.bump();
                    state = LexState::Plain;
                }
            }
        }
    }

    let trailing = span_start.map(|s| StatementSpan {
        text: text[s.byte_offset..].to_string(),
        start_offset: s.char_offset,
        end_offset: walker.char_offset,
        start: s.position,
        end: walker.position(),
    });

    ScanOutcome { completed, trailing }
}

/// Remove comment bodies from `text`, keeping quoted strings intact.
///
/// Line comments are dropped up to (but not including) their terminating
/// newline, so the line structure of the result matches the input. Used to
/// decide whether a clamped selection still contains anything executable.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut state = LexState::Plain;

    while let Some(ch) = chars.next() {
        match state {
            LexState::Plain => match ch {
                '\'' => {
                    out.push(ch);
                    state = LexState::Quote;
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    state = LexState::LineComment;
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = LexState::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = LexState::BlockComment;
                }
                _ => out.push(ch),
            },
            LexState::Quote => {
                out.push(ch);
                match ch {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    }
                    '\'' => state = LexState::Plain,
                    _ => {}
                }
            }
            LexState::LineComment => {
                if ch == '\n' {
                    out.push('\n');
                    state = LexState::Plain;
                }
            }
            LexState::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = LexState::Plain;
                }
            }
        }
    }

    out
}
