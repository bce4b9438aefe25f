//! Stable query identity and the shift protocol.
//!
//! A [`QueryKey`] names one statement *instance*: its normalized text plus
//! the character offsets it occupied when derived. The composite survives
//! serialization without a side table, and the text component lets a pure
//! move (another statement inserted earlier in the document) be told apart
//! from an edit of the statement itself.
//!
//! The wire format is `"<normalizedText>@<start>-<end>"`. SQL text may
//! contain `@`, so parsing splits on the **last** `@`; stores that persist
//! keys rely on this exact separator scheme.
//!
//! After a document mutation, [`shift_for_edits`] decides each tracked key's
//! fate: untouched, renamed to shifted offsets, or invalidated. Validation
//! failure is authoritative; the owning store drops the associated state
//! rather than guessing.

use crate::buffer::TextBufferProvider;
use crate::delta::DocumentEdit;
use crate::scanner::scan;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Normalize statement text for identity purposes: trim surrounding
/// whitespace and strip one trailing semicolon.
pub fn normalize_statement(text: &str) -> String {
    let trimmed = text.trim();
    let stripped = trimmed.strip_suffix(';').unwrap_or(trimmed);
    stripped.trim_end().to_string()
}

/// Errors produced when parsing a serialized query key.
///
/// Unlike every other "no result" state in the engine, a malformed key
/// string indicates a caller bug or data corruption and fails loudly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// No `@` separator between text and offsets.
    #[error("query key is missing the '@' separator")]
    MissingTextSeparator,
    /// No `-` separator between the two offsets.
    #[error("query key is missing the '-' offset separator")]
    MissingOffsetSeparator,
    /// An offset failed to parse as an integer.
    #[error("query key has a malformed offset: {0}")]
    MalformedOffset(#[from] std::num::ParseIntError),
    /// The end offset precedes the start offset.
    #[error("query key offsets are out of order: {start}-{end}")]
    OffsetOrder {
        /// Parsed start offset.
        start: usize,
        /// Parsed end offset.
        end: usize,
    },
}

/// Stable, serializable identity of one statement instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    /// Normalized statement text.
    pub text: String,
    /// Character offset the statement started at when derived (inclusive).
    pub start: usize,
    /// `start` plus the normalized text length in characters (exclusive).
    pub end: usize,
}

impl QueryKey {
    /// Derive the key for statement `text` starting at `start_offset`.
    pub fn derive(text: &str, start_offset: usize) -> Self {
        let text = normalize_statement(text);
        let end = start_offset + text.chars().count();
        Self {
            text,
            start: start_offset,
            end,
        }
    }

    /// Derive the key for a scanned statement span.
    pub fn from_span(span: &crate::scanner::StatementSpan) -> Self {
        Self::derive(&span.text, span.start_offset)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}-{}", self.text, self.start, self.end)
    }
}

impl FromStr for QueryKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (text, offsets) = s.rsplit_once('@').ok_or(KeyParseError::MissingTextSeparator)?;
        let (start, end) = offsets
            .split_once('-')
            .ok_or(KeyParseError::MissingOffsetSeparator)?;
        let start: usize = start.parse()?;
        let end: usize = end.parse()?;
        if end < start {
            return Err(KeyParseError::OffsetOrder { start, end });
        }
        Ok(Self {
            text: text.to_string(),
            start,
            end,
        })
    }
}

impl Serialize for QueryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QueryKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Returns `true` if re-scanning the live document at `key.start` reproduces
/// a statement whose normalized text equals the key's text.
pub fn is_valid_at<B: TextBufferProvider + ?Sized>(key: &QueryKey, buffer: &B) -> bool {
    let text = buffer.get_text();
    if key.start > text.chars().count() {
        return false;
    }
    let position = buffer.position_at(key.start);
    let outcome = scan(&text, Some(position), None);
    let first = outcome.completed.into_iter().next().or(outcome.trailing);
    first.is_some_and(|span| normalize_statement(&span.text) == key.text)
}

/// Shift a key for a single edit of `delta` characters at `edit_offset`.
///
/// Only keys positioned at or after the edit point move; the text never
/// changes. The shifted key is a new identity, and the caller retires the
/// old one.
pub fn shift(key: &QueryKey, edit_offset: usize, delta: isize) -> QueryKey {
    if key.start >= edit_offset {
        QueryKey {
            text: key.text.clone(),
            start: key.start.saturating_add_signed(delta),
            end: key.end.saturating_add_signed(delta),
        }
    } else {
        key.clone()
    }
}

/// What became of a tracked key after a batch of edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftOutcome {
    /// The key still matches the live document at its current offsets.
    Unchanged,
    /// The statement moved; the old key must be renamed to this one.
    Renamed(QueryKey),
    /// The statement's own text changed; associated state must be dropped.
    Invalidated,
}

/// Run the shift protocol for one key against a batch of document edits.
///
/// Keys ending before the earliest-affected offset cannot have changed and
/// are left untouched without re-validation. Otherwise the net character
/// delta of every edit preceding the key's end offset is accumulated,
/// applied via [`shift`], and the candidate re-validated against the live
/// document.
pub fn shift_for_edits<B: TextBufferProvider + ?Sized>(
    key: &QueryKey,
    edits: &[DocumentEdit],
    buffer: &B,
) -> ShiftOutcome {
    let Some(earliest) = edits.iter().map(|edit| edit.offset).min() else {
        return ShiftOutcome::Unchanged;
    };
    if key.end < earliest {
        return ShiftOutcome::Unchanged;
    }

    let mut delta: isize = 0;
    let mut anchor = usize::MAX;
    for edit in edits {
        if edit.offset < key.end {
            delta += edit.net_delta();
            anchor = anchor.min(edit.offset);
        }
    }
    let candidate = if anchor == usize::MAX {
        key.clone()
    } else {
        shift(key, anchor, delta)
    };

    if !is_valid_at(&candidate, buffer) {
        return ShiftOutcome::Invalidated;
    }
    if candidate == *key {
        ShiftOutcome::Unchanged
    } else {
        ShiftOutcome::Renamed(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::DocumentBuffer;

    #[test]
    fn test_normalize_statement() {
        assert_eq!(normalize_statement("  SELECT 1;  "), "SELECT 1");
        assert_eq!(normalize_statement("SELECT 1 ; "), "SELECT 1");
        assert_eq!(normalize_statement("SELECT 1"), "SELECT 1");
        assert_eq!(normalize_statement("  \n "), "");
    }

    #[test]
    fn test_derive_and_display() {
        let key = QueryKey::derive("SELECT 1;", 0);
        assert_eq!(key.to_string(), "SELECT 1@0-8");

        let key = QueryKey::derive("  SELECT 2  ", 10);
        assert_eq!(key.to_string(), "SELECT 2@10-18");
    }

    #[test]
    fn test_parse_round_trip() {
        let key = QueryKey::derive("SELECT 'x@y' FROM t;", 42);
        let parsed: QueryKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_parse_splits_on_last_at_sign() {
        let parsed: QueryKey = "SELECT email@domain@5-25".parse().unwrap();
        assert_eq!(parsed.text, "SELECT email@domain");
        assert_eq!(parsed.start, 5);
        assert_eq!(parsed.end, 25);
    }

    #[test]
    fn test_parse_failures_are_loud() {
        assert_eq!(
            "no separator".parse::<QueryKey>(),
            Err(KeyParseError::MissingTextSeparator)
        );
        assert_eq!(
            "text@12".parse::<QueryKey>(),
            Err(KeyParseError::MissingOffsetSeparator)
        );
        assert!(matches!(
            "text@a-b".parse::<QueryKey>(),
            Err(KeyParseError::MalformedOffset(_))
        ));
        assert_eq!(
            "text@9-3".parse::<QueryKey>(),
            Err(KeyParseError::OffsetOrder { start: 9, end: 3 })
        );
    }

    #[test]
    fn test_shift_moves_keys_at_or_after_edit() {
        let key = QueryKey::derive("SELECT", 10);

        let shifted = shift(&key, 2, 3);
        assert_eq!(shifted.start, 13);
        assert_eq!(shifted.end, 19);
        assert_eq!(shifted.text, key.text);

        let unchanged = shift(&key, 15, 3);
        assert_eq!(unchanged, key);
    }

    #[test]
    fn test_is_valid_at() {
        let buffer = DocumentBuffer::from_text("SELECT 1;\nSELECT 2;");

        assert!(is_valid_at(&QueryKey::derive("SELECT 1", 0), &buffer));
        assert!(is_valid_at(&QueryKey::derive("SELECT 2", 10), &buffer));
        assert!(!is_valid_at(&QueryKey::derive("SELECT 9", 10), &buffer));
        assert!(!is_valid_at(&QueryKey::derive("SELECT 1", 999), &buffer));
    }

    #[test]
    fn test_shift_for_edits_pure_move() {
        let mut buffer = DocumentBuffer::from_text("SELECT 1;\nSELECT 2;");
        let key = QueryKey::derive("SELECT 2", 10);

        let edit = buffer.insert(0, "-- header\n");
        let outcome = shift_for_edits(&key, &[edit], &buffer);

        let ShiftOutcome::Renamed(new_key) = outcome else {
            panic!("expected rename, got {outcome:?}");
        };
        assert_eq!(new_key.start, 20);
        assert_eq!(new_key.end, 28);
        assert_eq!(new_key.text, "SELECT 2");
    }

    #[test]
    fn test_shift_for_edits_untouched_before_edit() {
        let mut buffer = DocumentBuffer::from_text("SELECT 1;\nSELECT 2;");
        let key = QueryKey::derive("SELECT 1", 0);

        let edit = buffer.insert(10, "X");
        assert_eq!(shift_for_edits(&key, &[edit], &buffer), ShiftOutcome::Unchanged);
    }

    #[test]
    fn test_shift_for_edits_edit_inside_statement_invalidates() {
        let mut buffer = DocumentBuffer::from_text("SELECT 1;\nSELECT 2;");
        let key = QueryKey::derive("SELECT 2", 10);

        let edit = buffer.insert(17, "9");
        assert_eq!(
            shift_for_edits(&key, &[edit], &buffer),
            ShiftOutcome::Invalidated
        );
    }

    #[test]
    fn test_shift_for_edits_accumulates_batch_delta() {
        let mut buffer = DocumentBuffer::from_text("a;\nb;\nSELECT 3;");
        let key = QueryKey::derive("SELECT 3", 6);

        // Two inserts before the statement, applied in order.
        let first = buffer.insert(0, "xx");
        let second = buffer.insert(3, "yyy");
        let outcome = shift_for_edits(&key, &[first, second], &buffer);

        let ShiftOutcome::Renamed(new_key) = outcome else {
            panic!("expected rename, got {outcome:?}");
        };
        assert_eq!(new_key.start, 11);
        assert_eq!(new_key.text, "SELECT 3");
    }

    #[test]
    fn test_serde_uses_wire_format() {
        let key = QueryKey::derive("SELECT 1", 4);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"SELECT 1@4-12\"");

        let back: QueryKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
