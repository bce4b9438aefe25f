#![warn(missing_docs)]
//! QueryPad Core - Headless SQL Statement Segmentation Engine
//!
//! # Overview
//!
//! `querypad-core` is the statement engine behind a SQL console: it takes a
//! continuously edited text buffer containing zero or more SQL statements
//! separated by `;` and answers three questions correctly under editing:
//!
//! - **Where are the statement boundaries?** Honoring quoted strings and
//!   both comment styles (`--`/`//` line comments and `/* */` blocks).
//! - **Which statement does a cursor or selection refer to?** Including the
//!   boundary cases: cursor exactly at a semicolon, between two statements,
//!   selections spanning partial statements.
//! - **How does a statement keep a stable identity while the surrounding
//!   text is edited?** So per-statement results stay attached to the right
//!   statement instead of silently pointing at stale text.
//!
//! The engine is pure and synchronous: every operation is a deterministic
//! function of the document text and a position or offset. It owns no
//! long-lived state, performs no I/O, and never mutates the text it is
//! given. It does not execute SQL, parse grammar, or highlight syntax.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Identity & Shift (identity)                │  ← Stable query keys
//! ├─────────────────────────────────────────────┤
//! │  Requests & Clamping (selection)            │  ← Execution units
//! ├─────────────────────────────────────────────┤
//! │  Cursor / Range Resolution (resolver)       │  ← "Current" statement
//! ├─────────────────────────────────────────────┤
//! │  Lexical Scanner (scanner)                  │  ← Statement boundaries
//! ├─────────────────────────────────────────────┤
//! │  Buffer Abstraction (buffer, delta)         │  ← Offsets ↔ positions
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Resolving the statement under the cursor
//!
//! ```rust
//! use querypad_core::{Position, resolve_at_cursor};
//!
//! let sql = "SELECT 1; SELECT 2;";
//!
//! // Cursor inside the first statement.
//! let span = resolve_at_cursor(sql, Position::new(0, 4)).unwrap();
//! assert_eq!(span.text, "SELECT 1");
//!
//! // Cursor immediately after the first semicolon: the next statement.
//! let span = resolve_at_cursor(sql, Position::new(0, 10)).unwrap();
//! assert_eq!(span.text, "SELECT 2");
//! ```
//!
//! ## Tracking identity across edits
//!
//! ```rust
//! use querypad_core::{DocumentBuffer, QueryKey, ShiftOutcome, shift_for_edits};
//!
//! let mut buffer = DocumentBuffer::from_text("SELECT 1;\nSELECT 2;");
//! let key = QueryKey::derive("SELECT 2", 10);
//! assert_eq!(key.to_string(), "SELECT 2@10-18");
//!
//! // Insert a line above: the statement moved, its text did not.
//! let edit = buffer.insert(0, "\n");
//! match shift_for_edits(&key, &[edit], &buffer) {
//!     ShiftOutcome::Renamed(new_key) => assert_eq!(new_key.to_string(), "SELECT 2@11-19"),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - positions, ranges, the [`TextBufferProvider`] capability
//!   set, and the Rope-backed [`DocumentBuffer`]
//! - [`delta`] - structured edit records consumed by the shift protocol
//! - [`scanner`] - the statement boundary state machine
//! - [`resolver`] - cursor and range resolution over scanned spans
//! - [`selection`] - selection clamping and per-statement requests
//! - [`identity`] - query keys, validation, and the shift protocol
//!
//! # Coordinate Conventions
//!
//! All offsets are character offsets (Unicode scalar values). Rows are
//! 0-indexed; columns are 1-indexed in characters. Offset ranges are
//! half-open, `[start, end)`.

pub mod buffer;
pub mod delta;
pub mod identity;
pub mod resolver;
pub mod scanner;
pub mod selection;

pub use buffer::{DocumentBuffer, Position, TextBufferProvider, TextRange};
pub use delta::DocumentEdit;
pub use identity::{
    KeyParseError, QueryKey, ShiftOutcome, is_valid_at, normalize_statement, shift,
    shift_for_edits,
};
pub use resolver::{
    all_statements, resolve_at_cursor, statements_in_range, statements_in_viewport,
    statements_on_row,
};
pub use scanner::{ScanOutcome, StatementSpan, scan, strip_comments};
pub use selection::{
    QuerySelection, StatementRequest, clamp_to_span, request_at_cursor, requests_for_selection,
};
