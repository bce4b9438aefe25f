//! Cursor and range resolution over statement spans.
//!
//! Built on the scanner: given a cursor position, decide which statement is
//! "current"; given a position range, list every statement touching it.

use crate::buffer::Position;
use crate::scanner::{StatementSpan, scan};

/// Resolve the statement the cursor refers to, if any.
///
/// Scans from the start of the document up to the cursor. The candidates are
/// the last span completed before the cursor and the span still open at the
/// cursor; whichever row range holds the cursor wins. When both hold it
/// (cursor at a `stmtA; stmtB` boundary), the open span wins: a span is only
/// completed when its terminator lies strictly before the cursor, so a
/// cursor sharing the completed span's end row is always strictly past its
/// end column. A caret exactly at a semicolon reaches the resolver with that
/// statement still open, and resolves to it.
///
/// Returns `None` when the cursor sits on a blank or comment-only line
/// between statements; callers treat that as "nothing to run".
pub fn resolve_at_cursor(text: &str, cursor: Position) -> Option<StatementSpan> {
    let outcome = scan(text, None, Some(cursor));
    let last = outcome.completed.into_iter().next_back();
    let trailing = outcome.trailing;

    match (last, trailing) {
        (_, Some(trailing)) if trailing.contains_row(cursor.row) => Some(trailing),
        (Some(last), _) if last.contains_row(cursor.row) => Some(last),
        _ => None,
    }
}

/// Every statement span overlapping `[start, end]`, in document order.
///
/// The scan is confined to the region, so the pass stays proportional to the
/// range rather than the document. A statement still open at `end` is
/// included whole.
pub fn statements_in_range(text: &str, start: Position, end: Position) -> Vec<StatementSpan> {
    scan(text, Some(start), Some(end)).into_spans()
}

/// Every statement span in the whole document, in document order.
pub fn all_statements(text: &str) -> Vec<StatementSpan> {
    scan(text, None, None).into_spans()
}

/// Statement spans touching the viewport rows `first_row..=last_row`, padded
/// by `margin_rows` on each side. Used for incremental decoration of the
/// visible region.
pub fn statements_in_viewport(
    text: &str,
    first_row: usize,
    last_row: usize,
    margin_rows: usize,
) -> Vec<StatementSpan> {
    let start = Position::new(first_row.saturating_sub(margin_rows), 1);
    let end = Position::new(last_row.saturating_add(margin_rows).saturating_add(1), 1);
    statements_in_range(text, start, end)
}

/// Statement spans starting on `row`.
pub fn statements_on_row(text: &str, row: usize) -> Vec<StatementSpan> {
    all_statements(text)
        .into_iter()
        .filter(|span| span.start.row == row)
        .collect()
}
