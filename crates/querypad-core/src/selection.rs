//! Selection clamping and per-statement execution requests.
//!
//! A user selection may cover part of one statement, several statements, or
//! nothing but the padding between them. Execution wants one request per
//! statement, each carrying at most the selected sub-range of that
//! statement, with requests that select nothing executable dropped.

use crate::buffer::{Position, TextBufferProvider, TextRange};
use crate::resolver::{all_statements, resolve_at_cursor};
use crate::scanner::{StatementSpan, strip_comments};

/// A user-selected sub-range clamped to one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySelection {
    /// Inclusive start character offset.
    pub start_offset: usize,
    /// Exclusive end character offset.
    pub end_offset: usize,
    /// The selected text.
    pub query_text: String,
}

impl QuerySelection {
    /// The selection as a position range, via the buffer provider.
    pub fn to_range<B: TextBufferProvider + ?Sized>(&self, buffer: &B) -> TextRange {
        TextRange::new(
            buffer.position_at(self.start_offset),
            buffer.position_at(self.end_offset),
        )
    }
}

/// One statement's worth of an execution request: the enclosing span plus an
/// optional clamped selection for partial execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRequest {
    /// The enclosing statement span.
    pub span: StatementSpan,
    /// The selected sub-range within the span, if the request came from a
    /// selection rather than a bare cursor.
    pub selection: Option<QuerySelection>,
}

/// Intersect a selection's offset range with a statement span.
///
/// Returns `None` when the intersection is empty or contains nothing but
/// whitespace and comments, so a selection grazing the padding between
/// statements never produces a spurious partial execution.
pub fn clamp_to_span(
    span: &StatementSpan,
    selection_start: usize,
    selection_end: usize,
) -> Option<QuerySelection> {
    let (sel_lo, sel_hi) = if selection_start <= selection_end {
        (selection_start, selection_end)
    } else {
        (selection_end, selection_start)
    };

    let start = span.start_offset.max(sel_lo);
    let end = span.end_offset.min(sel_hi);
    if start >= end {
        return None;
    }

    let query_text: String = span
        .text
        .chars()
        .skip(start - span.start_offset)
        .take(end - start)
        .collect();
    if strip_comments(&query_text).trim().is_empty() {
        return None;
    }

    Some(QuerySelection {
        start_offset: start,
        end_offset: end,
        query_text,
    })
}

/// Build one request per statement overlapping the selection.
///
/// Every span from the first statement overlapping the selection start
/// through the last overlapping its end is clamped against the selection;
/// empty clamps are dropped. Spans come from a whole-document scan so each
/// request carries the complete statement even when the selection starts in
/// its middle.
pub fn requests_for_selection<B: TextBufferProvider + ?Sized>(
    buffer: &B,
    selection_start: usize,
    selection_end: usize,
) -> Vec<StatementRequest> {
    let (sel_lo, sel_hi) = if selection_start <= selection_end {
        (selection_start, selection_end)
    } else {
        (selection_end, selection_start)
    };

    let text = buffer.get_text();
    all_statements(&text)
        .into_iter()
        .filter(|span| span.overlaps_offsets(sel_lo, sel_hi))
        .filter_map(|span| {
            clamp_to_span(&span, sel_lo, sel_hi).map(|selection| StatementRequest {
                span,
                selection: Some(selection),
            })
        })
        .collect()
}

/// Build the request for a bare cursor: the resolved statement, no clamp.
pub fn request_at_cursor<B: TextBufferProvider + ?Sized>(
    buffer: &B,
    cursor: Position,
) -> Option<StatementRequest> {
    let text = buffer.get_text();
    resolve_at_cursor(&text, cursor).map(|span| StatementRequest {
        span,
        selection: None,
    })
}
