//! End-to-end scenario: a console buffer under editing, with per-statement
//! identities surviving a pure move.

use pretty_assertions::assert_eq;
use querypad_core::{
    DocumentBuffer, Position, QueryKey, ShiftOutcome, TextBufferProvider, all_statements,
    request_at_cursor, requests_for_selection, shift_for_edits,
};

const DOC: &str = "INSERT INTO t VALUES(1); -- note\nSELECT * FROM t;";

#[test]
fn statements_split_around_the_comment() {
    let spans = all_statements(DOC);

    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].text, "INSERT INTO t VALUES(1)");
    assert_eq!(spans[0].start_offset, 0);
    assert_eq!(spans[0].end_offset, 23);
    assert_eq!(spans[1].text, "SELECT * FROM t");
    assert_eq!(spans[1].start, Position::new(1, 1));
    assert_eq!(spans[1].start_offset, 33);
}

#[test]
fn leading_newline_shifts_both_keys_and_preserves_text() {
    let mut buffer = DocumentBuffer::from_text(DOC);
    let keys: Vec<QueryKey> = all_statements(&buffer.get_text())
        .iter()
        .map(QueryKey::from_span)
        .collect();
    assert_eq!(keys[0].to_string(), "INSERT INTO t VALUES(1)@0-23");
    assert_eq!(keys[1].to_string(), "SELECT * FROM t@33-48");

    let edit = buffer.insert(0, "\n");

    for (key, expected_start) in keys.iter().zip([1usize, 34]) {
        match shift_for_edits(key, &[edit], &buffer) {
            ShiftOutcome::Renamed(new_key) => {
                assert_eq!(new_key.start, expected_start);
                assert_eq!(new_key.text, key.text);
            }
            other => panic!("expected rename for {key}, got {other:?}"),
        }
    }
}

#[test]
fn run_at_cursor_then_edit_then_run_again() {
    let mut buffer = DocumentBuffer::from_text(DOC);

    // Run the SELECT under the cursor and remember its identity.
    let request = request_at_cursor(&buffer, Position::new(1, 4)).unwrap();
    let key = QueryKey::from_span(&request.span);
    assert_eq!(key.text, "SELECT * FROM t");

    // Editing the INSERT's value is a pure move for the SELECT.
    let edit = buffer.replace(21, 1, "42");
    let outcome = shift_for_edits(&key, &[edit], &buffer);
    let ShiftOutcome::Renamed(new_key) = outcome else {
        panic!("expected rename, got {outcome:?}");
    };
    assert_eq!(new_key.text, key.text);
    assert_eq!(new_key.start, 34);

    // The renamed key still resolves to the same statement text.
    let request = request_at_cursor(&buffer, buffer.position_at(new_key.start)).unwrap();
    assert_eq!(QueryKey::from_span(&request.span), new_key);
}

#[test]
fn selection_across_both_statements_yields_two_requests() {
    let buffer = DocumentBuffer::from_text(DOC);

    // From inside the INSERT through the end of the SELECT.
    let requests = requests_for_selection(&buffer, 7, 48);

    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].span.text, "INSERT INTO t VALUES(1)");
    assert_eq!(
        requests[0].selection.as_ref().unwrap().query_text,
        "INTO t VALUES(1)"
    );
    assert_eq!(requests[1].span.text, "SELECT * FROM t");
    assert_eq!(
        requests[1].selection.as_ref().unwrap().query_text,
        "SELECT * FROM t"
    );
}

#[test]
fn selection_over_the_comment_alone_yields_no_requests() {
    let buffer = DocumentBuffer::from_text(DOC);

    // Just the "-- note" padding between the statements.
    let requests = requests_for_selection(&buffer, 24, 32);
    assert!(requests.is_empty());
}
