//! Randomized structural properties of the scanner over generated documents.

use querypad_core::{scan, strip_comments};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FRAGMENTS: &[&str] = &[
    "SELECT * FROM t",
    "INSERT INTO x VALUES (1, 'two')",
    "UPDATE t SET a = 'x;y'",
    "DELETE FROM t WHERE id = 7",
    "'quoted ; text'",
    ";",
    "\n",
    "  ",
    "-- line comment with ; inside\n",
    "// slash comment\n",
    "/* block ; comment */",
    "\n  AND flag = 'on'",
];

fn random_document(rng: &mut StdRng) -> String {
    let count = rng.gen_range(0..30);
    let mut doc = String::new();
    for _ in 0..count {
        doc.push_str(FRAGMENTS[rng.gen_range(0..FRAGMENTS.len())]);
    }
    doc
}

/// Collapse semicolons and whitespace so two renderings of the same content
/// compare equal. Applied identically to both sides of the coverage check.
fn collapse(text: &str) -> String {
    text.replace(';', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn scanning_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let doc = random_document(&mut rng);
        assert_eq!(scan(&doc, None, None), scan(&doc, None, None), "doc: {doc:?}");
    }
}

#[test]
fn spans_are_ordered_and_disjoint() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..200 {
        let doc = random_document(&mut rng);
        let spans = scan(&doc, None, None).into_spans();
        for span in &spans {
            assert!(span.start_offset < span.end_offset, "doc: {doc:?}");
        }
        for pair in spans.windows(2) {
            assert!(
                pair[0].end_offset <= pair[1].start_offset,
                "overlap in doc: {doc:?}"
            );
        }
    }
}

#[test]
fn spans_cover_all_meaningful_content() {
    let mut rng = StdRng::seed_from_u64(47);
    for _ in 0..200 {
        let doc = random_document(&mut rng);
        let spans = scan(&doc, None, None).into_spans();

        let from_spans = spans
            .iter()
            .map(|span| strip_comments(&span.text))
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(
            collapse(&strip_comments(&doc)),
            collapse(&from_spans),
            "doc: {doc:?}"
        );
    }
}
