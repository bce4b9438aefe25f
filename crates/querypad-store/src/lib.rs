#![warn(missing_docs)]
//! `querypad-store` - per-statement state keyed by query identity.
//!
//! `querypad-core` produces [`QueryKey`](querypad_core::QueryKey)s; this
//! crate owns the state attached to them (execution results, error markers,
//! notification flags, conversation links) and keeps that state attached to
//! the *right* statement while the document is edited.
//!
//! The store implements the owning-store side of the shift protocol:
//! after every document mutation, [`StatementStore::apply_edits`] renames
//! keys whose statements merely moved and drops keys whose statements were
//! edited. A dropped entry is gone for good: a mismatched key is proof the
//! identity was lost, and repairing it by guesswork would attach state to
//! the wrong statement.
//!
//! Stores are serialized as a JSON object keyed by the exact
//! `"<text>@<start>-<end>"` wire format, see [`persist`].

pub mod persist;
pub mod store;

pub use persist::{from_json, to_json};
pub use store::{ApplyReport, StatementStore};
