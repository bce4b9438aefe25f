//! JSON persistence of keyed stores.
//!
//! Wherever a console persists per-statement state (for example into a
//! local browser database), the store is written as a JSON object whose
//! member names are the exact `"<text>@<start>-<end>"` key strings. The
//! separator scheme is part of the persisted format: readers split on the
//! last `@` so SQL text containing `@` round-trips.

use crate::store::StatementStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialize `store` as a JSON object keyed by the key wire format.
pub fn to_json<V: Serialize>(store: &StatementStore<V>) -> serde_json::Result<String> {
    serde_json::to_string(store)
}

/// Restore a store from its JSON form.
///
/// Malformed key strings fail the whole read: a corrupt persisted key is a
/// data bug, not a state the store can run with.
pub fn from_json<V: DeserializeOwned>(json: &str) -> serde_json::Result<StatementStore<V>> {
    serde_json::from_str(json)
}
