//! The key-indexed statement store.

use querypad_core::{DocumentEdit, QueryKey, ShiftOutcome, TextBufferProvider, shift_for_edits};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a call to [`StatementStore::apply_edits`] did to the tracked keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Keys renamed to shifted offsets, as `(old, new)` pairs.
    pub renamed: Vec<(QueryKey, QueryKey)>,
    /// Keys dropped because their statements no longer match.
    pub dropped: Vec<QueryKey>,
}

impl ApplyReport {
    /// Returns `true` if no key was renamed or dropped.
    pub fn is_empty(&self) -> bool {
        self.renamed.is_empty() && self.dropped.is_empty()
    }
}

/// Per-statement state keyed by [`QueryKey`].
///
/// The store is the owning side of the shift protocol: keys are renamed
/// (never mutated in place) when their statements move, and entries are
/// dropped when their statements change. Everything indexing by key goes
/// through the same store so a rename retires the old key everywhere at
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementStore<V> {
    entries: BTreeMap<QueryKey, V>,
}

impl<V> StatementStore<V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach `value` to `key`, replacing any previous value.
    pub fn insert(&mut self, key: QueryKey, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// The value attached to `key`, if any.
    pub fn get(&self, key: &QueryKey) -> Option<&V> {
        self.entries.get(key)
    }

    /// Mutable access to the value attached to `key`.
    pub fn get_mut(&mut self, key: &QueryKey) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Returns `true` if `key` is tracked.
    pub fn contains_key(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Detach and return the value attached to `key`.
    pub fn remove(&mut self, key: &QueryKey) -> Option<V> {
        self.entries.remove(key)
    }

    /// Tracked keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &QueryKey> {
        self.entries.keys()
    }

    /// Tracked entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&QueryKey, &V)> {
        self.entries.iter()
    }

    /// Run the shift protocol for a batch of document edits over every
    /// tracked key.
    ///
    /// Outcomes are decided against the post-edit document first, then
    /// applied in one step, so a rename landing on a key that is itself
    /// about to be renamed cannot clobber it mid-pass. Renamed keys keep
    /// their values; invalidated keys lose them.
    pub fn apply_edits<B: TextBufferProvider + ?Sized>(
        &mut self,
        edits: &[DocumentEdit],
        buffer: &B,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();
        if edits.is_empty() {
            return report;
        }

        for key in self.entries.keys() {
            match shift_for_edits(key, edits, buffer) {
                ShiftOutcome::Unchanged => {}
                ShiftOutcome::Renamed(new_key) => {
                    report.renamed.push((key.clone(), new_key));
                }
                ShiftOutcome::Invalidated => {
                    report.dropped.push(key.clone());
                }
            }
        }

        let mut moved: Vec<(QueryKey, V)> = Vec::with_capacity(report.renamed.len());
        for (old, new) in &report.renamed {
            if let Some(value) = self.entries.remove(old) {
                log::debug!("renaming query key {old} -> {new}");
                moved.push((new.clone(), value));
            }
        }
        for old in &report.dropped {
            log::debug!("dropping invalidated query key {old}");
            self.entries.remove(old);
        }
        for (new, value) in moved {
            if self.entries.insert(new.clone(), value).is_some() {
                log::debug!("rename target {new} already tracked, keeping moved value");
            }
        }

        report
    }
}
