//! Safety nets run after matching: nothing is left nil and no id is shared.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use tracing::warn;

use super::{PersistentId, ShapeIdentity};

impl<S> ShapeIdentity<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    /// Gives every nil record a fresh id with a birth record. Returns the
    /// number of records repaired.
    pub fn ensure_no_nils(&mut self) -> usize {
        let nils: Vec<_> = self
            .records
            .iter()
            .filter(|(_, r)| r.id.is_nil())
            .map(|(k, _)| k)
            .collect();
        for key in &nils {
            let id = PersistentId::random();
            self.evolve.insert(PersistentId::nil(), id);
            self.records.set_id(*key, id);
        }
        if !nils.is_empty() {
            warn!(count = nils.len(), "assigned ids to unidentified shapes");
        }
        nils.len()
    }

    /// Gives every record that repeats an id held by an earlier record (in
    /// offset order) a fresh id with a birth record. Returns the number of
    /// records repaired.
    pub fn ensure_no_duplicates(&mut self) -> usize {
        let mut seen = HashSet::new();
        let repeats: Vec<_> = self
            .records
            .iter()
            .filter(|(_, r)| !r.id.is_nil() && !seen.insert(r.id))
            .map(|(k, _)| k)
            .collect();
        for key in &repeats {
            let id = PersistentId::random();
            self.evolve.insert(PersistentId::nil(), id);
            self.records.set_id(*key, id);
        }
        if !repeats.is_empty() {
            warn!(count = repeats.len(), "reassigned duplicated ids");
        }
        repeats.len()
    }

    /// Logs every shape that is still nil. Changes nothing.
    pub fn dump_nils(&self, label: &str) {
        for (_, record) in self.records.iter().filter(|(_, r)| r.id.is_nil()) {
            warn!(
                label,
                kind = %record.kind,
                offset = record.offset,
                shape = ?record.shape,
                "nil id"
            );
        }
    }

    /// Logs every id held by more than one shape. Changes nothing.
    pub fn dump_duplicates(&self, label: &str) {
        let mut reported = HashSet::new();
        for (_, record) in self.records.iter() {
            if record.id.is_nil() || !reported.insert(record.id) {
                continue;
            }
            let holders = self.records.keys_with(record.id);
            if holders.len() < 2 {
                continue;
            }
            let offsets: Vec<usize> = holders
                .iter()
                .filter_map(|k| self.records.offset(*k))
                .collect();
            warn!(label, id = %record.id, ?offsets, "duplicated id");
        }
    }

    /// Whether every record has an id and no id is held twice.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .all(|(_, r)| !r.id.is_nil() && seen.insert(r.id))
    }
}
