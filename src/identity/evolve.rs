use std::collections::{HashMap, HashSet};
use std::fmt;

use super::PersistentId;

/// Append-only log of id transitions across generations.
///
/// A pair `(in, out)` says `in` became `out`. A nil `in` is a birth, a nil
/// `out` a death. Pairs are never removed and are stored once.
#[derive(Debug, Clone, Default)]
pub struct EvolveStore {
    pairs: Vec<(PersistentId, PersistentId)>,
    present: HashSet<(PersistentId, PersistentId)>,
    forward: HashMap<PersistentId, Vec<PersistentId>>,
    backward: HashMap<PersistentId, Vec<PersistentId>>,
}

impl EvolveStore {
    /// Records `(id_in, id_out)` unless already present. Returns whether the
    /// store grew.
    pub fn insert(&mut self, id_in: PersistentId, id_out: PersistentId) -> bool {
        if !self.present.insert((id_in, id_out)) {
            return false;
        }
        self.pairs.push((id_in, id_out));
        self.forward.entry(id_in).or_default().push(id_out);
        self.backward.entry(id_out).or_default().push(id_in);
        true
    }

    /// Ids that `id` evolved into, in insertion order.
    #[must_use]
    pub fn evolve(&self, id: PersistentId) -> &[PersistentId] {
        self.forward.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Ids that evolved into `id`, in insertion order.
    #[must_use]
    pub fn devolve(&self, id: PersistentId) -> &[PersistentId] {
        self.backward.get(&id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn has_record_in(&self, id: PersistentId) -> bool {
        self.forward.contains_key(&id)
    }

    #[must_use]
    pub fn has_record_out(&self, id: PersistentId) -> bool {
        self.backward.contains_key(&id)
    }

    #[must_use]
    pub fn has_record(&self, id_in: PersistentId, id_out: PersistentId) -> bool {
        self.present.contains(&(id_in, id_out))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// All pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PersistentId, PersistentId)> + '_ {
        self.pairs.iter().copied()
    }

    /// Rewrites every pair whose `in` is `stale` to start from `fresh`.
    /// A rewritten pair that already exists is dropped.
    pub(crate) fn replace_in(&mut self, stale: PersistentId, fresh: PersistentId) {
        if stale == fresh || !self.has_record_in(stale) {
            return;
        }
        let pairs = std::mem::take(&mut self.pairs);
        *self = Self::default();
        for (id_in, id_out) in pairs {
            let id_in = if id_in == stale { fresh } else { id_in };
            self.insert(id_in, id_out);
        }
    }
}

impl fmt::Display for EvolveStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "evolve store ({} records)", self.len())?;
        for (id_in, id_out) in self.iter() {
            writeln!(f, "  {id_in} -> {id_out}")?;
        }
        Ok(())
    }
}
