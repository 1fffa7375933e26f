use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::topology::ShapeKind;

use super::PersistentId;

/// Deterministic name of a shape that has no ancestor of its own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DerivedKey {
    pub kind: ShapeKind,
    pub parents: BTreeSet<PersistentId>,
    pub discriminator: usize,
}

impl DerivedKey {
    #[must_use]
    pub fn new(
        kind: ShapeKind,
        parents: impl IntoIterator<Item = PersistentId>,
        discriminator: usize,
    ) -> Self {
        Self {
            kind,
            parents: parents.into_iter().collect(),
            discriminator,
        }
    }
}

/// Memoized ids minted for derived keys.
#[derive(Debug, Clone, Default)]
pub struct DerivedStore {
    ids: BTreeMap<DerivedKey, PersistentId>,
}

impl DerivedStore {
    #[must_use]
    pub fn get(&self, key: &DerivedKey) -> Option<PersistentId> {
        self.ids.get(key).copied()
    }

    /// Returns the memoized id of `key`, minting one on first sight. The
    /// flag tells whether the id is new.
    pub fn get_or_mint(&mut self, key: DerivedKey) -> (PersistentId, bool) {
        if let Some(id) = self.ids.get(&key) {
            return (*id, false);
        }
        let id = PersistentId::random();
        self.ids.insert(key, id);
        (id, true)
    }

    pub(crate) fn insert(&mut self, key: DerivedKey, id: PersistentId) {
        self.ids.insert(key, id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DerivedKey, PersistentId)> + '_ {
        self.ids.iter().map(|(k, v)| (k, *v))
    }
}

impl fmt::Display for DerivedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "derived store ({} records)", self.len())?;
        for (key, id) in self.iter() {
            write!(f, "  {} [", key.kind)?;
            for (i, parent) in key.parents.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{parent}")?;
            }
            writeln!(f, "] #{} -> {id}", key.discriminator)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_order_does_not_matter() {
        let a = PersistentId::random();
        let b = PersistentId::random();
        let mut store = DerivedStore::default();
        let (first, minted) = store.get_or_mint(DerivedKey::new(ShapeKind::Edge, [a, b], 0));
        assert!(minted);
        let (second, minted) = store.get_or_mint(DerivedKey::new(ShapeKind::Edge, [b, a], 0));
        assert!(!minted);
        assert_eq!(first, second);

        let (other, _) = store.get_or_mint(DerivedKey::new(ShapeKind::Edge, [a, b], 1));
        assert_ne!(other, first);
        assert_eq!(store.len(), 2);
    }
}
