use std::collections::HashMap;
use std::hash::Hash;

use slotmap::{SecondaryMap, SlotMap};

use crate::topology::ShapeKind;

use super::PersistentId;

slotmap::new_key_type! {
    /// Handle of a shape record within one generation.
    pub struct RecordKey;
}

/// The link between one distinct sub-shape and its persistent id.
#[derive(Debug, Clone)]
pub struct ShapeRecord<S> {
    pub id: PersistentId,
    pub shape: S,
    pub kind: ShapeKind,
    /// Position in decomposition order.
    pub offset: usize,
}

/// Records of the current generation with O(1) lookup by id and by shape.
///
/// Records are kept in decomposition order (the offset order). Several
/// records may transiently share an id while the matching passes run.
#[derive(Debug, Clone)]
pub(crate) struct RecordStore<S> {
    records: SlotMap<RecordKey, ShapeRecord<S>>,
    order: Vec<RecordKey>,
    by_id: HashMap<PersistentId, Vec<RecordKey>>,
    by_shape: HashMap<S, RecordKey>,
    outer_wires: SecondaryMap<RecordKey, RecordKey>,
}

impl<S> Default for RecordStore<S> {
    fn default() -> Self {
        Self {
            records: SlotMap::with_key(),
            order: Vec::new(),
            by_id: HashMap::new(),
            by_shape: HashMap::new(),
            outer_wires: SecondaryMap::new(),
        }
    }
}

impl<S: Clone + Eq + Hash> RecordStore<S> {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns the record of `shape`, inserting a nil one if absent. The
    /// flag tells whether the record is new.
    pub(crate) fn get_or_insert(&mut self, shape: &S, kind: ShapeKind) -> (RecordKey, bool) {
        if let Some(&key) = self.by_shape.get(shape) {
            return (key, false);
        }
        let key = self.records.insert(ShapeRecord {
            id: PersistentId::nil(),
            shape: shape.clone(),
            kind,
            offset: self.order.len(),
        });
        self.order.push(key);
        self.by_shape.insert(shape.clone(), key);
        self.by_id.entry(PersistentId::nil()).or_default().push(key);
        (key, true)
    }

    pub(crate) fn get(&self, key: RecordKey) -> Option<&ShapeRecord<S>> {
        self.records.get(key)
    }

    pub(crate) fn key_of(&self, shape: &S) -> Option<RecordKey> {
        self.by_shape.get(shape).copied()
    }

    /// Keys holding `id`, in offset order.
    pub(crate) fn keys_with(&self, id: PersistentId) -> &[RecordKey] {
        self.by_id.get(&id).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn first_with(&self, id: PersistentId) -> Option<RecordKey> {
        self.keys_with(id).first().copied()
    }

    pub(crate) fn has_id(&self, id: PersistentId) -> bool {
        !self.keys_with(id).is_empty()
    }

    pub(crate) fn id(&self, key: RecordKey) -> PersistentId {
        self.records.get(key).map_or(PersistentId::nil(), |r| r.id)
    }

    pub(crate) fn kind(&self, key: RecordKey) -> Option<ShapeKind> {
        self.records.get(key).map(|r| r.kind)
    }

    /// Reassigns the id of a record, keeping the id index in offset order.
    pub(crate) fn set_id(&mut self, key: RecordKey, id: PersistentId) {
        let Some(record) = self.records.get_mut(key) else {
            return;
        };
        let old = std::mem::replace(&mut record.id, id);
        if old == id {
            return;
        }
        if let Some(keys) = self.by_id.get_mut(&old) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.by_id.remove(&old);
            }
        }
        let records = &self.records;
        let keys = self.by_id.entry(id).or_default();
        keys.push(key);
        keys.sort_by_key(|k| records.get(*k).map_or(usize::MAX, |r| r.offset));
    }

    /// Keys in offset order.
    pub(crate) fn keys(&self) -> &[RecordKey] {
        &self.order
    }

    /// Records in offset order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (RecordKey, &ShapeRecord<S>)> + '_ {
        self.order
            .iter()
            .filter_map(|k| self.records.get(*k).map(|r| (*k, r)))
    }

    pub(crate) fn keys_of_kind(&self, kind: ShapeKind) -> Vec<RecordKey> {
        self.iter()
            .filter(|(_, r)| r.kind == kind)
            .map(|(k, _)| k)
            .collect()
    }

    pub(crate) fn set_outer_wire(&mut self, face: RecordKey, wire: RecordKey) {
        self.outer_wires.insert(face, wire);
    }

    pub(crate) fn outer_wire(&self, face: RecordKey) -> Option<RecordKey> {
        self.outer_wires.get(face).copied()
    }

    /// Offset of a record in decomposition order.
    pub(crate) fn offset(&self, key: RecordKey) -> Option<usize> {
        self.records.get(key).map(|r| r.offset)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lookups_follow_reassignment() {
        let mut store: RecordStore<u32> = RecordStore::default();
        let (a, fresh) = store.get_or_insert(&10, ShapeKind::Face);
        assert!(fresh);
        let (b, _) = store.get_or_insert(&20, ShapeKind::Face);
        let (again, fresh) = store.get_or_insert(&10, ShapeKind::Face);
        assert_eq!(again, a);
        assert!(!fresh);
        assert_eq!(store.keys_with(PersistentId::nil()), &[a, b]);

        let id = PersistentId::random();
        store.set_id(b, id);
        store.set_id(a, id);
        // Offset order, not assignment order.
        assert_eq!(store.keys_with(id), &[a, b]);
        assert!(!store.has_id(PersistentId::nil()));

        store.set_id(a, PersistentId::nil());
        assert_eq!(store.keys_with(id), &[b]);
        assert_eq!(store.first_with(PersistentId::nil()), Some(a));
        assert_eq!(store.key_of(&20), Some(b));
        assert_eq!(store.offset(b), Some(1));
    }
}
