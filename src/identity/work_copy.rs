use crate::error::Result;
use crate::kernel::ShapeModification;
use crate::operations::transform::CopyShape;
use crate::topology::{Shape, TopologyStore};

use super::{PersistentId, ShapeIdentity};

impl ShapeIdentity<Shape> {
    /// Deep-copies the root shape and returns an identity of the copy.
    ///
    /// Every copied shape gets a fresh id, and the copy's evolve store maps
    /// each original id to its copy's id, so results of kernel algorithms run
    /// on the copy can be traced back with `devolve`.
    ///
    /// # Errors
    ///
    /// Returns an error if this identity is null or the copy fails.
    pub fn create_work_copy(&self, store: &mut TopologyStore) -> Result<ShapeIdentity<Shape>> {
        let root = *self.root_shape()?;
        let (copy_root, history) = CopyShape::new(root).execute(store)?;

        let mut copy = ShapeIdentity::new();
        copy.set_shape(store, copy_root, PersistentId::random())?;
        for (_, record) in self.records.iter() {
            let Some(successor) = history.modified(&record.shape).first().copied() else {
                continue;
            };
            let Some(key) = copy.records.key_of(&successor) else {
                continue;
            };
            let fresh = PersistentId::random();
            copy.records.set_id(key, fresh);
            if !record.id.is_nil() {
                copy.evolve.insert(record.id, fresh);
            }
        }
        copy.ensure_no_nils();
        Ok(copy)
    }
}
