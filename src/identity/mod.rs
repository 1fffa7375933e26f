//! Persistent identity of sub-shapes across recomputations.
//!
//! A [`ShapeIdentity`] belongs to one feature. Every time the feature
//! recomputes, [`ShapeIdentity::set_shape`] rebuilds the records of the new
//! generation with nil ids, the matching passes in [`pipeline`] recover ids
//! from the feature's inputs, and the repair passes guarantee that every
//! record ends up with a distinct id. The evolve, derived and tag stores
//! persist across generations.
//!
//! Id-keyed queries are only meaningful once the pipeline has completed;
//! in between, records may be nil or share ids.

mod derived;
mod dump;
mod evolve;
mod graph;
mod id;
mod matching;
mod navigate;
pub mod pipeline;
mod record;
mod repair;
mod serial;
mod tag;
mod work_copy;

pub use derived::{DerivedKey, DerivedStore};
pub use evolve::EvolveStore;
pub use id::PersistentId;
pub use pipeline::{Pipeline, PipelineConfig, RepairReport};
pub use record::{RecordKey, ShapeRecord};
pub use serial::SerialShapeIdentity;
pub use tag::FeatureTagStore;

use std::fmt;
use std::hash::Hash;

use tracing::{debug, warn};

use crate::error::{IdentityError, Result};
use crate::history::ShapeHistory;
use crate::kernel::Kernel;
use crate::topology::{Shape, ShapeKind};

use graph::{Direction, TopologyGraph};
use record::RecordStore;

/// Identity state of one feature's output shape.
#[derive(Debug, Clone)]
pub struct ShapeIdentity<S = Shape> {
    records: RecordStore<S>,
    graph: TopologyGraph,
    root: Option<RecordKey>,
    evolve: EvolveStore,
    derived: DerivedStore,
    tags: FeatureTagStore,
}

impl<S> Default for ShapeIdentity<S> {
    fn default() -> Self {
        Self {
            records: RecordStore::default(),
            graph: TopologyGraph::default(),
            root: None,
            evolve: EvolveStore::default(),
            derived: DerivedStore::default(),
            tags: FeatureTagStore::default(),
        }
    }
}

impl<S> ShapeIdentity<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current generation with the decomposition of `shape`.
    ///
    /// Every distinct sub-shape gets one nil record, in depth-first pre-order
    /// with the first occurrence winning; the root gets `root_id`. The
    /// evolve, derived and tag stores are kept.
    ///
    /// # Errors
    ///
    /// Returns the kernel's error if decomposition fails; the identity is
    /// then null.
    pub fn set_shape<K>(&mut self, kernel: &K, shape: S, root_id: PersistentId) -> Result<()>
    where
        K: Kernel<Shape = S>,
    {
        self.reset();
        let result = self.decompose(kernel, &shape);
        match result {
            Ok(root) => {
                self.root = Some(root);
                self.records.set_id(root, root_id);
                debug!(records = self.records.len(), root = %root_id, "shape decomposed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "shape decomposition failed");
                self.reset();
                Err(err)
            }
        }
    }

    fn decompose<K>(&mut self, kernel: &K, shape: &S) -> Result<RecordKey>
    where
        K: Kernel<Shape = S>,
    {
        let (root, _) = self.records.get_or_insert(shape, kernel.shape_kind(shape));
        self.visit(kernel, root, shape)?;
        Ok(root)
    }

    fn visit<K>(&mut self, kernel: &K, key: RecordKey, shape: &S) -> Result<()>
    where
        K: Kernel<Shape = S>,
    {
        for child in kernel.sub_shapes(shape)? {
            let (child_key, fresh) = self.records.get_or_insert(&child, kernel.shape_kind(&child));
            self.graph.connect(key, child_key);
            if fresh {
                self.visit(kernel, child_key, &child)?;
            }
        }
        if kernel.shape_kind(shape) == ShapeKind::Face {
            if let Some(wire) = kernel.outer_wire(shape)? {
                if let Some(wire_key) = self.records.key_of(&wire) {
                    self.records.set_outer_wire(key, wire_key);
                }
            }
        }
        Ok(())
    }

    /// Drops the current generation. Evolve, derived and tag stores are kept.
    pub fn reset(&mut self) {
        self.records.clear();
        self.graph.clear();
        self.root = None;
    }

    /// Whether there is no current generation.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.root.is_none()
    }

    /// The root shape of the current generation.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NullShape`] if the identity is null.
    pub fn root_shape(&self) -> Result<&S> {
        self.root
            .and_then(|k| self.records.get(k))
            .map(|r| &r.shape)
            .ok_or_else(|| IdentityError::NullShape.into())
    }

    /// The id of the root shape; nil when the identity is null.
    #[must_use]
    pub fn root_shape_id(&self) -> PersistentId {
        self.root.map_or(PersistentId::nil(), |k| self.records.id(k))
    }

    /// Reassigns the root id.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NullShape`] if the identity is null.
    pub fn set_root_shape_id(&mut self, id: PersistentId) -> Result<()> {
        let root = self.root.ok_or(IdentityError::NullShape)?;
        self.records.set_id(root, id);
        Ok(())
    }

    #[must_use]
    pub fn has_id(&self, id: PersistentId) -> bool {
        self.records.has_id(id)
    }

    #[must_use]
    pub fn has_shape(&self, shape: &S) -> bool {
        self.records.key_of(shape).is_some()
    }

    /// The shape holding `id`; the first in offset order if several do.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::IdNotFound`] if no record holds `id`.
    pub fn find_shape(&self, id: PersistentId) -> Result<&S> {
        self.records
            .first_with(id)
            .and_then(|k| self.records.get(k))
            .map(|r| &r.shape)
            .ok_or_else(|| IdentityError::IdNotFound(id).into())
    }

    /// The id of `shape`, possibly nil.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::ShapeNotFound`] if `shape` is not part of the
    /// current generation.
    pub fn find_id(&self, shape: &S) -> Result<PersistentId> {
        let key = self.key_of(shape)?;
        Ok(self.records.id(key))
    }

    /// The kind of the shape holding `id`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::IdNotFound`] if no record holds `id`.
    pub fn kind_of(&self, id: PersistentId) -> Result<ShapeKind> {
        let key = self.key_with(id)?;
        self.records
            .kind(key)
            .ok_or_else(|| IdentityError::IdNotFound(id).into())
    }

    /// Assigns `id` to `shape`, overwriting whatever it held.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::ShapeNotFound`] if `shape` is not part of the
    /// current generation.
    pub fn update_id(&mut self, shape: &S, id: PersistentId) -> Result<()> {
        let key = self.key_of(shape)?;
        self.records.set_id(key, id);
        Ok(())
    }

    /// Every id, in offset order; nil and duplicated ids included.
    #[must_use]
    pub fn all_shape_ids(&self) -> Vec<PersistentId> {
        self.records.iter().map(|(_, r)| r.id).collect()
    }

    /// Every shape, in offset order.
    #[must_use]
    pub fn all_shapes(&self) -> Vec<S> {
        self.records.iter().map(|(_, r)| r.shape.clone()).collect()
    }

    /// Every shape that still has a nil id, in offset order.
    #[must_use]
    pub fn all_nil_shapes(&self) -> Vec<S> {
        self.records
            .iter()
            .filter(|(_, r)| r.id.is_nil())
            .map(|(_, r)| r.shape.clone())
            .collect()
    }

    /// Records of the current generation, in offset order.
    pub fn records(&self) -> impl Iterator<Item = &ShapeRecord<S>> + '_ {
        self.records.iter().map(|(_, r)| r)
    }

    /// Ids of the containers of kind `kind` above the shape holding `id`,
    /// nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::IdNotFound`] if no record holds `id`.
    pub fn parents_of_type(&self, id: PersistentId, kind: ShapeKind) -> Result<Vec<PersistentId>> {
        let key = self.key_with(id)?;
        Ok(self.ids(&self.walk_kind(key, Direction::Up, kind)))
    }

    /// Ids of the contained shapes of kind `kind` below the shape holding
    /// `id`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::IdNotFound`] if no record holds `id`.
    pub fn children_of_type(&self, id: PersistentId, kind: ShapeKind) -> Result<Vec<PersistentId>> {
        let key = self.key_with(id)?;
        Ok(self.ids(&self.walk_kind(key, Direction::Down, kind)))
    }

    /// Shape-keyed variant of [`Self::parents_of_type`].
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::ShapeNotFound`] if `shape` is not part of the
    /// current generation.
    pub fn shape_parents_of_type(&self, shape: &S, kind: ShapeKind) -> Result<Vec<S>> {
        let key = self.key_of(shape)?;
        Ok(self.shapes(&self.walk_kind(key, Direction::Up, kind)))
    }

    /// Shape-keyed variant of [`Self::children_of_type`].
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::ShapeNotFound`] if `shape` is not part of the
    /// current generation.
    pub fn shape_children_of_type(&self, shape: &S, kind: ShapeKind) -> Result<Vec<S>> {
        let key = self.key_of(shape)?;
        Ok(self.shapes(&self.walk_kind(key, Direction::Down, kind)))
    }

    // --- Evolve store ---

    /// Records `(id_in, id_out)` unless already present.
    pub fn insert_evolve(&mut self, id_in: PersistentId, id_out: PersistentId) {
        self.evolve.insert(id_in, id_out);
    }

    #[must_use]
    pub fn evolve(&self, id: PersistentId) -> Vec<PersistentId> {
        self.evolve.evolve(id).to_vec()
    }

    #[must_use]
    pub fn devolve(&self, id: PersistentId) -> Vec<PersistentId> {
        self.evolve.devolve(id).to_vec()
    }

    #[must_use]
    pub fn has_evolve_record_in(&self, id: PersistentId) -> bool {
        self.evolve.has_record_in(id)
    }

    #[must_use]
    pub fn has_evolve_record_out(&self, id: PersistentId) -> bool {
        self.evolve.has_record_out(id)
    }

    #[must_use]
    pub fn has_evolve_record(&self, id_in: PersistentId, id_out: PersistentId) -> bool {
        self.evolve.has_record(id_in, id_out)
    }

    #[must_use]
    pub fn evolve_store(&self) -> &EvolveStore {
        &self.evolve
    }

    #[must_use]
    pub fn derived_store(&self) -> &DerivedStore {
        &self.derived
    }

    #[must_use]
    pub fn tag_store(&self) -> &FeatureTagStore {
        &self.tags
    }

    /// Projects the transitions that produced the current generation into a
    /// project-wide history under `feature_id`.
    ///
    /// Pairs whose `out` is nil or not part of the current generation are
    /// left out: they belong to other generations.
    pub fn fill_in_history(&self, history: &mut ShapeHistory, feature_id: PersistentId) {
        for (id_in, id_out) in self.evolve.iter() {
            if id_out.is_nil() || !self.has_id(id_out) {
                continue;
            }
            if !id_in.is_nil() && !history.has_shape(id_in) {
                warn!(id = %id_in, feature = %feature_id, "input id missing from shape history");
            }
            if !history.has_shape(id_out) {
                history.add_shape(feature_id, id_out);
            }
            if history.has_shape(id_in) {
                if let Err(err) = history.add_connection(id_out, id_in) {
                    warn!(error = %err, "cannot connect shape history");
                }
            }
        }
    }

    /// Rewrites the evolve store so transitions starting at `stale` start at
    /// `fresh` instead. Used when an upstream feature was replaced.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NilId`] if either id is nil.
    pub fn replace_id(&mut self, stale: PersistentId, fresh: PersistentId) -> Result<()> {
        if stale.is_nil() || fresh.is_nil() {
            return Err(IdentityError::NilId.into());
        }
        self.evolve.replace_in(stale, fresh);
        Ok(())
    }

    /// Repoints evolve sources after the feature that produced `stale_ids`
    /// was removed from the project: each stale id is replaced by its
    /// nearest ancestor produced by `upstream`, when `history` knows one.
    /// Returns the number of ids that had records to rewrite.
    pub fn reconnect(
        &mut self,
        stale_ids: &[PersistentId],
        upstream: PersistentId,
        history: &ShapeHistory,
    ) -> usize {
        let mut replaced = 0;
        for &stale in stale_ids.iter().filter(|id| !id.is_nil()) {
            let Some(fresh) = history.devolve_in_feature(upstream, stale) else {
                continue;
            };
            if fresh.is_nil() || !self.evolve.has_record_in(stale) {
                continue;
            }
            debug!(%stale, %fresh, "reconnecting evolve records");
            self.evolve.replace_in(stale, fresh);
            replaced += 1;
        }
        replaced
    }

    // --- Feature tags ---

    /// The id bound to `tag`, binding a fresh id (with a birth record) on
    /// first use.
    pub fn feature_tag_id(&mut self, tag: &str) -> PersistentId {
        if let Some(id) = self.tags.id(tag) {
            return id;
        }
        let id = PersistentId::random();
        match self.tags.insert(id, tag) {
            Ok(()) => {
                self.evolve.insert(PersistentId::nil(), id);
            }
            Err(err) => warn!(tag, error = %err, "feature tag not bound"),
        }
        id
    }

    /// Binds `tag` to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::TagConflict`] if either side is already bound
    /// to something else.
    pub fn insert_feature_tag(&mut self, id: PersistentId, tag: &str) -> Result<()> {
        Ok(self.tags.insert(id, tag)?)
    }

    /// The tag bound to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::TagNotFound`] if `id` has no tag.
    pub fn feature_tag(&self, id: PersistentId) -> Result<&str> {
        self.tags
            .tag(id)
            .ok_or_else(|| IdentityError::TagNotFound(id.to_string()).into())
    }

    // --- Internal helpers ---

    fn key_of(&self, shape: &S) -> Result<RecordKey> {
        self.records
            .key_of(shape)
            .ok_or_else(|| IdentityError::ShapeNotFound(format!("{shape:?}")).into())
    }

    fn key_with(&self, id: PersistentId) -> Result<RecordKey> {
        self.records
            .first_with(id)
            .ok_or_else(|| IdentityError::IdNotFound(id).into())
    }

    fn walk_kind(&self, key: RecordKey, direction: Direction, kind: ShapeKind) -> Vec<RecordKey> {
        self.graph
            .walk(key, direction, |k| self.records.kind(k) == Some(kind))
    }

    fn ids(&self, keys: &[RecordKey]) -> Vec<PersistentId> {
        keys.iter().map(|k| self.records.id(*k)).collect()
    }

    fn shapes(&self, keys: &[RecordKey]) -> Vec<S> {
        keys.iter()
            .filter_map(|k| self.records.get(*k))
            .map(|r| r.shape.clone())
            .collect()
    }

    /// The first id `source_id` evolved into that no record of this
    /// generation holds yet, or a fresh one recorded as its evolution.
    fn evolve_or_mint(&mut self, source_id: PersistentId) -> PersistentId {
        let reusable = self
            .evolve
            .evolve(source_id)
            .iter()
            .copied()
            .find(|id| !id.is_nil() && !self.records.has_id(*id));
        if let Some(id) = reusable {
            return id;
        }
        let id = PersistentId::random();
        self.evolve.insert(source_id, id);
        id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
