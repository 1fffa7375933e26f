//! Matching passes that recover ids of a fresh generation from the
//! identities of the feature's inputs.
//!
//! Every pass except [`ShapeIdentity::shape_match`] only writes records that
//! are still nil, so a pass never undoes the work of a more confident one.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::kernel::ShapeModification;
use crate::topology::ShapeKind;

use super::graph::Direction;
use super::{DerivedKey, PersistentId, RecordKey, ShapeIdentity};

impl<S> ShapeIdentity<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    /// Copies ids of shapes the kernel reports as the same shape in
    /// `source`, overwriting. Nil source ids are skipped.
    pub fn shape_match(&mut self, source: &ShapeIdentity<S>) {
        let mut matched = 0usize;
        for key in self.records.keys().to_vec() {
            let Some(record) = self.records.get(key) else {
                continue;
            };
            let Ok(id) = source.find_id(&record.shape) else {
                continue;
            };
            if id.is_nil() {
                continue;
            }
            self.records.set_id(key, id);
            matched += 1;
        }
        debug!(matched, "shape match");
    }

    /// For each kind where both `source` and this generation hold exactly one
    /// shape, and this one is still nil, copies the source id.
    pub fn unique_type_match(&mut self, source: &ShapeIdentity<S>) {
        for kind in ShapeKind::ALL {
            let [source_key] = source.records.keys_of_kind(kind)[..] else {
                continue;
            };
            let [target_key] = self.records.keys_of_kind(kind)[..] else {
                continue;
            };
            let id = source.records.id(source_key);
            if id.is_nil() || !self.records.id(target_key).is_nil() {
                continue;
            }
            trace!(%kind, %id, "unique type match");
            self.records.set_id(target_key, id);
        }
    }

    /// Gives nil outer wires of identified faces the id of the matching
    /// source face's outer wire, or an evolution of it when the face itself
    /// descends from a source face.
    pub fn outer_wire_match(&mut self, source: &ShapeIdentity<S>) {
        for face in self.records.keys_of_kind(ShapeKind::Face) {
            let face_id = self.records.id(face);
            let Some(wire) = self.records.outer_wire(face) else {
                continue;
            };
            if face_id.is_nil() || !self.records.id(wire).is_nil() {
                continue;
            }
            if let Some(source_wire) = source.outer_wire_id(face_id) {
                trace!(face = %face_id, wire = %source_wire, "outer wire match");
                self.records.set_id(wire, source_wire);
                continue;
            }
            let ancestor_wire = self
                .evolve
                .devolve(face_id)
                .iter()
                .find_map(|ancestor| source.outer_wire_id(*ancestor));
            if let Some(source_wire) = ancestor_wire {
                let id = self.evolve_or_mint(source_wire);
                trace!(face = %face_id, wire = %id, "outer wire match through evolution");
                self.records.set_id(wire, id);
            }
        }
    }

    /// Follows the modified and deleted reports of a kernel operation that
    /// turned `source`'s shape into this one.
    ///
    /// A single nil successor takes an earlier evolution of the source id or
    /// a fresh one. A successor that already has another id is recorded as an
    /// evolution of the source, which is how merges show up. The successors
    /// of a split get ids memoized per successor index, so re-running the same
    /// split reproduces them. Deleted sources get a death record.
    pub fn modified_match<M>(&mut self, operation: &M, source: &ShapeIdentity<S>)
    where
        M: ShapeModification<Shape = S> + ?Sized,
    {
        for (_, record) in source.records.iter() {
            let source_id = record.id;
            if source_id.is_nil() {
                continue;
            }
            if operation.is_deleted(&record.shape) {
                self.evolve.insert(source_id, PersistentId::nil());
                continue;
            }
            let successors: Vec<(usize, RecordKey)> = operation
                .modified(&record.shape)
                .iter()
                .enumerate()
                .filter_map(|(i, s)| self.records.key_of(s).map(|k| (i, k)))
                .collect();
            match successors[..] {
                [] => {}
                [(_, key)] => {
                    let id = self.records.id(key);
                    if id.is_nil() {
                        let id = self.evolve_or_mint(source_id);
                        trace!(source = %source_id, %id, "modified match");
                        self.records.set_id(key, id);
                    } else if id != source_id {
                        self.evolve.insert(source_id, id);
                    }
                }
                _ => {
                    for &(index, key) in &successors {
                        let id = self.records.id(key);
                        if id.is_nil() {
                            let derived = DerivedKey::new(record.kind, [source_id], index);
                            let (id, minted) = self.derived.get_or_mint(derived);
                            self.evolve.insert(source_id, id);
                            trace!(source = %source_id, %id, index, minted, "split match");
                            self.records.set_id(key, id);
                        } else if id != source_id {
                            self.evolve.insert(source_id, id);
                        }
                    }
                }
            }
        }
    }

    /// Names nil shapes after their identified parents: edges after their
    /// faces, then wires after their face (when `derive_wires`), then vertices
    /// after their edges. Shapes with a nil parent or no parent are left nil.
    pub fn derived_match(&mut self, derive_wires: bool) {
        self.derive_by_parents(ShapeKind::Edge, ShapeKind::Face);
        if derive_wires {
            self.derive_wires();
        }
        self.derive_by_parents(ShapeKind::Vertex, ShapeKind::Edge);
    }

    /// Shapes sharing a parent set are told apart by their offset-order rank.
    fn derive_by_parents(&mut self, kind: ShapeKind, parent_kind: ShapeKind) {
        let mut ranks: HashMap<BTreeSet<PersistentId>, usize> = HashMap::new();
        for key in self.records.keys_of_kind(kind) {
            if !self.records.id(key).is_nil() {
                continue;
            }
            let parents: BTreeSet<PersistentId> = self
                .walk_kind(key, Direction::Up, parent_kind)
                .iter()
                .map(|k| self.records.id(*k))
                .collect();
            if parents.is_empty() || parents.contains(&PersistentId::nil()) {
                continue;
            }
            let rank = ranks.entry(parents.clone()).or_default();
            let derived = DerivedKey {
                kind,
                parents,
                discriminator: *rank,
            };
            *rank += 1;
            self.assign_derived(key, derived);
        }
    }

    fn derive_wires(&mut self) {
        for key in self.records.keys_of_kind(ShapeKind::Wire) {
            if !self.records.id(key).is_nil() {
                continue;
            }
            let Some(&face) = self
                .graph
                .parents(key)
                .iter()
                .find(|p| self.records.kind(**p) == Some(ShapeKind::Face))
            else {
                continue;
            };
            let face_id = self.records.id(face);
            if face_id.is_nil() {
                continue;
            }
            let Some(index) = self.graph.children(face).iter().position(|c| *c == key) else {
                continue;
            };
            self.assign_derived(key, DerivedKey::new(ShapeKind::Wire, [face_id], index));
        }
    }

    fn assign_derived(&mut self, key: RecordKey, derived: DerivedKey) {
        let (id, minted) = self.derived.get_or_mint(derived);
        if minted {
            self.evolve.insert(PersistentId::nil(), id);
        }
        trace!(%id, minted, "derived match");
        self.records.set_id(key, id);
    }

    /// Gives a nil edge the evolution of the one source edge shared by its
    /// two identified faces, when both faces exist in `source`.
    pub fn face_edge_match(&mut self, source: &ShapeIdentity<S>) {
        for key in self.records.keys_of_kind(ShapeKind::Edge) {
            if !self.records.id(key).is_nil() {
                continue;
            }
            let faces = self.ids(&self.walk_kind(key, Direction::Up, ShapeKind::Face));
            let [a, b] = faces[..] else {
                continue;
            };
            let (Ok(edges_a), Ok(edges_b)) = (
                source.children_of_type(a, ShapeKind::Edge),
                source.children_of_type(b, ShapeKind::Edge),
            ) else {
                continue;
            };
            let shared: Vec<PersistentId> = edges_a
                .into_iter()
                .filter(|e| !e.is_nil() && edges_b.contains(e))
                .collect();
            if let [edge] = shared[..] {
                let id = self.evolve_or_mint(edge);
                trace!(%id, "face edge match");
                self.records.set_id(key, id);
            }
        }
    }

    /// Gives a nil vertex the evolution of the one source vertex shared by
    /// all of its identified edges (at least two). Each edge id is looked up
    /// in `source` directly or through the one source edge it evolved from,
    /// so this pass picks up the edges `face_edge_match` named.
    pub fn edge_vertex_match(&mut self, source: &ShapeIdentity<S>) {
        for key in self.records.keys_of_kind(ShapeKind::Vertex) {
            if !self.records.id(key).is_nil() {
                continue;
            }
            let edges = self.ids(&self.walk_kind(key, Direction::Up, ShapeKind::Edge));
            if edges.len() < 2 || edges.iter().any(PersistentId::is_nil) {
                continue;
            }
            let mut shared: Option<Vec<PersistentId>> = None;
            for edge in &edges {
                let Some(edge) = self.in_source(*edge, source) else {
                    shared = None;
                    break;
                };
                let Ok(vertices) = source.children_of_type(edge, ShapeKind::Vertex) else {
                    shared = None;
                    break;
                };
                shared = Some(match shared {
                    None => vertices,
                    Some(prev) => prev.into_iter().filter(|v| vertices.contains(v)).collect(),
                });
            }
            if let Some([vertex]) = shared.as_deref() {
                if vertex.is_nil() {
                    continue;
                }
                let id = self.evolve_or_mint(*vertex);
                trace!(%id, "edge vertex match");
                self.records.set_id(key, id);
            }
        }
    }

    /// `id` itself if `source` holds it, else its single ancestor in this
    /// generation's evolve records that `source` holds.
    fn in_source(&self, id: PersistentId, source: &ShapeIdentity<S>) -> Option<PersistentId> {
        if source.has_id(id) {
            return Some(id);
        }
        match self.evolve.devolve(id) {
            [ancestor] if source.has_id(*ancestor) => Some(*ancestor),
            _ => None,
        }
    }

    /// The id of the outer wire of the face holding `face_id`, if both exist
    /// and the wire is identified.
    fn outer_wire_id(&self, face_id: PersistentId) -> Option<PersistentId> {
        let face = self
            .records
            .keys_with(face_id)
            .iter()
            .copied()
            .find(|k| self.records.kind(*k) == Some(ShapeKind::Face))?;
        let id = self.records.id(self.records.outer_wire(face)?);
        (!id.is_nil()).then_some(id)
    }
}
