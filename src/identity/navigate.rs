//! Id-keyed navigation and point queries used by selection.

use std::fmt;
use std::hash::Hash;

use crate::error::{IdentityError, Result};
use crate::kernel::Kernel;
use crate::math::Point3;
use crate::topology::ShapeKind;

use super::graph::Direction;
use super::{PersistentId, RecordKey, ShapeIdentity};

impl<S> ShapeIdentity<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    /// The wire of `face` that contains `edge`.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is missing, has the wrong kind, or the
    /// edge does not bound the face.
    pub fn wire_of(&self, edge: PersistentId, face: PersistentId) -> Result<PersistentId> {
        let edge_key = self.key_of_kind(edge, ShapeKind::Edge)?;
        let face_key = self.key_of_kind(face, ShapeKind::Face)?;
        self.graph
            .children(face_key)
            .iter()
            .find(|w| self.graph.children(**w).contains(&edge_key))
            .map(|w| self.records.id(*w))
            .ok_or_else(|| {
                IdentityError::ShapeNotFound(format!("no wire of face {face} holds edge {edge}"))
                    .into()
            })
    }

    /// The wire of `face` passing closest to `point`.
    ///
    /// # Errors
    ///
    /// Returns an error if `face` is missing, not a face, or has no wires.
    pub fn closest_wire<K>(&self, kernel: &K, face: PersistentId, point: &Point3) -> Result<PersistentId>
    where
        K: Kernel<Shape = S>,
    {
        let face_key = self.key_of_kind(face, ShapeKind::Face)?;
        let mut best: Option<(f64, PersistentId)> = None;
        for &wire in self.graph.children(face_key) {
            let Some(record) = self.records.get(wire) else {
                continue;
            };
            for nearest in kernel.nearest_point(&record.shape, point)? {
                let distance = (nearest - point).norm();
                if best.is_none_or(|(d, _)| distance < d) {
                    best = Some((distance, record.id));
                }
            }
        }
        best.map(|(_, id)| id)
            .ok_or_else(|| IdentityError::ShapeNotFound(format!("face {face} has no wires")).into())
    }

    /// Wires containing `edge` that bound no face.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is missing or not an edge.
    pub fn faceless_wires(&self, edge: PersistentId) -> Result<Vec<PersistentId>> {
        let edge_key = self.key_of_kind(edge, ShapeKind::Edge)?;
        Ok(self
            .graph
            .parents(edge_key)
            .iter()
            .filter(|w| self.records.kind(**w) == Some(ShapeKind::Wire))
            .filter(|w| {
                !self
                    .graph
                    .parents(**w)
                    .iter()
                    .any(|p| self.records.kind(*p) == Some(ShapeKind::Face))
            })
            .map(|w| self.records.id(*w))
            .collect())
    }

    /// Whether `edge` bounds `face`.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is missing or has the wrong kind.
    pub fn is_edge_of_face(&self, edge: PersistentId, face: PersistentId) -> Result<bool> {
        let edge_key = self.key_of_kind(edge, ShapeKind::Edge)?;
        let face_key = self.key_of_kind(face, ShapeKind::Face)?;
        Ok(self
            .graph
            .walk(edge_key, Direction::Up, |k| k == face_key)
            .contains(&face_key))
    }

    /// The first vertex of `edge`.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is missing or not an edge, or the kernel
    /// vertex is not part of this generation.
    pub fn start_vertex<K>(&self, kernel: &K, edge: PersistentId) -> Result<PersistentId>
    where
        K: Kernel<Shape = S>,
    {
        let shape = self.edge_shape(edge)?;
        self.find_id(&kernel.first_vertex(shape)?)
    }

    /// The last vertex of `edge`.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is missing or not an edge, or the kernel
    /// vertex is not part of this generation.
    pub fn end_vertex<K>(&self, kernel: &K, edge: PersistentId) -> Result<PersistentId>
    where
        K: Kernel<Shape = S>,
    {
        let shape = self.edge_shape(edge)?;
        self.find_id(&kernel.last_vertex(shape)?)
    }

    /// The first shapes below the root that are not compounds, looking
    /// through nested compounds.
    #[must_use]
    pub fn non_compound_children(&self) -> Vec<PersistentId> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            for &child in self.graph.children(key).iter().rev() {
                if self.records.kind(child) == Some(ShapeKind::Compound) {
                    stack.push(child);
                } else {
                    out.push(self.records.id(child));
                }
            }
        }
        out
    }

    /// Start and end point of `edge`.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is missing or not an edge.
    pub fn end_points<K>(&self, kernel: &K, edge: PersistentId) -> Result<Vec<Point3>>
    where
        K: Kernel<Shape = S>,
    {
        kernel.end_points(self.edge_shape(edge)?)
    }

    /// Parametric midpoint of `edge`.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is missing or not an edge.
    pub fn mid_point<K>(&self, kernel: &K, edge: PersistentId) -> Result<Vec<Point3>>
    where
        K: Kernel<Shape = S>,
    {
        kernel.mid_point(self.edge_shape(edge)?)
    }

    /// Center of a circular `edge`; empty otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is missing or not an edge.
    pub fn center_point<K>(&self, kernel: &K, edge: PersistentId) -> Result<Vec<Point3>>
    where
        K: Kernel<Shape = S>,
    {
        kernel.center_point(self.edge_shape(edge)?)
    }

    /// Quadrant points of a circular `edge`; empty otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is missing or not an edge.
    pub fn quadrant_points<K>(&self, kernel: &K, edge: PersistentId) -> Result<Vec<Point3>>
    where
        K: Kernel<Shape = S>,
    {
        kernel.quadrant_points(self.edge_shape(edge)?)
    }

    /// Point on the shape holding `id` closest to `point`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is missing or the kernel cannot measure its
    /// kind.
    pub fn nearest_point<K>(&self, kernel: &K, id: PersistentId, point: &Point3) -> Result<Vec<Point3>>
    where
        K: Kernel<Shape = S>,
    {
        kernel.nearest_point(self.find_shape(id)?, point)
    }

    fn key_of_kind(&self, id: PersistentId, kind: ShapeKind) -> Result<RecordKey> {
        let key = self.key_with(id)?;
        match self.records.kind(key) {
            Some(found) if found == kind => Ok(key),
            Some(found) => Err(IdentityError::WrongKind {
                expected: kind,
                found,
            }
            .into()),
            None => Err(IdentityError::IdNotFound(id).into()),
        }
    }

    fn edge_shape(&self, edge: PersistentId) -> Result<&S> {
        let key = self.key_of_kind(edge, ShapeKind::Edge)?;
        self.records
            .get(key)
            .map(|r| &r.shape)
            .ok_or_else(|| IdentityError::IdNotFound(edge).into())
    }
}
