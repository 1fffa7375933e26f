use std::collections::HashMap;

use crate::error::Result;
use crate::math::Vector3;
use crate::operations::OperationHistory;
use crate::topology::{
    CompoundData, CompoundId, EdgeData, EdgeId, FaceData, FaceId, OrientedEdge, Shape, ShellData,
    ShellId, SolidData, SolidId, TopologyStore, VertexId, WireData, WireId,
};

/// Deep-copies a shape into new arena entities.
///
/// Every sub-shape of the input is reported as modified into its copy, one
/// to one, so identities can be carried across.
pub struct CopyShape {
    shape: Shape,
}

impl CopyShape {
    /// Creates a new `CopyShape` operation.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }

    /// Executes the copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape or any of its sub-shapes is missing.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<(Shape, OperationHistory)> {
        let mut copier = Copier::new(Vector3::zeros());
        let copy = copier.copy(store, self.shape)?;
        Ok((copy, copier.history))
    }
}

/// Shared deep copy, optionally moving every entity by `offset`.
pub(super) struct Copier {
    offset: Vector3,
    copies: HashMap<Shape, Shape>,
    pub(super) history: OperationHistory,
}

impl Copier {
    pub(super) fn new(offset: Vector3) -> Self {
        Self {
            offset,
            copies: HashMap::new(),
            history: OperationHistory::new(),
        }
    }

    pub(super) fn copy(&mut self, store: &mut TopologyStore, shape: Shape) -> Result<Shape> {
        Ok(match shape {
            Shape::Vertex(id) => self.vertex(store, id)?.into(),
            Shape::Edge(id) => self.edge(store, id)?.into(),
            Shape::Wire(id) => self.wire(store, id)?.into(),
            Shape::Face(id) => self.face(store, id)?.into(),
            Shape::Shell(id) => self.shell(store, id)?.into(),
            Shape::Solid(id) => self.solid(store, id)?.into(),
            Shape::Compound(id) => self.compound(store, id)?.into(),
        })
    }

    fn known(&self, shape: impl Into<Shape>) -> Option<Shape> {
        self.copies.get(&shape.into()).copied()
    }

    fn remember(&mut self, from: impl Into<Shape>, to: impl Into<Shape>) {
        let (from, to) = (from.into(), to.into());
        self.copies.insert(from, to);
        self.history.record_modified(from, to);
    }

    fn vertex(&mut self, store: &mut TopologyStore, id: VertexId) -> Result<VertexId> {
        if let Some(Shape::Vertex(copy)) = self.known(id) {
            return Ok(copy);
        }
        let data = store.vertex(id)?.translated(&self.offset);
        let copy = store.add_vertex(data);
        self.remember(id, copy);
        Ok(copy)
    }

    fn edge(&mut self, store: &mut TopologyStore, id: EdgeId) -> Result<EdgeId> {
        if let Some(Shape::Edge(copy)) = self.known(id) {
            return Ok(copy);
        }
        let edge = store.edge(id)?.clone();
        let start = self.vertex(store, edge.start)?;
        let end = self.vertex(store, edge.end)?;
        let copy = store.add_edge(EdgeData {
            start,
            end,
            curve: edge.curve.translated(&self.offset),
            ..edge
        });
        self.remember(id, copy);
        Ok(copy)
    }

    fn wire(&mut self, store: &mut TopologyStore, id: WireId) -> Result<WireId> {
        if let Some(Shape::Wire(copy)) = self.known(id) {
            return Ok(copy);
        }
        let wire = store.wire(id)?.clone();
        let mut edges = Vec::with_capacity(wire.edges.len());
        for oe in &wire.edges {
            edges.push(OrientedEdge::new(self.edge(store, oe.edge)?, oe.forward));
        }
        let copy = store.add_wire(WireData {
            edges,
            is_closed: wire.is_closed,
        });
        self.remember(id, copy);
        Ok(copy)
    }

    fn face(&mut self, store: &mut TopologyStore, id: FaceId) -> Result<FaceId> {
        if let Some(Shape::Face(copy)) = self.known(id) {
            return Ok(copy);
        }
        let face = store.face(id)?.clone();
        let outer_wire = self.wire(store, face.outer_wire)?;
        let mut inner_wires = Vec::with_capacity(face.inner_wires.len());
        for wire in &face.inner_wires {
            inner_wires.push(self.wire(store, *wire)?);
        }
        let copy = store.add_face(FaceData {
            surface: face.surface.translated(&self.offset),
            outer_wire,
            inner_wires,
            same_sense: face.same_sense,
        });
        self.remember(id, copy);
        Ok(copy)
    }

    fn shell(&mut self, store: &mut TopologyStore, id: ShellId) -> Result<ShellId> {
        if let Some(Shape::Shell(copy)) = self.known(id) {
            return Ok(copy);
        }
        let shell = store.shell(id)?.clone();
        let mut faces = Vec::with_capacity(shell.faces.len());
        for face in &shell.faces {
            faces.push(self.face(store, *face)?);
        }
        let copy = store.add_shell(ShellData {
            faces,
            is_closed: shell.is_closed,
        });
        self.remember(id, copy);
        Ok(copy)
    }

    fn solid(&mut self, store: &mut TopologyStore, id: SolidId) -> Result<SolidId> {
        if let Some(Shape::Solid(copy)) = self.known(id) {
            return Ok(copy);
        }
        let solid = store.solid(id)?.clone();
        let outer_shell = self.shell(store, solid.outer_shell)?;
        let mut inner_shells = Vec::with_capacity(solid.inner_shells.len());
        for shell in &solid.inner_shells {
            inner_shells.push(self.shell(store, *shell)?);
        }
        let copy = store.add_solid(SolidData {
            outer_shell,
            inner_shells,
        });
        self.remember(id, copy);
        Ok(copy)
    }

    fn compound(&mut self, store: &mut TopologyStore, id: CompoundId) -> Result<CompoundId> {
        if let Some(Shape::Compound(copy)) = self.known(id) {
            return Ok(copy);
        }
        let compound = store.compound(id)?.clone();
        let mut children = Vec::with_capacity(compound.children.len());
        for child in &compound.children {
            children.push(self.copy(store, *child)?);
        }
        let copy = store.add_compound(CompoundData { children });
        self.remember(id, copy);
        Ok(copy)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kernel::ShapeModification;
    use crate::math::Point3;
    use crate::operations::creation::MakeBox;

    #[test]
    fn copy_is_disjoint_and_reported_one_to_one() {
        let mut store = TopologyStore::new();
        let shapes = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let (copy, history) = CopyShape::new(Shape::Solid(shapes.solid))
            .execute(&mut store)
            .unwrap();

        assert_ne!(copy, Shape::Solid(shapes.solid));
        for face in shapes.faces {
            let successors = history.modified(&Shape::Face(face));
            assert_eq!(successors.len(), 1);
            assert_ne!(successors[0], Shape::Face(face));
        }
        // Shared edges are copied once.
        for edge in &shapes.edges {
            assert_eq!(history.modified(&Shape::Edge(*edge)).len(), 1);
        }
        let copied_edges: std::collections::HashSet<Shape> = shapes
            .edges
            .iter()
            .flat_map(|e| history.modified(&Shape::Edge(*e)))
            .collect();
        assert_eq!(copied_edges.len(), 12);
    }
}
