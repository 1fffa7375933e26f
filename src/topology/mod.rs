pub mod compound;
pub mod edge;
pub mod face;
pub mod shape;
pub mod shell;
pub mod solid;
pub mod vertex;
pub mod wire;

pub use compound::{CompoundData, CompoundId};
pub use edge::{EdgeCurve, EdgeData, EdgeId};
pub use face::{FaceData, FaceId, FaceSurface};
pub use shape::{Shape, ShapeKind};
pub use shell::{ShellData, ShellId};
pub use solid::{SolidData, SolidId};
pub use vertex::{VertexData, VertexId};
pub use wire::{OrientedEdge, WireData, WireId};

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Central arena that owns all topological entities.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures. Operations never mutate an entity
/// that already exists: they add new entities and reuse the untouched ones,
/// so shapes published by earlier features stay valid and comparable.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
    faces: SlotMap<FaceId, FaceData>,
    shells: SlotMap<ShellId, ShellData>,
    solids: SlotMap<SolidId, SolidData>,
    compounds: SlotMap<CompoundId, CompoundData>,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    // --- Edge operations ---

    /// Inserts an edge and returns its ID.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    // --- Wire operations ---

    /// Inserts a wire and returns its ID.
    pub fn add_wire(&mut self, data: WireData) -> WireId {
        self.wires.insert(data)
    }

    /// Returns a reference to the wire data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire(&self, id: WireId) -> Result<&WireData, TopologyError> {
        self.wires
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    // --- Face operations ---

    /// Inserts a face and returns its ID.
    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    // --- Shell operations ---

    /// Inserts a shell and returns its ID.
    pub fn add_shell(&mut self, data: ShellData) -> ShellId {
        self.shells.insert(data)
    }

    /// Returns a reference to the shell data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn shell(&self, id: ShellId) -> Result<&ShellData, TopologyError> {
        self.shells
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("shell".into()))
    }

    // --- Solid operations ---

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, TopologyError> {
        self.solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }

    // --- Compound operations ---

    /// Inserts a compound and returns its ID.
    pub fn add_compound(&mut self, data: CompoundData) -> CompoundId {
        self.compounds.insert(data)
    }

    /// Returns a reference to the compound data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn compound(&self, id: CompoundId) -> Result<&CompoundData, TopologyError> {
        self.compounds
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("compound".into()))
    }

    // --- Generic shape access ---

    /// Returns whether the shape names a live entity.
    #[must_use]
    pub fn contains(&self, shape: Shape) -> bool {
        match shape {
            Shape::Vertex(id) => self.vertices.contains_key(id),
            Shape::Edge(id) => self.edges.contains_key(id),
            Shape::Wire(id) => self.wires.contains_key(id),
            Shape::Face(id) => self.faces.contains_key(id),
            Shape::Shell(id) => self.shells.contains_key(id),
            Shape::Solid(id) => self.solids.contains_key(id),
            Shape::Compound(id) => self.compounds.contains_key(id),
        }
    }

    /// Returns the direct sub-shapes of `shape`, in definition order.
    ///
    /// Solids yield shells, shells faces, faces wires (outer first), wires
    /// edges, edges their bounding vertices. A sub-shape used twice (a seam
    /// edge, a closed edge's vertex) is reported once.
    ///
    /// # Errors
    ///
    /// Returns an error if `shape` or any entity it references is missing.
    pub fn sub_shapes(&self, shape: Shape) -> Result<Vec<Shape>, TopologyError> {
        let mut out: Vec<Shape> = match shape {
            Shape::Vertex(id) => {
                self.vertex(id)?;
                Vec::new()
            }
            Shape::Edge(id) => self.edge(id)?.vertices().into_iter().map(Shape::from).collect(),
            Shape::Wire(id) => self
                .wire(id)?
                .edges
                .iter()
                .map(|oe| Shape::Edge(oe.edge))
                .collect(),
            Shape::Face(id) => self.face(id)?.wires().map(Shape::from).collect(),
            Shape::Shell(id) => self.shell(id)?.faces.iter().copied().map(Shape::from).collect(),
            Shape::Solid(id) => self.solid(id)?.shells().map(Shape::from).collect(),
            Shape::Compound(id) => self.compound(id)?.children.clone(),
        };
        let mut seen = std::collections::HashSet::new();
        out.retain(|s| seen.insert(*s));
        Ok(out)
    }

    /// Returns the point of each vertex of a wire, in traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire or any of its edges or vertices is missing.
    pub fn wire_points(&self, wire: WireId) -> Result<Vec<Point3>, TopologyError> {
        let wire = self.wire(wire)?;
        let mut points = Vec::with_capacity(wire.edges.len());
        for oe in &wire.edges {
            let edge = self.edge(oe.edge)?;
            let first = if oe.forward { edge.start } else { edge.end };
            points.push(self.vertex(first)?.point);
        }
        Ok(points)
    }

    /// Returns the vertex a wire traversal reaches when it leaves `oe`.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing.
    pub fn head_vertex(&self, oe: OrientedEdge) -> Result<VertexId, TopologyError> {
        let edge = self.edge(oe.edge)?;
        Ok(if oe.forward { edge.end } else { edge.start })
    }

    /// Returns the vertex a wire traversal starts `oe` from.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing.
    pub fn tail_vertex(&self, oe: OrientedEdge) -> Result<VertexId, TopologyError> {
        let edge = self.edge(oe.edge)?;
        Ok(if oe.forward { edge.start } else { edge.end })
    }
}
