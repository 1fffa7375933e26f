use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{
    EdgeId, FaceId, Shape, ShellData, ShellId, SolidData, SolidId, TopologyStore, VertexData,
    VertexId, WireId,
};

use super::{EdgeCache, MakeFace, MakeWire};

/// One side of an axis-aligned box, named by its outward normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSide {
    XN,
    XP,
    YN,
    YP,
    ZN,
    ZP,
}

impl BoxSide {
    /// Every side, in the order the box builds its faces.
    pub const ALL: [Self; 6] = [Self::XN, Self::XP, Self::YN, Self::YP, Self::ZN, Self::ZP];

    fn name(self) -> &'static str {
        match self {
            Self::XN => "XN",
            Self::XP => "XP",
            Self::YN => "YN",
            Self::YP => "YP",
            Self::ZN => "ZN",
            Self::ZP => "ZP",
        }
    }

    /// Corner indices of the face loop, counter-clockwise seen from outside.
    /// Corner `i` sits at `(i & 1, (i >> 1) & 1, (i >> 2) & 1)` of the box.
    fn corners(self) -> [usize; 4] {
        match self {
            Self::XN => [0, 4, 6, 2],
            Self::XP => [1, 3, 7, 5],
            Self::YN => [0, 1, 5, 4],
            Self::YP => [2, 6, 7, 3],
            Self::ZN => [0, 2, 3, 1],
            Self::ZP => [4, 5, 7, 6],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Every entity of a freshly built box.
#[derive(Debug, Clone)]
pub struct BoxShapes {
    pub solid: SolidId,
    pub shell: ShellId,
    pub faces: [FaceId; 6],
    pub wires: [WireId; 6],
    pub edges: Vec<EdgeId>,
    pub vertices: [VertexId; 8],
    tags: Vec<(String, Shape)>,
}

impl BoxShapes {
    /// Returns the face on `side`.
    #[must_use]
    pub fn face(&self, side: BoxSide) -> FaceId {
        self.faces[side.index()]
    }

    /// Returns the outer wire of the face on `side`.
    #[must_use]
    pub fn wire(&self, side: BoxSide) -> WireId {
        self.wires[side.index()]
    }

    /// Stable names for every entity, such as `FaceXP`, `EdgeYPZN` (the
    /// edge on the y-max, z-min sides) or `VertexXNYNZN`.
    #[must_use]
    pub fn tagged(&self) -> &[(String, Shape)] {
        &self.tags
    }
}

/// Creates a box solid from two corner points.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, creating the box in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the box has no volume.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<BoxShapes> {
        let (lo, hi) = (self.min_corner, self.max_corner);
        if (0..3).any(|axis| hi[axis] - lo[axis] < TOLERANCE) {
            return Err(GeometryError::Degenerate(
                "box extents must be positive on every axis".into(),
            )
            .into());
        }

        let mut tags = vec![
            ("Solid".to_string(), Shape::Solid(SolidId::default())),
            ("Shell".to_string(), Shape::Shell(ShellId::default())),
        ];

        let mut vertices = [VertexId::default(); 8];
        for (i, vertex) in vertices.iter_mut().enumerate() {
            let point = Point3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            *vertex = store.add_vertex(VertexData::new(point));
            tags.push((format!("Vertex{}", corner_name(i, 0)), Shape::Vertex(*vertex)));
        }

        let mut cache = EdgeCache::new();
        let mut edges = Vec::with_capacity(12);
        let mut faces = [FaceId::default(); 6];
        let mut wires = [WireId::default(); 6];
        for side in BoxSide::ALL {
            let corners = side.corners();
            let mut loop_edges = Vec::with_capacity(4);
            for k in 0..4 {
                let (a, b) = (corners[k], corners[(k + 1) % 4]);
                let known = cache.get(vertices[a], vertices[b]).is_some();
                let oe = cache.oriented(store, vertices[a], vertices[b])?;
                if !known {
                    edges.push(oe.edge);
                    tags.push((format!("Edge{}", corner_name(a, a ^ b)), Shape::Edge(oe.edge)));
                }
                loop_edges.push(oe);
            }
            let wire = MakeWire::new(loop_edges).execute(store)?;
            let face = MakeFace::new(wire, Vec::new()).execute(store)?;
            wires[side.index()] = wire;
            faces[side.index()] = face;
            tags.push((format!("Face{}", side.name()), Shape::Face(face)));
            tags.push((format!("Wire{}", side.name()), Shape::Wire(wire)));
        }

        let shell = store.add_shell(ShellData {
            faces: faces.to_vec(),
            is_closed: true,
        });
        let solid = store.add_solid(SolidData {
            outer_shell: shell,
            inner_shells: Vec::new(),
        });
        tags[0].1 = Shape::Solid(solid);
        tags[1].1 = Shape::Shell(shell);

        Ok(BoxShapes {
            solid,
            shell,
            faces,
            wires,
            edges,
            vertices,
            tags,
        })
    }
}

/// Names the sides corner `i` touches, leaving out the `varying` axis bits.
fn corner_name(i: usize, varying: usize) -> String {
    let mut name = String::new();
    for (bit, axis) in [(1, 'X'), (2, 'Y'), (4, 'Z')] {
        if varying & bit != 0 {
            continue;
        }
        name.push(axis);
        name.push(if i & bit == 0 { 'N' } else { 'P' });
    }
    name
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Surface;
    use crate::topology::FaceSurface;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    #[test]
    fn box_has_box_topology() {
        let mut store = TopologyStore::new();
        let shapes = MakeBox::new(Point3::origin(), Point3::new(1.0, 2.0, 3.0))
            .execute(&mut store)
            .unwrap();

        assert_eq!(shapes.edges.len(), 12);
        assert_eq!(store.shell(shapes.shell).unwrap().faces.len(), 6);
        for wire in shapes.wires {
            let wire = store.wire(wire).unwrap();
            assert!(wire.is_closed);
            assert_eq!(wire.edges.len(), 4);
        }
        // Every edge is used by exactly two faces, once in each direction.
        for edge in &shapes.edges {
            let uses: Vec<bool> = shapes
                .wires
                .iter()
                .flat_map(|w| store.wire(*w).unwrap().edges.clone())
                .filter(|oe| oe.edge == *edge)
                .map(|oe| oe.forward)
                .collect();
            assert_eq!(uses.len(), 2);
            assert_ne!(uses[0], uses[1]);
        }
    }

    #[test]
    fn faces_point_outward() {
        let mut store = TopologyStore::new();
        let shapes = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let expected = [
            (BoxSide::XN, -1.0, 0),
            (BoxSide::XP, 1.0, 0),
            (BoxSide::YN, -1.0, 1),
            (BoxSide::YP, 1.0, 1),
            (BoxSide::ZN, -1.0, 2),
            (BoxSide::ZP, 1.0, 2),
        ];
        for (side, sign, axis) in expected {
            let FaceSurface::Plane(plane) = &store.face(shapes.face(side)).unwrap().surface;
            let normal = plane.normal(0.0, 0.0).unwrap();
            assert_relative_eq!(normal[axis], sign, epsilon = 1e-12);
        }
    }

    #[test]
    fn tags_are_unique_and_complete() {
        let mut store = TopologyStore::new();
        let shapes = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let names: HashSet<&str> = shapes.tagged().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names.len(), 2 + 8 + 12 + 6 + 6);
        assert!(names.contains("FaceXP"));
        assert!(names.contains("WireZN"));
        assert!(names.contains("EdgeYPZN"));
        assert!(names.contains("VertexXNYNZN"));
        let shapes_tagged: HashSet<Shape> = shapes.tagged().iter().map(|(_, s)| *s).collect();
        assert_eq!(shapes_tagged.len(), shapes.tagged().len());
    }

    #[test]
    fn flat_box_is_rejected() {
        let mut store = TopologyStore::new();
        let result = MakeBox::new(Point3::origin(), Point3::new(1.0, 0.0, 1.0)).execute(&mut store);
        assert!(result.is_err());
    }
}
