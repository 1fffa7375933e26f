use crate::error::{OperationError, Result};
use crate::geometry::Plane;
use crate::topology::{FaceData, FaceId, FaceSurface, TopologyStore, WireId};

/// Creates a planar face bounded by an outer wire and optional holes.
///
/// The plane is fitted through the outer wire, so the face normal follows
/// the outer wire's winding.
pub struct MakeFace {
    outer_wire: WireId,
    inner_wires: Vec<WireId>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation.
    #[must_use]
    pub fn new(outer_wire: WireId, inner_wires: Vec<WireId>) -> Self {
        Self {
            outer_wire,
            inner_wires,
        }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a wire is missing or open, or the outer wire
    /// encloses no area.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        for wire in std::iter::once(self.outer_wire).chain(self.inner_wires.iter().copied()) {
            if !store.wire(wire)?.is_closed {
                return Err(OperationError::InvalidInput("face boundary must be closed".into()).into());
            }
        }
        let plane = Plane::from_polygon(&store.wire_points(self.outer_wire)?)?;
        Ok(store.add_face(FaceData {
            surface: FaceSurface::Plane(plane),
            outer_wire: self.outer_wire,
            inner_wires: self.inner_wires.clone(),
            same_sense: true,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Surface;
    use crate::math::Point3;
    use crate::operations::creation::{EdgeCache, MakeWire};
    use crate::topology::VertexData;
    use approx::assert_relative_eq;

    #[test]
    fn normal_follows_winding() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(VertexData::new(Point3::new(0.0, 0.0, 0.0)));
        let b = store.add_vertex(VertexData::new(Point3::new(1.0, 0.0, 0.0)));
        let c = store.add_vertex(VertexData::new(Point3::new(0.0, 1.0, 0.0)));
        let mut cache = EdgeCache::new();
        let edges = vec![
            cache.oriented(&mut store, a, b).unwrap(),
            cache.oriented(&mut store, b, c).unwrap(),
            cache.oriented(&mut store, c, a).unwrap(),
        ];
        let wire = MakeWire::new(edges).execute(&mut store).unwrap();
        let face = MakeFace::new(wire, Vec::new()).execute(&mut store).unwrap();

        let FaceSurface::Plane(plane) = &store.face(face).unwrap().surface;
        let normal = plane.normal(0.0, 0.0).unwrap();
        assert_relative_eq!(normal.z, 1.0, epsilon = 1e-12);
    }
}
