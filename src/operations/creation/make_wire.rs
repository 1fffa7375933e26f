use crate::error::{OperationError, Result};
use crate::topology::{OrientedEdge, TopologyStore, WireData, WireId};

/// Creates a wire from a connected sequence of oriented edges.
pub struct MakeWire {
    edges: Vec<OrientedEdge>,
}

impl MakeWire {
    /// Creates a new `MakeWire` operation.
    #[must_use]
    pub fn new(edges: Vec<OrientedEdge>) -> Self {
        Self { edges }
    }

    /// Executes the operation, creating the wire in the topology store.
    ///
    /// The wire is closed when the last edge ends where the first starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is empty, an edge is missing, or two
    /// consecutive edges do not meet.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<WireId> {
        let (Some(first), Some(last)) = (self.edges.first(), self.edges.last()) else {
            return Err(OperationError::InvalidInput("wire needs at least one edge".into()).into());
        };
        for pair in self.edges.windows(2) {
            if store.head_vertex(pair[0])? != store.tail_vertex(pair[1])? {
                return Err(OperationError::InvalidInput("wire edges are not connected".into()).into());
            }
        }
        let is_closed = store.head_vertex(*last)? == store.tail_vertex(*first)?;
        Ok(store.add_wire(WireData {
            edges: self.edges.clone(),
            is_closed,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::EdgeCache;
    use crate::topology::VertexData;

    #[test]
    fn closed_and_open_wires() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(VertexData::new(Point3::new(0.0, 0.0, 0.0)));
        let b = store.add_vertex(VertexData::new(Point3::new(1.0, 0.0, 0.0)));
        let c = store.add_vertex(VertexData::new(Point3::new(0.0, 1.0, 0.0)));
        let mut cache = EdgeCache::new();
        let ab = cache.oriented(&mut store, a, b).unwrap();
        let bc = cache.oriented(&mut store, b, c).unwrap();
        let ca = cache.oriented(&mut store, c, a).unwrap();

        let open = MakeWire::new(vec![ab, bc]).execute(&mut store).unwrap();
        assert!(!store.wire(open).unwrap().is_closed);
        let closed = MakeWire::new(vec![ab, bc, ca]).execute(&mut store).unwrap();
        assert!(store.wire(closed).unwrap().is_closed);
    }

    #[test]
    fn disconnected_edges_are_rejected() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(VertexData::new(Point3::new(0.0, 0.0, 0.0)));
        let b = store.add_vertex(VertexData::new(Point3::new(1.0, 0.0, 0.0)));
        let c = store.add_vertex(VertexData::new(Point3::new(0.0, 1.0, 0.0)));
        let mut cache = EdgeCache::new();
        let ab = cache.oriented(&mut store, a, b).unwrap();
        let ca = cache.oriented(&mut store, c, a).unwrap();
        assert!(MakeWire::new(vec![ab, ca]).execute(&mut store).is_err());
        assert!(MakeWire::new(Vec::new()).execute(&mut store).is_err());
    }
}
