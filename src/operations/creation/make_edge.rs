use std::collections::HashMap;

use crate::error::Result;
use crate::geometry::Line;
use crate::topology::{EdgeCurve, EdgeData, EdgeId, OrientedEdge, TopologyStore, VertexId};

/// Creates a straight edge between two existing vertices.
pub struct MakeEdge {
    start: VertexId,
    end: VertexId,
}

impl MakeEdge {
    /// Creates a new `MakeEdge` operation.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId) -> Self {
        Self { start, end }
    }

    /// Executes the operation, creating the edge in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a vertex is missing or the vertices coincide.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        let a = store.vertex(self.start)?.point;
        let b = store.vertex(self.end)?.point;
        let (line, t_start, t_end) = Line::through(&a, &b)?;
        Ok(store.add_edge(EdgeData {
            start: self.start,
            end: self.end,
            curve: EdgeCurve::Line(line),
            t_start,
            t_end,
        }))
    }
}

/// Shares straight edges between the faces of a shell under construction.
///
/// The first request for a vertex pair creates the edge in that direction;
/// the opposite request reuses it reversed.
#[derive(Debug, Default)]
pub struct EdgeCache {
    edges: HashMap<(VertexId, VertexId), EdgeId>,
}

impl EdgeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the edge from `a` to `b`, oriented for traversal.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge has to be created and creation fails.
    pub fn oriented(
        &mut self,
        store: &mut TopologyStore,
        a: VertexId,
        b: VertexId,
    ) -> Result<OrientedEdge> {
        if let Some(&edge) = self.edges.get(&(a, b)) {
            return Ok(OrientedEdge::new(edge, true));
        }
        if let Some(&edge) = self.edges.get(&(b, a)) {
            return Ok(OrientedEdge::new(edge, false));
        }
        let edge = MakeEdge::new(a, b).execute(store)?;
        self.edges.insert((a, b), edge);
        Ok(OrientedEdge::new(edge, true))
    }

    /// Returns the edge between `a` and `b` in either direction, if created.
    #[must_use]
    pub fn get(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edges
            .get(&(a, b))
            .or_else(|| self.edges.get(&(b, a)))
            .copied()
    }
}
