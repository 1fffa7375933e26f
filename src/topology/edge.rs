use crate::geometry::curve::{Arc, Curve, Line};
use crate::math::Vector3;

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// The geometric curve associated with an edge.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    /// A line segment.
    Line(Line),
    /// A circular arc or full circle.
    Arc(Arc),
}

impl EdgeCurve {
    /// Borrows the underlying curve through the [`Curve`] trait.
    #[must_use]
    pub fn as_curve(&self) -> &dyn Curve {
        match self {
            Self::Line(line) => line,
            Self::Arc(arc) => arc,
        }
    }

    /// Returns a copy of this curve moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        match self {
            Self::Line(line) => Self::Line(line.translated(offset)),
            Self::Arc(arc) => Self::Arc(arc.translated(offset)),
        }
    }
}

/// Data associated with a topological edge.
///
/// An edge connects two vertices and carries a geometric curve
/// that defines the shape of the edge between them. A closed edge
/// (full circle) uses the same vertex for start and end.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The geometric curve defining this edge's shape.
    pub curve: EdgeCurve,
    /// Parameter on the curve corresponding to the start vertex.
    pub t_start: f64,
    /// Parameter on the curve corresponding to the end vertex.
    pub t_end: f64,
}

impl EdgeData {
    /// Returns the vertices bounding this edge, without repeating the
    /// vertex of a closed edge.
    #[must_use]
    pub fn vertices(&self) -> Vec<VertexId> {
        if self.start == self.end {
            vec![self.start]
        } else {
            vec![self.start, self.end]
        }
    }

    /// Returns the parameter halfway between the edge bounds.
    #[must_use]
    pub fn mid_parameter(&self) -> f64 {
        (self.t_end - self.t_start) / 2.0 + self.t_start
    }
}
