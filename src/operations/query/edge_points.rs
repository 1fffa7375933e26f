use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::Result;
use crate::geometry::Curve;
use crate::math::Point3;
use crate::topology::{EdgeCurve, EdgeId, TopologyStore};

/// Characteristic points of an edge, used for snapping and picking.
pub struct EdgePoints {
    edge: EdgeId,
}

impl EdgePoints {
    /// Creates a new `EdgePoints` query.
    #[must_use]
    pub fn new(edge: EdgeId) -> Self {
        Self { edge }
    }

    /// Start and end point, in the edge's natural direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or its vertices are missing.
    pub fn end_points(&self, store: &TopologyStore) -> Result<Vec<Point3>> {
        let edge = store.edge(self.edge)?;
        Ok(vec![
            store.vertex(edge.start)?.point,
            store.vertex(edge.end)?.point,
        ])
    }

    /// The point at the middle of the edge's parameter range.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing or evaluation fails.
    pub fn mid_point(&self, store: &TopologyStore) -> Result<Vec<Point3>> {
        let edge = store.edge(self.edge)?;
        let point = edge.curve.as_curve().evaluate(edge.mid_parameter())?;
        Ok(vec![point])
    }

    /// Center of the supporting circle; empty for straight edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing.
    pub fn center_point(&self, store: &TopologyStore) -> Result<Vec<Point3>> {
        match &store.edge(self.edge)?.curve {
            EdgeCurve::Arc(arc) => Ok(vec![*arc.center()]),
            EdgeCurve::Line(_) => Ok(Vec::new()),
        }
    }

    /// Points of the supporting circle at 0, 90, 180 and 270 degrees;
    /// empty for straight edges. The points are not trimmed to the arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is missing or evaluation fails.
    pub fn quadrant_points(&self, store: &TopologyStore) -> Result<Vec<Point3>> {
        let EdgeCurve::Arc(arc) = &store.edge(self.edge)?.curve else {
            return Ok(Vec::new());
        };
        [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2]
            .into_iter()
            .map(|t| arc.evaluate(t))
            .collect()
    }
}
