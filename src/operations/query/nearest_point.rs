use crate::error::{OperationError, Result};
use crate::geometry::{Curve, Surface};
use crate::math::{closest_point_on_segment, Point3, TOLERANCE};
use crate::topology::{EdgeCurve, EdgeId, FaceId, FaceSurface, Shape, TopologyStore, WireId};

/// Finds the point on a vertex, edge, wire or face closest to a query point.
pub struct NearestPoint {
    shape: Shape,
    point: Point3,
}

impl NearestPoint {
    /// Creates a new `NearestPoint` query.
    #[must_use]
    pub fn new(shape: Shape, point: Point3) -> Self {
        Self { shape, point }
    }

    /// Executes the query. The result holds a single point.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is missing, or is a shell, solid or
    /// compound.
    pub fn execute(&self, store: &TopologyStore) -> Result<Vec<Point3>> {
        let nearest = match self.shape {
            Shape::Vertex(id) => store.vertex(id)?.point,
            Shape::Edge(id) => nearest_on_edge(store, id, &self.point)?,
            Shape::Wire(id) => nearest_on_wire(store, id, &self.point)?,
            Shape::Face(id) => nearest_on_face(store, id, &self.point)?,
            other => {
                return Err(OperationError::InvalidInput(format!(
                    "nearest point expects a vertex, edge, wire or face, got {}",
                    other.kind()
                ))
                .into())
            }
        };
        Ok(vec![nearest])
    }
}

fn nearest_on_edge(store: &TopologyStore, id: EdgeId, point: &Point3) -> Result<Point3> {
    let edge = store.edge(id)?;
    match &edge.curve {
        EdgeCurve::Line(_) => {
            let a = store.vertex(edge.start)?.point;
            let b = store.vertex(edge.end)?.point;
            Ok(closest_point_on_segment(point, &a, &b))
        }
        EdgeCurve::Arc(arc) => {
            let t = arc.closest_parameter(point);
            if t <= edge.t_end + TOLERANCE {
                return arc.evaluate(t);
            }
            // Outside the trimmed range: one of the ends is closest.
            let start = arc.evaluate(edge.t_start)?;
            let end = arc.evaluate(edge.t_end)?;
            if (start - point).norm() <= (end - point).norm() {
                Ok(start)
            } else {
                Ok(end)
            }
        }
    }
}

fn nearest_on_wire(store: &TopologyStore, id: WireId, point: &Point3) -> Result<Point3> {
    let wire = store.wire(id)?;
    let mut best: Option<(f64, Point3)> = None;
    for oe in &wire.edges {
        let candidate = nearest_on_edge(store, oe.edge, point)?;
        let distance = (candidate - point).norm();
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, p)| p)
        .ok_or_else(|| OperationError::Failed("wire has no edges".into()).into())
}

fn nearest_on_face(store: &TopologyStore, id: FaceId, point: &Point3) -> Result<Point3> {
    let face = store.face(id)?;
    let FaceSurface::Plane(ref plane) = face.surface;

    let (u, v) = plane.project(point);
    let projected = plane.evaluate(u, v)?;

    let outer = store.wire_points(face.outer_wire)?;
    let mut inside = winding_number(&projected, &outer, plane) != 0;
    for hole in &face.inner_wires {
        if winding_number(&projected, &store.wire_points(*hole)?, plane) != 0 {
            inside = false;
        }
    }
    if inside {
        return Ok(projected);
    }

    let mut best: Option<(f64, Point3)> = None;
    for wire in face.wires() {
        let candidate = nearest_on_wire(store, wire, point)?;
        let distance = (candidate - point).norm();
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, p)| p)
        .ok_or_else(|| OperationError::Failed("face has no boundary".into()).into())
}

/// Winding number of a point around a polygon lying in `plane`.
///
/// Non-zero => inside, zero => outside.
fn winding_number(point: &Point3, polygon: &[Point3], plane: &crate::geometry::Plane) -> i32 {
    let (px, py) = plane.project(point);
    let uvs: Vec<(f64, f64)> = polygon.iter().map(|p| plane.project(p)).collect();
    let n = uvs.len();
    let mut winding = 0i32;
    for i in 0..n {
        let (x0, y0) = uvs[i];
        let (x1, y1) = uvs[(i + 1) % n];
        let cross = (x1 - x0) * (py - y0) - (y1 - y0) * (px - x0);
        if y0 <= py {
            if y1 > py && cross > 0.0 {
                winding += 1;
            }
        } else if y1 <= py && cross < 0.0 {
            winding -= 1;
        }
    }
    winding
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{BoxSide, MakeBox};
    use approx::assert_relative_eq;

    #[test]
    fn face_projection_inside_and_outside() {
        let mut store = TopologyStore::new();
        let shapes = MakeBox::new(Point3::origin(), Point3::new(2.0, 2.0, 2.0))
            .execute(&mut store)
            .unwrap();
        let top = Shape::Face(shapes.face(BoxSide::ZP));

        let inside = NearestPoint::new(top, Point3::new(1.0, 0.5, 5.0))
            .execute(&store)
            .unwrap();
        assert_relative_eq!(inside[0], Point3::new(1.0, 0.5, 2.0), epsilon = 1e-9);

        let outside = NearestPoint::new(top, Point3::new(3.0, 1.0, 2.0))
            .execute(&store)
            .unwrap();
        assert_relative_eq!(outside[0], Point3::new(2.0, 1.0, 2.0), epsilon = 1e-9);
    }

    #[test]
    fn solid_is_rejected() {
        let mut store = TopologyStore::new();
        let shapes = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let result = NearestPoint::new(Shape::Solid(shapes.solid), Point3::origin()).execute(&store);
        assert!(result.is_err());
    }
}
