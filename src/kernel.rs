//! The seam between the identity layer and a geometry kernel.
//!
//! The identity layer never inspects kernel data directly. It sees shapes as
//! opaque keys whose `Eq`/`Hash` express the kernel's notion of "the same
//! sub-shape", and asks the kernel for containment, boundary and point data
//! through [`Kernel`]. Kernel operations describe their effect on input shapes
//! through [`ShapeModification`].

use std::fmt;
use std::hash::Hash;

use crate::error::{IdentityError, Result};
use crate::math::Point3;
use crate::operations::query::{EdgePoints, NearestPoint};
use crate::topology::{Shape, ShapeKind, TopologyStore};

/// Read access to a B-rep kernel.
pub trait Kernel {
    /// Opaque sub-shape key. Equality and hashing must be the kernel's
    /// same-ness relation, never pointer identity.
    type Shape: Clone + Eq + Hash + fmt::Debug;

    /// Returns the topological kind of a shape.
    fn shape_kind(&self, shape: &Self::Shape) -> ShapeKind;

    /// Returns the direct sub-shapes of a shape, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is unknown to the kernel.
    fn sub_shapes(&self, shape: &Self::Shape) -> Result<Vec<Self::Shape>>;

    /// Returns the outer wire of a face, `None` for other kinds.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is unknown to the kernel.
    fn outer_wire(&self, shape: &Self::Shape) -> Result<Option<Self::Shape>>;

    /// Returns the first vertex of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not an edge known to the kernel.
    fn first_vertex(&self, edge: &Self::Shape) -> Result<Self::Shape>;

    /// Returns the last vertex of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not an edge known to the kernel.
    fn last_vertex(&self, edge: &Self::Shape) -> Result<Self::Shape>;

    /// Start and end points of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not an edge known to the kernel.
    fn end_points(&self, edge: &Self::Shape) -> Result<Vec<Point3>>;

    /// Parametric midpoint of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not an edge known to the kernel.
    fn mid_point(&self, edge: &Self::Shape) -> Result<Vec<Point3>>;

    /// Center of a circular edge; empty for other curves.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not an edge known to the kernel.
    fn center_point(&self, edge: &Self::Shape) -> Result<Vec<Point3>>;

    /// Quadrant points of a circular edge; empty for other curves.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not an edge known to the kernel.
    fn quadrant_points(&self, edge: &Self::Shape) -> Result<Vec<Point3>>;

    /// Point on a vertex, edge, wire or face closest to `point`; empty when
    /// the kernel cannot compute one.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is unknown or of an unsupported kind.
    fn nearest_point(&self, shape: &Self::Shape, point: &Point3) -> Result<Vec<Point3>>;
}

/// Modified/generated/deleted reporting of one kernel operation.
pub trait ShapeModification {
    type Shape;

    /// Result shapes that `shape` turned into. Several entries mean a split.
    fn modified(&self, shape: &Self::Shape) -> Vec<Self::Shape>;

    /// New result shapes that `shape` gave rise to.
    fn generated(&self, shape: &Self::Shape) -> Vec<Self::Shape>;

    /// Whether `shape` vanished from the result.
    fn is_deleted(&self, shape: &Self::Shape) -> bool;
}

impl Kernel for TopologyStore {
    type Shape = Shape;

    fn shape_kind(&self, shape: &Shape) -> ShapeKind {
        shape.kind()
    }

    fn sub_shapes(&self, shape: &Shape) -> Result<Vec<Shape>> {
        Ok(TopologyStore::sub_shapes(self, *shape)?)
    }

    fn outer_wire(&self, shape: &Shape) -> Result<Option<Shape>> {
        match shape {
            Shape::Face(id) => Ok(Some(Shape::Wire(self.face(*id)?.outer_wire))),
            _ => Ok(None),
        }
    }

    fn first_vertex(&self, edge: &Shape) -> Result<Shape> {
        let id = expect_edge(edge)?;
        Ok(Shape::Vertex(self.edge(id)?.start))
    }

    fn last_vertex(&self, edge: &Shape) -> Result<Shape> {
        let id = expect_edge(edge)?;
        Ok(Shape::Vertex(self.edge(id)?.end))
    }

    fn end_points(&self, edge: &Shape) -> Result<Vec<Point3>> {
        EdgePoints::new(expect_edge(edge)?).end_points(self)
    }

    fn mid_point(&self, edge: &Shape) -> Result<Vec<Point3>> {
        EdgePoints::new(expect_edge(edge)?).mid_point(self)
    }

    fn center_point(&self, edge: &Shape) -> Result<Vec<Point3>> {
        EdgePoints::new(expect_edge(edge)?).center_point(self)
    }

    fn quadrant_points(&self, edge: &Shape) -> Result<Vec<Point3>> {
        EdgePoints::new(expect_edge(edge)?).quadrant_points(self)
    }

    fn nearest_point(&self, shape: &Shape, point: &Point3) -> Result<Vec<Point3>> {
        NearestPoint::new(*shape, *point).execute(self)
    }
}

fn expect_edge(shape: &Shape) -> Result<crate::topology::EdgeId> {
    shape.as_edge().ok_or_else(|| {
        IdentityError::WrongKind {
            expected: ShapeKind::Edge,
            found: shape.kind(),
        }
        .into()
    })
}
