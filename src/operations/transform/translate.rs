use crate::error::{Result, TopologyError};
use crate::math::{Vector3, TOLERANCE};
use crate::operations::OperationHistory;
use crate::topology::{Shape, TopologyStore};

use super::copy::Copier;

/// Translates a shape by a displacement vector.
///
/// The input is left untouched; the result is a moved copy. A displacement
/// shorter than the tolerance is a no-op that returns the input shape itself
/// with an empty history.
pub struct Translate {
    shape: Shape,
    displacement: Vector3,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(shape: Shape, displacement: Vector3) -> Self {
        Self {
            shape,
            displacement,
        }
    }

    /// Executes the translation.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape or any of its sub-shapes is missing.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<(Shape, OperationHistory)> {
        if self.displacement.norm() < TOLERANCE {
            if !store.contains(self.shape) {
                return Err(TopologyError::EntityNotFound(self.shape.to_string()).into());
            }
            return Ok((self.shape, OperationHistory::new()));
        }
        let mut copier = Copier::new(self.displacement);
        let moved = copier.copy(store, self.shape)?;
        Ok((moved, copier.history))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kernel::ShapeModification;
    use crate::math::Point3;
    use crate::operations::creation::MakeBox;
    use approx::assert_relative_eq;

    #[test]
    fn zero_offset_is_identity() {
        let mut store = TopologyStore::new();
        let shapes = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let solid = Shape::Solid(shapes.solid);
        let (moved, history) = Translate::new(solid, Vector3::zeros())
            .execute(&mut store)
            .unwrap();
        assert_eq!(moved, solid);
        assert!(history.is_empty());
    }

    #[test]
    fn translation_moves_vertices() {
        let mut store = TopologyStore::new();
        let shapes = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .execute(&mut store)
            .unwrap();
        let (_, history) = Translate::new(Shape::Solid(shapes.solid), Vector3::new(0.0, 0.0, 5.0))
            .execute(&mut store)
            .unwrap();
        let origin = Shape::Vertex(shapes.vertices[0]);
        let moved = history.modified(&origin)[0].as_vertex().unwrap();
        assert_relative_eq!(store.vertex(moved).unwrap().point, Point3::new(0.0, 0.0, 5.0));
    }
}
