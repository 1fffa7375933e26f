use std::collections::{HashMap, HashSet};

use crate::kernel::ShapeModification;
use crate::topology::Shape;

/// What a kernel operation did to the shapes it consumed.
///
/// Every operation in this module returns one of these next to its result.
/// Shapes an operation reused untouched are not mentioned at all; they are
/// still the same arena entities and identify themselves.
#[derive(Debug, Clone, Default)]
pub struct OperationHistory {
    modified: HashMap<Shape, Vec<Shape>>,
    generated: HashMap<Shape, Vec<Shape>>,
    deleted: HashSet<Shape>,
}

impl OperationHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `from` became `to`. Calling again with the same `from`
    /// appends another successor (a split).
    pub fn record_modified(&mut self, from: impl Into<Shape>, to: impl Into<Shape>) {
        let to = to.into();
        let successors = self.modified.entry(from.into()).or_default();
        if !successors.contains(&to) {
            successors.push(to);
        }
    }

    /// Records that `from` gave rise to the new shape `to` without becoming it.
    pub fn record_generated(&mut self, from: impl Into<Shape>, to: impl Into<Shape>) {
        let to = to.into();
        let generated = self.generated.entry(from.into()).or_default();
        if !generated.contains(&to) {
            generated.push(to);
        }
    }

    /// Records that `shape` has no counterpart in the result.
    pub fn record_deleted(&mut self, shape: impl Into<Shape>) {
        self.deleted.insert(shape.into());
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modified.is_empty() && self.generated.is_empty() && self.deleted.is_empty()
    }
}

impl ShapeModification for OperationHistory {
    type Shape = Shape;

    fn modified(&self, shape: &Shape) -> Vec<Shape> {
        self.modified.get(shape).cloned().unwrap_or_default()
    }

    fn generated(&self, shape: &Shape) -> Vec<Shape> {
        self.generated.get(shape).cloned().unwrap_or_default()
    }

    fn is_deleted(&self, shape: &Shape) -> bool {
        self.deleted.contains(shape)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::topology::{TopologyStore, VertexData};

    #[test]
    fn reports_splits_and_deletions() {
        let mut store = TopologyStore::new();
        let [a, b, c] = [0.0, 1.0, 2.0].map(|x| store.add_vertex(VertexData::new(Point3::new(x, 0.0, 0.0))));

        let mut history = OperationHistory::new();
        assert!(history.is_empty());
        history.record_modified(a, b);
        history.record_modified(a, c);
        history.record_modified(a, c);
        history.record_generated(b, c);
        history.record_deleted(c);

        let a = Shape::Vertex(a);
        assert_eq!(history.modified(&a), vec![Shape::Vertex(b), Shape::Vertex(c)]);
        assert_eq!(history.generated(&Shape::Vertex(b)), vec![Shape::Vertex(c)]);
        assert!(history.modified(&Shape::Vertex(b)).is_empty());
        assert!(history.is_deleted(&Shape::Vertex(c)));
        assert!(!history.is_deleted(&a));
    }
}
