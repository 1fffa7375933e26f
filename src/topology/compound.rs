use super::shape::Shape;

slotmap::new_key_type! {
    /// Unique identifier for a compound in the topology store.
    pub struct CompoundId;
}

/// An unordered grouping of arbitrary shapes.
///
/// Compounds are how multi-operand results (for example the operands of a
/// union) are published as a single root shape.
#[derive(Debug, Clone, Default)]
pub struct CompoundData {
    /// Member shapes, in insertion order.
    pub children: Vec<Shape>,
}
