use crate::error::Result;
use crate::identity::{RepairReport, ShapeIdentity};
use crate::topology::{Shape, TopologyStore};

use super::{solids, Feature, FeatureBase};

/// Collects the solids of several inputs into one result without touching
/// them.
pub struct UnionFeature {
    base: FeatureBase,
}

impl UnionFeature {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            base: FeatureBase::new(name),
        }
    }

    /// Publishes the solids of every input. Earlier inputs win when two of
    /// them claim the same shape.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read or nothing is published.
    pub fn update(&mut self, store: &mut TopologyStore, inputs: &[&ShapeIdentity]) -> Result<RepairReport> {
        let mut children = Vec::new();
        for input in inputs {
            children.extend(solids(input)?.into_iter().map(Shape::Solid));
        }
        self.base.publish(store, children)?;
        let mut pipeline = self.base.pipeline();
        for input in inputs {
            pipeline = pipeline.source(input);
        }
        let report = pipeline.run(self.base.identity_mut());
        Ok(self.base.succeed(report))
    }
}

impl Feature for UnionFeature {
    fn base(&self) -> &FeatureBase {
        &self.base
    }
}
