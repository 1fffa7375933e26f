use crate::error::Result;
use crate::identity::{RepairReport, ShapeIdentity};
use crate::math::Vector3;
use crate::operations::transform::Translate;
use crate::topology::{Shape, TopologyStore};

use super::{single_solid, Feature, FeatureBase};

/// Moves the solid of its input by a displacement.
pub struct OffsetFeature {
    base: FeatureBase,
    displacement: Vector3,
}

impl OffsetFeature {
    #[must_use]
    pub fn new(name: &str, displacement: Vector3) -> Self {
        Self {
            base: FeatureBase::new(name),
            displacement,
        }
    }

    pub fn set_displacement(&mut self, displacement: Vector3) {
        self.displacement = displacement;
    }

    /// Moves the input solid and identifies the result.
    ///
    /// # Errors
    ///
    /// Returns the operation's error after republishing the input.
    pub fn update(&mut self, store: &mut TopologyStore, input: &ShapeIdentity) -> Result<RepairReport> {
        let result = single_solid(input).and_then(|solid| {
            Translate::new(Shape::Solid(solid), self.displacement).execute(store)
        });
        let (moved, history) = match result {
            Ok(result) => result,
            Err(err) => return self.base.fall_back(store, &[input], err),
        };
        self.base.publish(store, vec![moved])?;
        let report = self
            .base
            .pipeline()
            .source(input)
            .modified(&history, input)
            .run(self.base.identity_mut());
        Ok(self.base.succeed(report))
    }
}

impl Feature for OffsetFeature {
    fn base(&self) -> &FeatureBase {
        &self.base
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::feature::test_support::assert_consistent;
    use crate::feature::BoxFeature;
    use crate::math::Point3;
    use crate::topology::ShapeKind;

    fn face_ids(identity: &ShapeIdentity) -> Vec<crate::identity::PersistentId> {
        identity
            .records()
            .filter(|r| r.kind == ShapeKind::Face)
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn zero_offset_passes_identity_through() {
        crate::init_test_tracing();
        let mut store = TopologyStore::new();
        let mut source = BoxFeature::new("box", Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        source.update(&mut store).unwrap();

        let mut offset = OffsetFeature::new("offset", Vector3::zeros());
        let evolve_before = offset.identity().evolve_store().len();
        let report = offset.update(&mut store, source.identity()).unwrap();

        assert!(report.is_clean());
        assert_eq!(face_ids(offset.identity()), face_ids(source.identity()));
        assert_eq!(face_ids(offset.identity()).len(), 6);
        assert_eq!(offset.identity().evolve_store().len(), evolve_before);
        assert_consistent(offset.identity());

        // Recomputing over the same input changes nothing.
        let ids = offset.identity().all_shape_ids();
        offset.update(&mut store, source.identity()).unwrap();
        assert_eq!(offset.identity().all_shape_ids(), ids);
        assert_eq!(offset.identity().evolve_store().len(), evolve_before);
    }

    #[test]
    fn moved_shapes_evolve_from_their_source() {
        let mut store = TopologyStore::new();
        let mut source = BoxFeature::new("box", Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        source.update(&mut store).unwrap();

        let mut offset = OffsetFeature::new("offset", Vector3::new(0.0, 0.0, 2.0));
        offset.update(&mut store, source.identity()).unwrap();
        assert_consistent(offset.identity());

        let face = source.identity().tag_store().id("FaceXP").unwrap();
        let moved = offset.identity().evolve(face);
        assert_eq!(moved.len(), 1);
        assert!(offset.identity().has_id(moved[0]));
        assert_eq!(offset.identity().devolve(moved[0]), vec![face]);

        // A second run reuses the evolution instead of minting again.
        let count = offset.identity().evolve_store().len();
        offset.update(&mut store, source.identity()).unwrap();
        assert_eq!(offset.identity().evolve(face), moved);
        assert_eq!(offset.identity().evolve_store().len(), count);
    }
}
