use crate::error::Result;
use crate::identity::RepairReport;
use crate::math::Point3;
use crate::operations::creation::MakeBox;
use crate::topology::{Shape, TopologyStore};

use super::{Feature, FeatureBase};

/// An axis-aligned box. Every sub-shape is bound to a feature tag, so ids
/// survive any change of the corners.
pub struct BoxFeature {
    base: FeatureBase,
    min_corner: Point3,
    max_corner: Point3,
}

impl BoxFeature {
    #[must_use]
    pub fn new(name: &str, min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            base: FeatureBase::new(name),
            min_corner,
            max_corner,
        }
    }

    pub fn set_corners(&mut self, min_corner: Point3, max_corner: Point3) {
        self.min_corner = min_corner;
        self.max_corner = max_corner;
    }

    /// Builds the box and identifies it.
    ///
    /// # Errors
    ///
    /// Returns an error if the box has no volume. There is no input to fall
    /// back to, so the identity is left null.
    pub fn update(&mut self, store: &mut TopologyStore) -> Result<RepairReport> {
        let shapes = match MakeBox::new(self.min_corner, self.max_corner).execute(store) {
            Ok(shapes) => shapes,
            Err(err) => {
                self.base.identity_mut().reset();
                self.base.state = super::FeatureState::Failed(err.to_string());
                return Err(err);
            }
        };
        self.base.publish(store, vec![Shape::Solid(shapes.solid)])?;
        let identity = self.base.identity_mut();
        for (tag, shape) in shapes.tagged() {
            let id = identity.feature_tag_id(tag);
            identity.update_id(shape, id)?;
        }
        let report = self.base.pipeline().run(self.base.identity_mut());
        Ok(self.base.succeed(report))
    }
}

impl Feature for BoxFeature {
    fn base(&self) -> &FeatureBase {
        &self.base
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::feature::test_support::assert_consistent;
    use crate::feature::FeatureState;
    use crate::topology::ShapeKind;

    #[test]
    fn ids_follow_tags_across_updates() {
        crate::init_test_tracing();
        let mut store = TopologyStore::new();
        let mut feature = BoxFeature::new("box", Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let report = feature.update(&mut store).unwrap();
        assert!(report.is_clean());
        assert_eq!(feature.state(), &FeatureState::Success);
        assert_consistent(feature.identity());
        assert_eq!(feature.identity().all_shape_ids().len(), 1 + 1 + 1 + 6 + 6 + 12 + 8);

        let before = feature.identity().all_shape_ids();
        let evolve_before = feature.identity().evolve_store().len();
        feature.set_corners(Point3::origin(), Point3::new(3.0, 2.0, 1.0));
        feature.update(&mut store).unwrap();
        assert_eq!(feature.identity().all_shape_ids(), before);
        assert_eq!(feature.identity().evolve_store().len(), evolve_before);

        let face = feature.identity().tag_store().id("FaceZP").unwrap();
        assert_eq!(feature.identity().kind_of(face).unwrap(), ShapeKind::Face);
        assert_eq!(feature.identity().feature_tag(face).unwrap(), "FaceZP");
    }

    #[test]
    fn degenerate_box_fails() {
        let mut store = TopologyStore::new();
        let mut feature = BoxFeature::new("box", Point3::origin(), Point3::new(1.0, 0.0, 1.0));
        assert!(feature.update(&mut store).is_err());
        assert!(feature.identity().is_null());
        assert!(matches!(feature.state(), FeatureState::Failed(_)));
    }
}
