use crate::error::{IdentityError, Result};
use crate::identity::{PersistentId, RepairReport, ShapeIdentity};
use crate::operations::modification::SplitFace;
use crate::operations::OperationHistory;
use crate::topology::{ShapeKind, SolidId, TopologyStore};

use super::{solid_containing, Feature, FeatureBase};

/// Splits one face of its input solid in two.
pub struct SplitFeature {
    base: FeatureBase,
    face: PersistentId,
}

impl SplitFeature {
    /// `face` is the persistent id of the face in the input feature.
    #[must_use]
    pub fn new(name: &str, face: PersistentId) -> Self {
        Self {
            base: FeatureBase::new(name),
            face,
        }
    }

    pub fn set_face(&mut self, face: PersistentId) {
        self.face = face;
    }

    /// Splits the face and identifies the result. The two pieces get ids
    /// that a later run over the same input reproduces.
    ///
    /// # Errors
    ///
    /// Returns the lookup or operation error after republishing the input.
    pub fn update(&mut self, store: &mut TopologyStore, input: &ShapeIdentity) -> Result<RepairReport> {
        let (solid, history) = match self.split(store, input) {
            Ok(result) => result,
            Err(err) => return self.base.fall_back(store, &[input], err),
        };
        self.base.publish(store, vec![solid.into()])?;
        let report = self
            .base
            .pipeline()
            .source(input)
            .modified(&history, input)
            .run(self.base.identity_mut());
        Ok(self.base.succeed(report))
    }

    fn split(&self, store: &mut TopologyStore, input: &ShapeIdentity) -> Result<(SolidId, OperationHistory)> {
        let face = input.find_shape(self.face)?.as_face().ok_or(IdentityError::WrongKind {
            expected: ShapeKind::Face,
            found: input.kind_of(self.face)?,
        })?;
        let solid = solid_containing(input, self.face)?;
        SplitFace::new(solid, face).execute(store)
    }
}

impl Feature for SplitFeature {
    fn base(&self) -> &FeatureBase {
        &self.base
    }
}
