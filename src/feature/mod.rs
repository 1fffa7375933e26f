//! Reference features: the update routines that drive kernel operations and
//! the identity pipeline, one generation per call.
//!
//! Every feature publishes its result wrapped in a compound whose id is the
//! feature's `Root` tag, so downstream features always find the same root
//! id. When the kernel operation fails, the feature republishes its input
//! unchanged, still runs the matching passes against it, and reports the
//! failure.

mod make_box;
mod merge;
mod offset;
mod split;
mod union;

pub use make_box::BoxFeature;
pub use merge::MergeFeature;
pub use offset::OffsetFeature;
pub use split::SplitFeature;
pub use union::UnionFeature;

use tracing::warn;

use crate::error::{IdentityError, Result, ToponymError};
use crate::history::ShapeHistory;
use crate::identity::{PersistentId, Pipeline, PipelineConfig, RepairReport, ShapeIdentity};
use crate::operations::creation::MakeCompound;
use crate::topology::{Shape, ShapeKind, SolidId, TopologyStore};

/// Outcome of the last update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeatureState {
    /// Never updated.
    #[default]
    Dirty,
    Success,
    /// The kernel operation failed; the input was republished.
    Failed(String),
}

/// Read access shared by every feature.
pub trait Feature {
    fn base(&self) -> &FeatureBase;

    fn id(&self) -> PersistentId {
        self.base().id
    }

    fn name(&self) -> &str {
        &self.base().config.label
    }

    fn identity(&self) -> &ShapeIdentity {
        &self.base().identity
    }

    fn state(&self) -> &FeatureState {
        &self.base().state
    }

    /// Projects this feature's last generation into the project history.
    fn fill_in_history(&self, history: &mut ShapeHistory) {
        self.identity().fill_in_history(history, self.id());
    }
}

/// State every feature carries.
#[derive(Debug, Clone)]
pub struct FeatureBase {
    id: PersistentId,
    config: PipelineConfig,
    identity: ShapeIdentity,
    state: FeatureState,
}

impl FeatureBase {
    pub(crate) fn new(name: &str) -> Self {
        let mut identity = ShapeIdentity::new();
        identity.feature_tag_id(ROOT_TAG);
        Self {
            id: PersistentId::random(),
            config: PipelineConfig::labeled(name),
            identity,
            state: FeatureState::Dirty,
        }
    }

    /// Replaces the pipeline configuration, keeping the label.
    pub fn set_config(&mut self, config: PipelineConfig) {
        let label = std::mem::take(&mut self.config.label);
        self.config = PipelineConfig { label, ..config };
    }

    /// Wraps `children` in a compound and makes it the new generation, with
    /// the root tag's id on the compound.
    pub(crate) fn publish(&mut self, store: &mut TopologyStore, children: Vec<Shape>) -> Result<()> {
        let compound = MakeCompound::new(children).execute(store)?;
        let root_id = self.identity.feature_tag_id(ROOT_TAG);
        self.identity.set_shape(store, Shape::Compound(compound), root_id)
    }

    pub(crate) fn pipeline<'a>(&self) -> Pipeline<'a, Shape> {
        Pipeline::new(self.config.clone())
    }

    pub(crate) fn identity_mut(&mut self) -> &mut ShapeIdentity {
        &mut self.identity
    }

    pub(crate) fn succeed(&mut self, report: RepairReport) -> RepairReport {
        self.state = FeatureState::Success;
        report
    }

    /// Republishes the solids of `inputs`, matches them, records the failure
    /// and hands the error back.
    pub(crate) fn fall_back(
        &mut self,
        store: &mut TopologyStore,
        inputs: &[&ShapeIdentity],
        error: ToponymError,
    ) -> Result<RepairReport> {
        warn!(feature = %self.config.label, %error, "operation failed, republishing input");
        self.state = FeatureState::Failed(error.to_string());
        let mut children = Vec::new();
        for input in inputs {
            children.extend(solids(input)?.into_iter().map(Shape::Solid));
        }
        self.publish(store, children)?;
        let mut pipeline = self.pipeline();
        for input in inputs {
            pipeline = pipeline.source(input);
        }
        pipeline.run(&mut self.identity);
        Err(error)
    }
}

const ROOT_TAG: &str = "Root";

/// The solids directly published by an input feature.
pub(crate) fn solids(input: &ShapeIdentity) -> Result<Vec<SolidId>> {
    let mut out = Vec::new();
    for id in input.non_compound_children() {
        if let Some(solid) = input.find_shape(id)?.as_solid() {
            out.push(solid);
        }
    }
    Ok(out)
}

/// The single solid published by an input feature.
pub(crate) fn single_solid(input: &ShapeIdentity) -> Result<SolidId> {
    match solids(input)?[..] {
        [solid] => Ok(solid),
        _ => Err(IdentityError::ShapeNotFound("input must publish exactly one solid".into()).into()),
    }
}

/// The solid of `input` that contains the shape holding `id`.
pub(crate) fn solid_containing(input: &ShapeIdentity, id: PersistentId) -> Result<SolidId> {
    let shape = *input.find_shape(id)?;
    if let Some(solid) = shape.as_solid() {
        return Ok(solid);
    }
    input
        .shape_parents_of_type(&shape, ShapeKind::Solid)?
        .first()
        .and_then(Shape::as_solid)
        .ok_or_else(|| IdentityError::ShapeNotFound(format!("no solid contains {id}")).into())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashSet;

    use crate::identity::{PersistentId, ShapeIdentity};

    /// Asserts the repair invariants: no nil id and no shared id.
    pub(crate) fn assert_consistent(identity: &ShapeIdentity) {
        let ids = identity.all_shape_ids();
        assert!(ids.iter().all(|id| !id.is_nil()), "nil id left");
        let distinct: HashSet<PersistentId> = ids.iter().copied().collect();
        assert_eq!(distinct.len(), ids.len(), "duplicated id left");
    }
}
