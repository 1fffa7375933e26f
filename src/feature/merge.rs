use crate::error::{IdentityError, Result};
use crate::identity::{PersistentId, RepairReport, ShapeIdentity};
use crate::operations::modification::RemoveEdge;
use crate::operations::OperationHistory;
use crate::topology::{ShapeKind, SolidId, TopologyStore};

use super::{solid_containing, Feature, FeatureBase};

/// Merges the two coplanar faces on either side of an edge.
pub struct MergeFeature {
    base: FeatureBase,
    edge: PersistentId,
}

impl MergeFeature {
    /// `edge` is the persistent id of the edge in the input feature.
    #[must_use]
    pub fn new(name: &str, edge: PersistentId) -> Self {
        Self {
            base: FeatureBase::new(name),
            edge,
        }
    }

    pub fn set_edge(&mut self, edge: PersistentId) {
        self.edge = edge;
    }

    /// Removes the edge and identifies the result. The merged face evolves
    /// from both faces it replaces.
    ///
    /// # Errors
    ///
    /// Returns the lookup or operation error after republishing the input.
    pub fn update(&mut self, store: &mut TopologyStore, input: &ShapeIdentity) -> Result<RepairReport> {
        let (solid, history) = match self.merge(store, input) {
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

    fn merge(&self, store: &mut TopologyStore, input: &ShapeIdentity) -> Result<(SolidId, OperationHistory)> {
        let edge = input.find_shape(self.edge)?.as_edge().ok_or(IdentityError::WrongKind {
            expected: ShapeKind::Edge,
            found: input.kind_of(self.edge)?,
        })?;
        let solid = solid_containing(input, self.edge)?;
        RemoveEdge::new(solid, edge).execute(store)
    }
}

impl Feature for MergeFeature {
    fn base(&self) -> &FeatureBase {
        &self.base
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::feature::test_support::assert_consistent;
    use crate::feature::{BoxFeature, FeatureState, SplitFeature};
    use crate::history::ShapeHistory;
    use crate::math::Point3;

    struct Chain {
        store: TopologyStore,
        source: BoxFeature,
        split: SplitFeature,
        pieces: Vec<PersistentId>,
        cut: PersistentId,
    }

    fn box_then_split() -> Chain {
        let mut store = TopologyStore::new();
        let mut source = BoxFeature::new("box", Point3::origin(), Point3::new(2.0, 2.0, 2.0));
        source.update(&mut store).unwrap();
        let top = source.identity().tag_store().id("FaceZP").unwrap();
        let mut split = SplitFeature::new("split", top);
        split.update(&mut store, source.identity()).unwrap();

        let pieces = split.identity().evolve(top);
        let a = split.identity().children_of_type(pieces[0], ShapeKind::Edge).unwrap();
        let b = split.identity().children_of_type(pieces[1], ShapeKind::Edge).unwrap();
        let shared: Vec<PersistentId> = a.into_iter().filter(|e| b.contains(e)).collect();
        assert_eq!(shared.len(), 1);
        Chain {
            store,
            source,
            split,
            pieces,
            cut: shared[0],
        }
    }

    #[test]
    fn merged_face_devolves_to_both_pieces() {
        crate::init_test_tracing();
        let mut chain = box_then_split();
        let mut merge = MergeFeature::new("merge", chain.cut);
        merge.update(&mut chain.store, chain.split.identity()).unwrap();
        assert_eq!(merge.state(), &FeatureState::Success);
        assert_consistent(merge.identity());

        let merged = merge.identity().evolve(chain.pieces[0]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merge.identity().kind_of(merged[0]).unwrap(), ShapeKind::Face);
        assert_eq!(merge.identity().evolve(chain.pieces[1]), merged);
        let origins = merge.identity().devolve(merged[0]);
        assert!(origins.contains(&chain.pieces[0]));
        assert!(origins.contains(&chain.pieces[1]));

        assert!(!merge.identity().has_id(chain.cut));
        assert!(merge.identity().has_evolve_record(chain.cut, PersistentId::nil()));
    }

    #[test]
    fn project_history_links_the_chain() {
        let mut chain = box_then_split();
        let mut merge = MergeFeature::new("merge", chain.cut);
        merge.update(&mut chain.store, chain.split.identity()).unwrap();

        let mut history = ShapeHistory::new();
        chain.source.fill_in_history(&mut history);
        chain.split.fill_in_history(&mut history);
        merge.fill_in_history(&mut history);

        let top = chain.source.identity().tag_store().id("FaceZP").unwrap();
        let merged = merge.identity().evolve(chain.pieces[0])[0];
        assert_eq!(history.feature_of(merged), Some(merge.id()));
        let ancestors = history.devolve(merged);
        assert!(ancestors.contains(&top));
        assert!(history.evolve(top).contains(&merged));
    }

    #[test]
    fn edge_between_faces_at_an_angle_fails() {
        let mut chain = box_then_split();
        let vertical = chain.source.identity().tag_store().id("EdgeXNYN").unwrap();
        let mut merge = MergeFeature::new("merge", vertical);
        assert!(merge.update(&mut chain.store, chain.split.identity()).is_err());
        assert!(matches!(merge.state(), FeatureState::Failed(_)));
        assert_consistent(merge.identity());
        for piece in &chain.pieces {
            assert!(merge.identity().has_id(*piece));
        }
    }
}
