use crate::error::{OperationError, Result};
use crate::math::midpoint;
use crate::operations::creation::{MakeEdge, MakeWire};
use crate::operations::OperationHistory;
use crate::topology::{
    EdgeCurve, EdgeId, FaceData, FaceId, OrientedEdge, SolidId, TopologyStore, VertexData,
    VertexId,
};

use super::rebuild::Rebuild;

/// Splits a planar face in two along the segment joining the midpoints of
/// two opposite edges of its outer wire.
///
/// For an outer wire of `n` edges the cut runs from edge `0` to edge `n / 2`.
/// Both cut edges are split in two, so the neighboring faces are rebuilt
/// around the new vertices. The rest of the solid is reused.
pub struct SplitFace {
    solid: SolidId,
    face: FaceId,
}

impl SplitFace {
    /// Creates a new `SplitFace` operation.
    #[must_use]
    pub fn new(solid: SolidId, face: FaceId) -> Self {
        Self { solid, face }
    }

    /// Executes the split, returning the rebuilt solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not part of the solid, has holes,
    /// has fewer than four outer edges, or a cut edge is not straight.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<(SolidId, OperationHistory)> {
        let solid = store.solid(self.solid)?.clone();
        let mut in_solid = false;
        for shell in solid.shells() {
            in_solid |= store.shell(shell)?.faces.contains(&self.face);
        }
        if !in_solid {
            return Err(OperationError::InvalidInput("face is not part of the solid".into()).into());
        }
        let face = store.face(self.face)?.clone();
        if !face.inner_wires.is_empty() {
            return Err(OperationError::InvalidInput("cannot split a face with holes".into()).into());
        }
        let outer = store.wire(face.outer_wire)?.clone();
        let n = outer.edges.len();
        if n < 4 {
            return Err(OperationError::InvalidInput(
                "face needs at least four outer edges to split".into(),
            )
            .into());
        }
        let k = n / 2;

        let mut history = OperationHistory::new();
        let mut rebuild = Rebuild::new();
        let (m0, first) = split_edge(store, outer.edges[0].edge, &mut history)?;
        let (mk, second) = split_edge(store, outer.edges[k].edge, &mut history)?;
        rebuild.replace_edge(outer.edges[0].edge, first.to_vec());
        rebuild.replace_edge(outer.edges[k].edge, second.to_vec());

        let cut = MakeEdge::new(m0, mk).execute(store)?;
        history.record_generated(self.face, cut);

        // Pieces in traversal order: [tail -> mid, mid -> head].
        let t0 = rebuild.pieces(outer.edges[0]);
        let tk = rebuild.pieces(outer.edges[k]);

        let mut loop_a = vec![t0[1]];
        loop_a.extend_from_slice(&outer.edges[1..k]);
        loop_a.push(tk[0]);
        loop_a.push(OrientedEdge::new(cut, false));

        let mut loop_b = vec![tk[1]];
        loop_b.extend_from_slice(&outer.edges[k + 1..]);
        loop_b.push(t0[0]);
        loop_b.push(OrientedEdge::new(cut, true));

        let mut pieces = Vec::with_capacity(2);
        for edges in [loop_a, loop_b] {
            let wire = MakeWire::new(edges).execute(store)?;
            let piece = store.add_face(FaceData {
                outer_wire: wire,
                inner_wires: Vec::new(),
                ..face.clone()
            });
            history.record_modified(face.outer_wire, wire);
            history.record_modified(self.face, piece);
            pieces.push(piece);
        }
        rebuild.replace_face(self.face, pieces);

        let result = rebuild.solid(store, self.solid, &mut history)?;
        Ok((result, history))
    }
}

/// Splits a straight edge at its midpoint into two edges that keep its
/// direction, recording the split.
fn split_edge(
    store: &mut TopologyStore,
    edge: EdgeId,
    history: &mut OperationHistory,
) -> Result<(VertexId, [EdgeId; 2])> {
    let data = store.edge(edge)?.clone();
    if !matches!(data.curve, EdgeCurve::Line(_)) {
        return Err(OperationError::InvalidInput("only straight edges can be split".into()).into());
    }
    let a = store.vertex(data.start)?.point;
    let b = store.vertex(data.end)?.point;
    let mid = store.add_vertex(VertexData::new(midpoint(&a, &b)));
    let first = MakeEdge::new(data.start, mid).execute(store)?;
    let second = MakeEdge::new(mid, data.end).execute(store)?;
    history.record_modified(edge, first);
    history.record_modified(edge, second);
    history.record_generated(edge, mid);
    Ok((mid, [first, second]))
}
