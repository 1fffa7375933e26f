use crate::error::{OperationError, Result};
use crate::geometry::Surface;
use crate::math::TOLERANCE;
use crate::operations::creation::MakeWire;
use crate::operations::OperationHistory;
use crate::topology::{EdgeId, FaceData, FaceId, FaceSurface, SolidId, TopologyStore};

use super::rebuild::Rebuild;

/// Removes an edge shared by two coplanar faces, merging them into one.
///
/// The merged face keeps the surface of the first face found in shell order
/// and the holes of both.
pub struct RemoveEdge {
    solid: SolidId,
    edge: EdgeId,
}

impl RemoveEdge {
    /// Creates a new `RemoveEdge` operation.
    #[must_use]
    pub fn new(solid: SolidId, edge: EdgeId) -> Self {
        Self { solid, edge }
    }

    /// Executes the removal, returning the rebuilt solid.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly two faces of the solid use the edge
    /// on their outer wires, once each, and the faces are coplanar.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<(SolidId, OperationHistory)> {
        let [first, second] = self.adjacent_faces(store)?;
        let f1 = store.face(first)?.clone();
        let f2 = store.face(second)?.clone();
        if !coplanar(&f1, &f2)? {
            return Err(OperationError::InvalidInput("faces are not coplanar".into()).into());
        }

        let w1 = store.wire(f1.outer_wire)?.edges.clone();
        let w2 = store.wire(f2.outer_wire)?.edges.clone();
        let mut merged = Vec::with_capacity(w1.len() + w2.len() - 2);
        for edges in [&w1, &w2] {
            let Some(at) = edges.iter().position(|oe| oe.edge == self.edge) else {
                return Err(OperationError::Failed("edge vanished from wire".into()).into());
            };
            merged.extend(edges[at + 1..].iter().chain(&edges[..at]).copied());
        }
        let wire = MakeWire::new(merged).execute(store)?;
        if !store.wire(wire)?.is_closed {
            return Err(OperationError::Failed("merged boundary is not closed".into()).into());
        }

        let mut inner_wires = f1.inner_wires.clone();
        inner_wires.extend_from_slice(&f2.inner_wires);
        let face = store.add_face(FaceData {
            outer_wire: wire,
            inner_wires,
            ..f1.clone()
        });

        let mut history = OperationHistory::new();
        history.record_modified(first, face);
        history.record_modified(second, face);
        history.record_modified(f1.outer_wire, wire);
        history.record_modified(f2.outer_wire, wire);
        history.record_deleted(self.edge);

        let mut rebuild = Rebuild::new();
        rebuild.replace_face(first, vec![face]);
        rebuild.replace_face(second, Vec::new());
        let result = rebuild.solid(store, self.solid, &mut history)?;
        Ok((result, history))
    }

    fn adjacent_faces(&self, store: &TopologyStore) -> Result<[FaceId; 2]> {
        let mut found = Vec::new();
        for shell in store.solid(self.solid)?.shells() {
            for face in &store.shell(shell)?.faces {
                let data = store.face(*face)?;
                for inner in &data.inner_wires {
                    if store.wire(*inner)?.position(self.edge).is_some() {
                        return Err(OperationError::InvalidInput(
                            "edge bounds a hole".into(),
                        )
                        .into());
                    }
                }
                let uses = store
                    .wire(data.outer_wire)?
                    .edges
                    .iter()
                    .filter(|oe| oe.edge == self.edge)
                    .count();
                match uses {
                    0 => {}
                    1 => found.push(*face),
                    _ => {
                        return Err(OperationError::InvalidInput(
                            "edge is a seam of a single face".into(),
                        )
                        .into())
                    }
                }
            }
        }
        <[FaceId; 2]>::try_from(found).map_err(|faces| {
            OperationError::InvalidInput(format!(
                "edge must be shared by exactly two faces, found {}",
                faces.len()
            ))
            .into()
        })
    }
}

fn coplanar(a: &FaceData, b: &FaceData) -> Result<bool> {
    let (FaceSurface::Plane(pa), FaceSurface::Plane(pb)) = (&a.surface, &b.surface);
    let sense = |same: bool| if same { 1.0 } else { -1.0 };
    let na = pa.normal(0.0, 0.0)? * sense(a.same_sense);
    let nb = pb.normal(0.0, 0.0)? * sense(b.same_sense);
    let offset = (pb.origin() - pa.origin()).dot(&na);
    Ok(na.dot(&nb) > 1.0 - TOLERANCE && offset.abs() < TOLERANCE)
}
