use std::collections::HashMap;

use crate::error::Result;
use crate::operations::creation::MakeWire;
use crate::operations::OperationHistory;
use crate::topology::{
    EdgeId, FaceData, FaceId, OrientedEdge, ShellData, ShellId, SolidData, SolidId, TopologyStore,
    WireId,
};

/// Rebuilds the containers of a solid after some of its edges or faces were
/// replaced, reusing every entity the replacement does not reach.
///
/// Rebuilt wires, faces, shells and the solid are recorded as modified into
/// their replacements. Replacements registered by the caller are assumed to
/// be recorded by the caller.
#[derive(Debug, Default)]
pub(super) struct Rebuild {
    /// Edge -> pieces in the edge's natural direction.
    edges: HashMap<EdgeId, Vec<EdgeId>>,
    /// Face -> faces taking its place in the shell, possibly none.
    faces: HashMap<FaceId, Vec<FaceId>>,
}

impl Rebuild {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn replace_edge(&mut self, edge: EdgeId, pieces: Vec<EdgeId>) {
        self.edges.insert(edge, pieces);
    }

    pub(super) fn replace_face(&mut self, face: FaceId, with: Vec<FaceId>) {
        self.faces.insert(face, with);
    }

    /// The pieces replacing `oe`, in traversal order.
    pub(super) fn pieces(&self, oe: OrientedEdge) -> Vec<OrientedEdge> {
        match self.edges.get(&oe.edge) {
            None => vec![oe],
            Some(pieces) if oe.forward => {
                pieces.iter().map(|e| OrientedEdge::new(*e, true)).collect()
            }
            Some(pieces) => pieces
                .iter()
                .rev()
                .map(|e| OrientedEdge::new(*e, false))
                .collect(),
        }
    }

    pub(super) fn solid(
        &self,
        store: &mut TopologyStore,
        solid: SolidId,
        history: &mut OperationHistory,
    ) -> Result<SolidId> {
        let data = store.solid(solid)?.clone();
        let mut shells = Vec::new();
        let mut changed = false;
        for shell in data.shells() {
            let rebuilt = self.shell(store, shell, history)?;
            changed |= rebuilt != shell;
            shells.push(rebuilt);
        }
        if !changed {
            return Ok(solid);
        }
        let inner_shells = shells.split_off(1);
        let rebuilt = store.add_solid(SolidData {
            outer_shell: shells[0],
            inner_shells,
        });
        history.record_modified(solid, rebuilt);
        Ok(rebuilt)
    }

    fn shell(
        &self,
        store: &mut TopologyStore,
        shell: ShellId,
        history: &mut OperationHistory,
    ) -> Result<ShellId> {
        let data = store.shell(shell)?.clone();
        let mut faces = Vec::with_capacity(data.faces.len());
        let mut changed = false;
        for face in &data.faces {
            if let Some(with) = self.faces.get(face) {
                changed = true;
                for replacement in with {
                    if !faces.contains(replacement) {
                        faces.push(*replacement);
                    }
                }
                continue;
            }
            let rebuilt = self.face(store, *face, history)?;
            changed |= rebuilt != *face;
            faces.push(rebuilt);
        }
        if !changed {
            return Ok(shell);
        }
        let rebuilt = store.add_shell(ShellData {
            faces,
            is_closed: data.is_closed,
        });
        history.record_modified(shell, rebuilt);
        Ok(rebuilt)
    }

    fn face(
        &self,
        store: &mut TopologyStore,
        face: FaceId,
        history: &mut OperationHistory,
    ) -> Result<FaceId> {
        let data = store.face(face)?.clone();
        let outer_wire = self.wire(store, data.outer_wire, history)?;
        let mut inner_wires = Vec::with_capacity(data.inner_wires.len());
        for wire in &data.inner_wires {
            inner_wires.push(self.wire(store, *wire, history)?);
        }
        if outer_wire == data.outer_wire && inner_wires == data.inner_wires {
            return Ok(face);
        }
        let rebuilt = store.add_face(FaceData {
            outer_wire,
            inner_wires,
            ..data
        });
        history.record_modified(face, rebuilt);
        Ok(rebuilt)
    }

    fn wire(
        &self,
        store: &mut TopologyStore,
        wire: WireId,
        history: &mut OperationHistory,
    ) -> Result<WireId> {
        let data = store.wire(wire)?;
        if !data.edges.iter().any(|oe| self.edges.contains_key(&oe.edge)) {
            return Ok(wire);
        }
        let edges: Vec<OrientedEdge> = data.edges.iter().flat_map(|oe| self.pieces(*oe)).collect();
        let rebuilt = MakeWire::new(edges).execute(store)?;
        history.record_modified(wire, rebuilt);
        Ok(rebuilt)
    }
}
