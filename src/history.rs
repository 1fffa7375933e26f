//! Project-wide history of persistent ids across features.
//!
//! Each node is an id tagged with the feature that produced it. Connections
//! point from a newer id (child) to the older id it came from (parent). The
//! identity of every feature feeds this graph through
//! [`ShapeIdentity::fill_in_history`](crate::identity::ShapeIdentity::fill_in_history),
//! and selection walks it to re-target stale picks.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::error::{IdentityError, Result};
use crate::identity::PersistentId;

slotmap::new_key_type! {
    struct NodeKey;
}

#[derive(Debug, Clone)]
struct HistoryNode {
    shape_id: PersistentId,
    feature_id: PersistentId,
    parents: Vec<NodeKey>,
    children: Vec<NodeKey>,
}

/// Directed graph of ids, newer pointing at older.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SerialShapeHistory", into = "SerialShapeHistory")]
pub struct ShapeHistory {
    nodes: SlotMap<NodeKey, HistoryNode>,
    order: Vec<NodeKey>,
    index: HashMap<PersistentId, NodeKey>,
}

impl ShapeHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `shape_id` as produced by `feature_id`. An id already present
    /// keeps its feature.
    pub fn add_shape(&mut self, feature_id: PersistentId, shape_id: PersistentId) {
        if self.index.contains_key(&shape_id) {
            return;
        }
        let key = self.nodes.insert(HistoryNode {
            shape_id,
            feature_id,
            parents: Vec::new(),
            children: Vec::new(),
        });
        self.order.push(key);
        self.index.insert(shape_id, key);
    }

    #[must_use]
    pub fn has_shape(&self, shape_id: PersistentId) -> bool {
        self.index.contains_key(&shape_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records that `child` came from `parent`. Repeats are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::IdNotFound`] if either id is not in the
    /// history.
    pub fn add_connection(&mut self, child: PersistentId, parent: PersistentId) -> Result<()> {
        let child_key = self.key(child)?;
        let parent_key = self.key(parent)?;
        if child_key == parent_key {
            return Ok(());
        }
        if let Some(node) = self.nodes.get_mut(child_key) {
            if node.parents.contains(&parent_key) {
                return Ok(());
            }
            node.parents.push(parent_key);
        }
        if let Some(node) = self.nodes.get_mut(parent_key) {
            node.children.push(child_key);
        }
        Ok(())
    }

    /// The feature that produced `shape_id`.
    #[must_use]
    pub fn feature_of(&self, shape_id: PersistentId) -> Option<PersistentId> {
        self.node(shape_id).map(|n| n.feature_id)
    }

    /// Every id `shape_id` came from, nearest first.
    #[must_use]
    pub fn devolve(&self, shape_id: PersistentId) -> Vec<PersistentId> {
        self.walk(shape_id, |n| &n.parents)
    }

    /// Every id that came from `shape_id`, nearest first.
    #[must_use]
    pub fn evolve(&self, shape_id: PersistentId) -> Vec<PersistentId> {
        self.walk(shape_id, |n| &n.children)
    }

    /// The nearest ancestor of `shape_id` produced by `feature_id`.
    #[must_use]
    pub fn devolve_in_feature(
        &self,
        feature_id: PersistentId,
        shape_id: PersistentId,
    ) -> Option<PersistentId> {
        self.devolve(shape_id)
            .into_iter()
            .find(|id| self.feature_of(*id) == Some(feature_id))
    }

    /// The sub-history of `shape_id` and everything it came from.
    #[must_use]
    pub fn create_devolve_history(&self, shape_id: PersistentId) -> ShapeHistory {
        self.extract(shape_id, self.devolve(shape_id))
    }

    /// The sub-history of `shape_id` and everything that came from it.
    #[must_use]
    pub fn create_evolve_history(&self, shape_id: PersistentId) -> ShapeHistory {
        self.extract(shape_id, self.evolve(shape_id))
    }

    /// Re-targets a pick made in an older state of the project.
    ///
    /// `pick` is the devolve history saved with the pick. Starting at its
    /// newest id and walking towards older ones, the first id this history
    /// knows is followed forward; the result holds that id and its
    /// descendants produced by `feature_id`.
    #[must_use]
    pub fn resolve_histories(&self, pick: &ShapeHistory, feature_id: PersistentId) -> Vec<PersistentId> {
        let Some(newest) = pick.newest() else {
            return Vec::new();
        };
        let candidates = std::iter::once(newest).chain(pick.devolve(newest));
        for id in candidates {
            if !self.has_shape(id) {
                continue;
            }
            return std::iter::once(id)
                .chain(self.evolve(id))
                .filter(|s| self.feature_of(*s) == Some(feature_id))
                .collect();
        }
        Vec::new()
    }

    /// Writes the graph as Graphviz DOT.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_graphviz<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "digraph history {{")?;
        for (i, key) in self.order.iter().enumerate() {
            if let Some(node) = self.nodes.get(*key) {
                writeln!(
                    out,
                    "  n{i} [label=\"{}\\nfeature {}\"];",
                    node.shape_id, node.feature_id
                )?;
            }
        }
        let positions: HashMap<NodeKey, usize> =
            self.order.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        for (i, key) in self.order.iter().enumerate() {
            let Some(node) = self.nodes.get(*key) else {
                continue;
            };
            for parent in &node.parents {
                if let Some(p) = positions.get(parent) {
                    writeln!(out, "  n{i} -> n{p};")?;
                }
            }
        }
        writeln!(out, "}}")
    }

    fn key(&self, shape_id: PersistentId) -> Result<NodeKey> {
        self.index
            .get(&shape_id)
            .copied()
            .ok_or_else(|| IdentityError::IdNotFound(shape_id).into())
    }

    fn node(&self, shape_id: PersistentId) -> Option<&HistoryNode> {
        self.index.get(&shape_id).and_then(|k| self.nodes.get(*k))
    }

    /// The first id, in insertion order, that nothing came from.
    fn newest(&self) -> Option<PersistentId> {
        self.order
            .iter()
            .filter_map(|k| self.nodes.get(*k))
            .find(|n| n.children.is_empty())
            .map(|n| n.shape_id)
    }

    fn walk(
        &self,
        shape_id: PersistentId,
        next: impl Fn(&HistoryNode) -> &Vec<NodeKey>,
    ) -> Vec<PersistentId> {
        let Some(&start) = self.index.get(&shape_id) else {
            return Vec::new();
        };
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut out = Vec::new();
        while let Some(key) = queue.pop_front() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            for &n in next(node) {
                if seen.insert(n) {
                    if let Some(found) = self.nodes.get(n) {
                        out.push(found.shape_id);
                    }
                    queue.push_back(n);
                }
            }
        }
        out
    }

    fn extract(&self, shape_id: PersistentId, related: Vec<PersistentId>) -> ShapeHistory {
        let mut sub = ShapeHistory::new();
        if !self.has_shape(shape_id) {
            return sub;
        }
        let members: Vec<PersistentId> = std::iter::once(shape_id).chain(related).collect();
        for id in &members {
            if let Some(feature) = self.feature_of(*id) {
                sub.add_shape(feature, *id);
            }
        }
        for (child, parent) in self.connections() {
            if sub.has_shape(child) && sub.has_shape(parent) {
                // Both ends were just added.
                let _ = sub.add_connection(child, parent);
            }
        }
        sub
    }

    /// Every connection as `(child, parent)`.
    fn connections(&self) -> Vec<(PersistentId, PersistentId)> {
        self.order
            .iter()
            .filter_map(|k| self.nodes.get(*k))
            .flat_map(|n| {
                n.parents
                    .iter()
                    .filter_map(|p| self.nodes.get(*p))
                    .map(move |p| (n.shape_id, p.shape_id))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerialShapeHistory {
    shapes: Vec<SerialHistoryShape>,
    connections: Vec<(PersistentId, PersistentId)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerialHistoryShape {
    id: PersistentId,
    feature: PersistentId,
}

impl From<ShapeHistory> for SerialShapeHistory {
    fn from(history: ShapeHistory) -> Self {
        Self {
            shapes: history
                .order
                .iter()
                .filter_map(|k| history.nodes.get(*k))
                .map(|n| SerialHistoryShape {
                    id: n.shape_id,
                    feature: n.feature_id,
                })
                .collect(),
            connections: history.connections(),
        }
    }
}

impl From<SerialShapeHistory> for ShapeHistory {
    fn from(serial: SerialShapeHistory) -> Self {
        let mut history = ShapeHistory::new();
        for shape in serial.shapes {
            history.add_shape(shape.feature, shape.id);
        }
        for (child, parent) in serial.connections {
            // Connections to unknown ids are dropped.
            let _ = history.add_connection(child, parent);
        }
        history
    }
}
