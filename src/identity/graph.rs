use std::collections::{HashSet, VecDeque};

use slotmap::SecondaryMap;

use super::record::RecordKey;

/// Direction of a graph walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Towards contained shapes.
    Down,
    /// Towards containers.
    Up,
}

/// Direct containment between the records of one generation.
///
/// Both adjacency directions are stored, each in insertion order, so walks
/// are deterministic.
#[derive(Debug, Clone, Default)]
pub(crate) struct TopologyGraph {
    children: SecondaryMap<RecordKey, Vec<RecordKey>>,
    parents: SecondaryMap<RecordKey, Vec<RecordKey>>,
}

impl TopologyGraph {
    pub(crate) fn clear(&mut self) {
        self.children.clear();
        self.parents.clear();
    }

    /// Adds a containment edge; repeats are ignored.
    pub(crate) fn connect(&mut self, parent: RecordKey, child: RecordKey) {
        let children = self.children.entry(parent).map(|e| e.or_default());
        if let Some(children) = children {
            if children.contains(&child) {
                return;
            }
            children.push(child);
        }
        if let Some(parents) = self.parents.entry(child).map(|e| e.or_default()) {
            parents.push(parent);
        }
    }

    pub(crate) fn children(&self, key: RecordKey) -> &[RecordKey] {
        self.children.get(key).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn parents(&self, key: RecordKey) -> &[RecordKey] {
        self.parents.get(key).map_or(&[], Vec::as_slice)
    }

    /// Breadth-first walk from `start` (excluded), returning every reached
    /// key accepted by `select`, each once, in visiting order.
    pub(crate) fn walk(
        &self,
        start: RecordKey,
        direction: Direction,
        mut select: impl FnMut(RecordKey) -> bool,
    ) -> Vec<RecordKey> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut out = Vec::new();
        while let Some(key) = queue.pop_front() {
            let next = match direction {
                Direction::Down => self.children(key),
                Direction::Up => self.parents(key),
            };
            for &n in next {
                if seen.insert(n) {
                    if select(n) {
                        out.push(n);
                    }
                    queue.push_back(n);
                }
            }
        }
        out
    }

    /// Every edge as `(parent, child)`, in insertion order per parent.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (RecordKey, RecordKey)> + '_ {
        self.children
            .iter()
            .flat_map(|(p, cs)| cs.iter().map(move |c| (p, *c)))
    }
}
