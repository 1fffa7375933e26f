use std::fmt;

use serde::{Deserialize, Serialize};

use super::compound::CompoundId;
use super::edge::EdgeId;
use super::face::FaceId;
use super::shell::ShellId;
use super::solid::SolidId;
use super::vertex::VertexId;
use super::wire::WireId;

/// The closed set of topological kinds.
///
/// Declared from the top of the containment hierarchy down, so the derived
/// ordering sorts containers before their contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Compound,
    Solid,
    Shell,
    Face,
    Wire,
    Edge,
    Vertex,
}

impl ShapeKind {
    /// Every kind, containers first.
    pub const ALL: [Self; 7] = [
        Self::Compound,
        Self::Solid,
        Self::Shell,
        Self::Face,
        Self::Wire,
        Self::Edge,
        Self::Vertex,
    ];

    /// Returns the lowercase name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compound => "compound",
            Self::Solid => "solid",
            Self::Shell => "shell",
            Self::Face => "face",
            Self::Wire => "wire",
            Self::Edge => "edge",
            Self::Vertex => "vertex",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handle to any entity in a [`TopologyStore`](super::TopologyStore).
///
/// Two handles are the same shape exactly when they name the same arena
/// entity. Edge orientation lives in the wires that use an edge, so a shared
/// edge is one shape no matter how many wires traverse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Vertex(VertexId),
    Edge(EdgeId),
    Wire(WireId),
    Face(FaceId),
    Shell(ShellId),
    Solid(SolidId),
    Compound(CompoundId),
}

impl Shape {
    /// Returns the topological kind of this shape.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Vertex(_) => ShapeKind::Vertex,
            Self::Edge(_) => ShapeKind::Edge,
            Self::Wire(_) => ShapeKind::Wire,
            Self::Face(_) => ShapeKind::Face,
            Self::Shell(_) => ShapeKind::Shell,
            Self::Solid(_) => ShapeKind::Solid,
            Self::Compound(_) => ShapeKind::Compound,
        }
    }

    #[must_use]
    pub fn as_vertex(&self) -> Option<VertexId> {
        match self {
            Self::Vertex(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_edge(&self) -> Option<EdgeId> {
        match self {
            Self::Edge(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_wire(&self) -> Option<WireId> {
        match self {
            Self::Wire(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_face(&self) -> Option<FaceId> {
        match self {
            Self::Face(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_solid(&self) -> Option<SolidId> {
        match self {
            Self::Solid(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use slotmap::Key;
        let data = match self {
            Self::Vertex(id) => id.data(),
            Self::Edge(id) => id.data(),
            Self::Wire(id) => id.data(),
            Self::Face(id) => id.data(),
            Self::Shell(id) => id.data(),
            Self::Solid(id) => id.data(),
            Self::Compound(id) => id.data(),
        };
        write!(f, "{}:{:?}", self.kind(), data)
    }
}

macro_rules! shape_from {
    ($($id:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$id> for Shape {
                fn from(id: $id) -> Self {
                    Self::$variant(id)
                }
            }
        )*
    };
}

shape_from! {
    VertexId => Vertex,
    EdgeId => Edge,
    WireId => Wire,
    FaceId => Face,
    ShellId => Shell,
    SolidId => Solid,
    CompoundId => Compound,
}
