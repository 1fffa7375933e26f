use thiserror::Error;

use crate::identity::PersistentId;
use crate::topology::ShapeKind;

/// Top-level error type for the toponym crate.
#[derive(Debug, Error)]
pub enum ToponymError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Serial(#[from] SerialError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the kernel topology arena.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors raised by lookups and bindings on a shape identity.
///
/// Data-quality problems (nil or duplicated ids) are never reported through
/// this type; the matching pipeline logs and repairs them instead.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no shape with id {0}")]
    IdNotFound(PersistentId),

    #[error("shape not present in identity: {0}")]
    ShapeNotFound(String),

    #[error("expected {expected}, found {found}")]
    WrongKind { expected: ShapeKind, found: ShapeKind },

    #[error("identity has no shape")]
    NullShape,

    #[error("nil id is not allowed here")]
    NilId,

    #[error("feature tag '{tag}' conflicts with an existing binding")]
    TagConflict { tag: String },

    #[error("no feature tag '{0}'")]
    TagNotFound(String),
}

/// Errors related to persistence.
#[derive(Debug, Error)]
pub enum SerialError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid id '{0}'")]
    InvalidId(String),
}

/// Convenience type alias for results using [`ToponymError`].
pub type Result<T> = std::result::Result<T, ToponymError>;
