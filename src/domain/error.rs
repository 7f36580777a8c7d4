//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent violations of the tree invariants or malformed input.
/// Leaf child operations and removal of absent children are no-ops, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid node id: {0}")]
    InvalidNode(NodeId),

    #[error("cycle detected: {child} is an ancestor of {parent}")]
    CycleDetected { parent: NodeId, child: NodeId },

    #[error("parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("invalid notation: {0}")]
    InvalidNotation(String),

    #[error("tree is {depth} levels deep, at most {limit} supported here")]
    TooDeep { depth: usize, limit: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
