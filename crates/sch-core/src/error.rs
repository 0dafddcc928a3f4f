//! Error types for building constraint trees.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors raised while building a constraint tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConstraintError {
    /// A node was declared with an empty location path.
    #[error("constraint context must not be empty")]
    EmptyContext,

    /// A node id does not belong to the tree it was used with.
    #[error("unknown constraint node {id}")]
    UnknownNode {
        /// The offending node id.
        id: NodeId,
    },
}

/// Result type alias for constraint tree operations.
pub type Result<T> = std::result::Result<T, ConstraintError>;
