//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::PersistedId;

/// Contract violations on the tree model.
///
/// These are programmer errors on the mutation API, not recoverable
/// runtime conditions; callers should fail loud rather than retry.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid parent: node is not a container in the live tree")]
    InvalidParent,

    #[error("invalid target: node is not part of the live tree")]
    InvalidTarget,

    #[error("the root node cannot be deleted")]
    CannotDeleteRoot,

    #[error("duplicate persisted id: {0}")]
    DuplicateId(PersistedId),
}
