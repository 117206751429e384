//! Domain layer: segment tree model and diff algorithm
//!
//! This layer is independent of external concerns (no I/O, no config
//! loading, no collaborator traits).

pub mod diff;
pub mod error;
pub mod node;
pub mod tree;

pub use diff::{diff, ChangeSet, CreateOp, DeleteOp, ParentRef};
pub use error::DomainError;
pub use node::{AudienceRef, ChildKind, NodeId, NodeKind, PersistedId, TempRef};
pub use tree::{NodeHandle, SegmentTree, TreeNode};
