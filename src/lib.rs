//! seglist: campaign segment list editor core.
//!
//! In-memory segment tree with a load/mutate/diff/save lifecycle. The
//! store owns the live editable tree plus an immutable baseline frozen
//! at load time; the diff engine turns the difference into a minimal
//! ordered change-set, and the save coordinator submits it atomically
//! and reconciles server-assigned ids back into the tree.
//!
//! Permission checks, transport and message display are external
//! collaborators consumed through the traits in
//! [`infrastructure::traits`].

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod util;

pub use application::services::{ListEditor, SaveCoordinator, SaveState, TreeStore};
pub use application::{ApplicationError, ApplicationResult};
pub use config::{LabelNamespace, Settings};
pub use domain::{
    diff, AudienceRef, ChangeSet, ChildKind, CreateOp, DeleteOp, DomainError, NodeHandle, NodeId,
    NodeKind, ParentRef, PersistedId, SegmentTree, TempRef, TreeNode,
};
pub use infrastructure::TransportError;
