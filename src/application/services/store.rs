//! Tree store service
//!
//! Owns the live editable tree plus the immutable baseline snapshot
//! frozen at load time. All mutations go through here; the baseline is
//! only replaced by a successful save's reconciliation.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::diff::{diff, ChangeSet};
use crate::domain::node::{AudienceRef, ChildKind, NodeId, PersistedId};
use crate::domain::tree::{NodeHandle, SegmentTree};
use crate::infrastructure::traits::{SnapshotNode, SubmitReceipt, TreeLoader, TreeSnapshot};

struct Loaded {
    live: SegmentTree,
    /// Structurally independent deep copy, never aliased with `live`.
    baseline: SegmentTree,
}

/// Owner of the live segment tree and its baseline.
pub struct TreeStore {
    loader: Arc<dyn TreeLoader>,
    state: Option<Loaded>,
}

impl TreeStore {
    pub fn new(loader: Arc<dyn TreeLoader>) -> Self {
        Self {
            loader,
            state: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    /// Fetch the persisted tree, materialize it, and freeze the baseline.
    ///
    /// Must succeed before any mutation; a failed load leaves the store
    /// unusable until a retry succeeds.
    #[instrument(level = "debug", skip(self), fields(root_id = %root_id))]
    pub fn load(&mut self, root_id: &PersistedId) -> ApplicationResult<()> {
        let snapshot = self
            .loader
            .fetch(root_id)
            .map_err(|source| ApplicationError::LoadFailed { source })?;
        let live = materialize(&snapshot)?;
        debug!(nodes = live.len(), "materialized segment tree");
        let baseline = live.clone();
        self.state = Some(Loaded { live, baseline });
        Ok(())
    }

    /// Append a new unsaved group under `parent`. No server round-trip.
    #[instrument(level = "debug", skip(self, label))]
    pub fn add_group(
        &mut self,
        parent: NodeHandle,
        label: impl Into<String>,
    ) -> ApplicationResult<NodeHandle> {
        let state = self.loaded_mut()?;
        let handle = state
            .live
            .insert_child(parent, NodeId::unassigned(), label, ChildKind::Group)?;
        Ok(handle)
    }

    /// Append a new unsaved segment under `parent`. No server round-trip.
    #[instrument(level = "debug", skip(self, label), fields(audience = %audience))]
    pub fn add_segment(
        &mut self,
        parent: NodeHandle,
        label: impl Into<String>,
        audience: AudienceRef,
    ) -> ApplicationResult<NodeHandle> {
        let state = self.loaded_mut()?;
        let handle = state.live.insert_child(
            parent,
            NodeId::unassigned(),
            label,
            ChildKind::Segment { audience },
        )?;
        Ok(handle)
    }

    /// Detach the subtree rooted at `node` from the live tree.
    ///
    /// A never-saved node is simply discarded; a saved node's removal
    /// shows up as a delete in the next diff.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_node(&mut self, node: NodeHandle) -> ApplicationResult<()> {
        let state = self.loaded_mut()?;
        state.live.detach(node)?;
        Ok(())
    }

    /// Read-only view of the live tree for rendering.
    pub fn current_tree(&self) -> ApplicationResult<&SegmentTree> {
        self.state
            .as_ref()
            .map(|state| &state.live)
            .ok_or(ApplicationError::NotLoaded)
    }

    /// Handle of the live tree's root.
    pub fn root(&self) -> ApplicationResult<NodeHandle> {
        Ok(self.current_tree()?.root())
    }

    /// Diff the baseline against the live tree.
    pub fn change_set(&self) -> ApplicationResult<ChangeSet> {
        let state = self.state.as_ref().ok_or(ApplicationError::NotLoaded)?;
        Ok(diff(&state.baseline, &state.live))
    }

    /// Rewrite server-assigned ids into the live tree and rebase the
    /// baseline onto a fresh deep copy of the reconciled result.
    #[instrument(level = "debug", skip_all, fields(created = receipt.created_ids.len()))]
    pub(crate) fn reconcile(&mut self, receipt: &SubmitReceipt) -> ApplicationResult<()> {
        let state = self.state.as_mut().ok_or(ApplicationError::NotLoaded)?;
        for (temp, id) in &receipt.created_ids {
            match state.live.find_temp(*temp) {
                Some(handle) => state.live.assign_id(handle, id.clone())?,
                // The node was deleted while the save was in flight; its
                // new id has no live counterpart and is dropped here.
                None => debug!(temp = %temp, id = %id, "assigned id has no live node"),
            }
        }
        state.baseline = state.live.clone();
        Ok(())
    }

    fn loaded_mut(&mut self) -> ApplicationResult<&mut Loaded> {
        self.state.as_mut().ok_or(ApplicationError::NotLoaded)
    }
}

/// Build a [`SegmentTree`] from the loader's serialized snapshot,
/// preserving server-assigned ids and sibling order.
fn materialize(snapshot: &TreeSnapshot) -> Result<SegmentTree, crate::domain::DomainError> {
    let mut tree = SegmentTree::new(
        PersistedId::new(&snapshot.root_id),
        snapshot.label.clone(),
    );
    let root = tree.root();
    for child in &snapshot.children {
        insert_snapshot_node(&mut tree, root, child)?;
    }
    Ok(tree)
}

fn insert_snapshot_node(
    tree: &mut SegmentTree,
    parent: NodeHandle,
    node: &SnapshotNode,
) -> Result<(), crate::domain::DomainError> {
    match node {
        SnapshotNode::Group {
            id,
            label,
            children,
        } => {
            let handle = tree.insert_child(
                parent,
                NodeId::Assigned(PersistedId::new(id)),
                label.clone(),
                ChildKind::Group,
            )?;
            for child in children {
                insert_snapshot_node(tree, handle, child)?;
            }
        }
        SnapshotNode::Segment {
            id,
            label,
            audience,
        } => {
            tree.insert_child(
                parent,
                NodeId::Assigned(PersistedId::new(id)),
                label.clone(),
                ChildKind::Segment {
                    audience: AudienceRef::new(audience),
                },
            )?;
        }
    }
    Ok(())
}
