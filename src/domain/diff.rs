//! Diff engine: computes the minimal ordered change-set between the
//! baseline snapshot and the live tree.
//!
//! Creates are every unassigned live node, ordered by depth ascending so
//! parents precede children and a consumer can resolve deeper parent
//! references against ids assigned earlier in the same batch. Deletes
//! are cascade-elided: only the highest deleted ancestor of a removed
//! subtree is emitted, since removing it implies everything beneath.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::node::{ChildKind, NodeId, NodeKind, PersistedId, TempRef};
use crate::domain::tree::{NodeHandle, SegmentTree};

/// Reference to the parent of a created node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentRef {
    /// Parent already persisted under a server id.
    Assigned(PersistedId),
    /// Parent is itself created in this batch; resolves against the id
    /// assigned to the earlier create carrying this temp ref.
    Temp(TempRef),
}

/// Instruction to create one node server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOp {
    pub temp_ref: TempRef,
    #[serde(flatten)]
    pub kind: ChildKind,
    pub label: String,
    pub parent: ParentRef,
}

/// Instruction to delete one persisted node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOp {
    pub id: PersistedId,
}

/// Minimal ordered change-set submitted as one atomic unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub creates: Vec<CreateOp>,
    pub deletes: Vec<DeleteOp>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.deletes.is_empty()
    }
}

/// Compare `baseline` against `live` and produce the change-set.
///
/// Deterministic: identical input pairs yield identical output, ordered
/// by depth then insertion order (creates) and baseline preorder
/// (deletes).
pub fn diff(baseline: &SegmentTree, live: &SegmentTree) -> ChangeSet {
    let creates = collect_creates(live);
    let deletes = collect_deletes(baseline, live);
    debug!(
        creates = creates.len(),
        deletes = deletes.len(),
        "computed change-set"
    );
    ChangeSet { creates, deletes }
}

fn collect_creates(live: &SegmentTree) -> Vec<CreateOp> {
    let mut pending: Vec<(usize, CreateOp)> = Vec::new();
    for (_, depth, node) in live.preorder() {
        let temp_ref = match node.id {
            NodeId::Unassigned(temp) => temp,
            NodeId::Assigned(_) => continue,
        };
        // Unassigned nodes are never the root, so a parent always exists.
        let parent = match node.parent().and_then(|handle| live.node(handle)) {
            Some(parent_node) => match &parent_node.id {
                NodeId::Assigned(id) => ParentRef::Assigned(id.clone()),
                NodeId::Unassigned(temp) => ParentRef::Temp(*temp),
            },
            None => continue,
        };
        let kind = match &node.kind {
            NodeKind::Group => ChildKind::Group,
            NodeKind::Segment { audience } => ChildKind::Segment {
                audience: audience.clone(),
            },
            NodeKind::Root => continue,
        };
        pending.push((
            depth,
            CreateOp {
                temp_ref,
                kind,
                label: node.label.clone(),
                parent,
            },
        ));
    }
    // Preorder already puts parents first; the stable sort groups by
    // depth while keeping sibling insertion order.
    pending.sort_by_key(|(depth, _)| *depth);
    pending.into_iter().map(|(_, op)| op).collect()
}

fn collect_deletes(baseline: &SegmentTree, live: &SegmentTree) -> Vec<DeleteOp> {
    let live_ids: std::collections::HashSet<&PersistedId> = live
        .preorder()
        .filter_map(|(_, _, node)| node.id.assigned())
        .collect();

    let mut deletes = Vec::new();
    let mut stack: Vec<NodeHandle> = vec![baseline.root()];
    while let Some(current) = stack.pop() {
        let node = match baseline.node(current) {
            Some(node) => node,
            None => continue,
        };
        if let Some(id) = node.id.assigned() {
            if !live_ids.contains(id) {
                // Cascade elision: emitting the highest deleted ancestor
                // implies its whole subtree, so do not descend.
                deletes.push(DeleteOp { id: id.clone() });
                continue;
            }
        }
        // Reverse push keeps baseline preorder in the output.
        for &child in node.children().iter().rev() {
            stack.push(child);
        }
    }
    deletes
}
