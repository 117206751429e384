//! Arena-based segment tree.
//!
//! Uses a generational arena for memory-safe node references and O(1)
//! lookups. Parent back-references are arena indices, never ownership
//! edges, so the structure cannot form reference cycles. Every mutation
//! keeps the parent/children relation consistent in one step.

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::node::{ChildKind, NodeId, NodeKind, PersistedId, TempRef};

/// Handle to a node in a [`SegmentTree`].
///
/// Handles of detached nodes go stale; subsequent operations reject
/// them with [`DomainError::InvalidTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(Index);

/// One node of the segment tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    /// Back-reference to the containing parent, `None` for the root.
    /// Maintained exclusively by tree mutations, never settable.
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
}

impl TreeNode {
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}

/// Single-rooted, acyclic tree of campaign segments and groups.
///
/// The tree exclusively owns its node graph. `Clone` produces a
/// structurally independent deep copy (fresh arena), which is how the
/// store freezes its baseline snapshot.
#[derive(Debug, Clone)]
pub struct SegmentTree {
    arena: Arena<TreeNode>,
    root: NodeHandle,
}

impl SegmentTree {
    /// Create a tree holding only its root, under a persisted id.
    pub fn new(root_id: PersistedId, label: impl Into<String>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode {
            id: NodeId::Assigned(root_id),
            label: label.into(),
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
        });
        Self {
            arena,
            root: NodeHandle(root),
        }
    }

    pub fn root(&self) -> NodeHandle {
        self.root
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&TreeNode> {
        self.arena.get(handle.0)
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.arena.contains(handle.0)
    }

    /// Number of nodes currently in the tree (root included).
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Append a new child under `parent`, preserving insertion order.
    ///
    /// `parent` must be a live container node (root or group). Assigned
    /// ids must be unique within the tree.
    #[instrument(level = "trace", skip(self, label))]
    pub fn insert_child(
        &mut self,
        parent: NodeHandle,
        id: NodeId,
        label: impl Into<String>,
        kind: ChildKind,
    ) -> Result<NodeHandle, DomainError> {
        let parent_node = self.arena.get(parent.0).ok_or(DomainError::InvalidParent)?;
        if !parent_node.kind.is_container() {
            return Err(DomainError::InvalidParent);
        }
        if let NodeId::Assigned(persisted) = &id {
            if self.find_assigned(persisted).is_some() {
                return Err(DomainError::DuplicateId(persisted.clone()));
            }
        }

        let child = NodeHandle(self.arena.insert(TreeNode {
            id,
            label: label.into(),
            kind: kind.into(),
            parent: Some(parent),
            children: Vec::new(),
        }));
        if let Some(parent_node) = self.arena.get_mut(parent.0) {
            parent_node.children.push(child);
        }
        Ok(child)
    }

    /// Detach the subtree rooted at `node` from the tree in one step.
    ///
    /// Removes `node` from its parent's children sequence and drops
    /// every node beneath it, invalidating their handles.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, node: NodeHandle) -> Result<(), DomainError> {
        if node == self.root {
            return Err(DomainError::CannotDeleteRoot);
        }
        let parent = match self.arena.get(node.0) {
            Some(n) => n.parent,
            None => return Err(DomainError::InvalidTarget),
        };
        if let Some(parent) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent.0) {
                parent_node.children.retain(|&child| child != node);
            }
        }
        for handle in self.collect_subtree(node) {
            self.arena.remove(handle.0);
        }
        Ok(())
    }

    fn collect_subtree(&self, node: NodeHandle) -> Vec<NodeHandle> {
        let mut collected = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(n) = self.arena.get(current.0) {
                stack.extend(n.children.iter().copied());
                collected.push(current);
            }
        }
        collected
    }

    /// Depth-first preorder traversal yielding `(handle, depth, node)`.
    ///
    /// The root has depth 0; siblings appear in insertion order and
    /// parents always precede their children.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(self)
    }

    /// Look up a node by its server-assigned id.
    pub fn find_assigned(&self, id: &PersistedId) -> Option<NodeHandle> {
        self.preorder()
            .find(|(_, _, node)| node.id.assigned() == Some(id))
            .map(|(handle, _, _)| handle)
    }

    /// Look up an unsaved node by its temp ref.
    pub fn find_temp(&self, temp: TempRef) -> Option<NodeHandle> {
        self.preorder()
            .find(|(_, _, node)| node.id == NodeId::Unassigned(temp))
            .map(|(handle, _, _)| handle)
    }

    /// Rewrite an unsaved node's identity to a server-assigned id.
    ///
    /// Used by save reconciliation once the persistence collaborator has
    /// acknowledged the create.
    pub(crate) fn assign_id(
        &mut self,
        node: NodeHandle,
        id: PersistedId,
    ) -> Result<(), DomainError> {
        if self.find_assigned(&id).is_some() {
            return Err(DomainError::DuplicateId(id));
        }
        match self.arena.get_mut(node.0) {
            Some(n) => {
                n.id = NodeId::Assigned(id);
                Ok(())
            }
            None => Err(DomainError::InvalidTarget),
        }
    }
}

pub struct Preorder<'a> {
    tree: &'a SegmentTree,
    stack: Vec<(NodeHandle, usize)>,
}

impl<'a> Preorder<'a> {
    fn new(tree: &'a SegmentTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root, 0)],
        }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (NodeHandle, usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, depth)) = self.stack.pop() {
            if let Some(node) = self.tree.node(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current, depth, node));
            }
        }
        None
    }
}
