//! Node model: identity and structural role of segment tree nodes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-assigned identifier of a persisted node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedId(String);

impl PersistedId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersistedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-local reference for a node that has not been saved yet.
///
/// Minted once at construction. It gives unsaved nodes object identity
/// (two unsaved nodes with identical labels are never "the same") and
/// keys the server's id assignments in the save receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TempRef(Uuid);

impl TempRef {
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TempRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node identity.
///
/// "Unsaved" is an explicit variant rather than a sentinel value, so the
/// diff engine's create/delete classification is exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeId {
    /// Created client-side, not yet persisted.
    Unassigned(TempRef),
    /// Persisted under a server-assigned identifier.
    Assigned(PersistedId),
}

impl NodeId {
    /// Fresh unassigned identity with a newly minted temp ref.
    pub fn unassigned() -> Self {
        Self::Unassigned(TempRef::mint())
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, Self::Unassigned(_))
    }

    pub fn assigned(&self) -> Option<&PersistedId> {
        match self {
            Self::Assigned(id) => Some(id),
            Self::Unassigned(_) => None,
        }
    }
}

/// Reference to an audience definition carried by a segment leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudienceRef(String);

impl AudienceRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudienceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role of a node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Unique top-level container of a campaign tree.
    Root,
    /// Ordered container of groups and/or segments.
    Group,
    /// Leaf referencing an audience definition.
    Segment { audience: AudienceRef },
}

impl NodeKind {
    /// Whether nodes of this kind may hold children.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Root | Self::Group)
    }
}

/// Kind of node an add operation can create.
///
/// The root exists only at load time, so it is deliberately absent here.
/// Doubles as the payload of a create instruction in the change-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChildKind {
    Group,
    Segment { audience: AudienceRef },
}

impl From<ChildKind> for NodeKind {
    fn from(kind: ChildKind) -> Self {
        match kind {
            ChildKind::Group => NodeKind::Group,
            ChildKind::Segment { audience } => NodeKind::Segment { audience },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_unassigned_ids_when_compared_then_never_equal() {
        let a = NodeId::unassigned();
        let b = NodeId::unassigned();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn given_assigned_ids_when_compared_then_equal_by_value() {
        let a = NodeId::Assigned(PersistedId::new("G1"));
        let b = NodeId::Assigned(PersistedId::new("G1"));
        assert_eq!(a, b);
    }

    #[test]
    fn given_segment_kind_when_checked_then_not_a_container() {
        let kind = NodeKind::Segment {
            audience: AudienceRef::new("aud-1"),
        };
        assert!(!kind.is_container());
        assert!(NodeKind::Root.is_container());
        assert!(NodeKind::Group.is_container());
    }
}
