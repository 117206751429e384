//! Collaborator boundary traits
//!
//! The editor core consumes these contracts; real transports implement
//! them outside the crate. An in-memory campaign store is provided as a
//! reference implementation and test backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::LabelNamespace;
use crate::domain::{ChangeSet, PersistedId, TempRef};
use crate::infrastructure::error::TransportError;

/// Outcome of the permission check performed once before initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied { reason: String },
}

/// Yes/no gate checked once before the editor core is constructed.
pub trait PermissionGate: Send + Sync {
    fn check_access(&self) -> AccessDecision;
}

/// Serialized node inside a [`TreeSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotNode {
    Group {
        id: String,
        label: String,
        children: Vec<SnapshotNode>,
    },
    Segment {
        id: String,
        label: String,
        audience: String,
    },
}

/// Serialized campaign tree returned by the loader, with server-assigned
/// ids and sibling ordering preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub root_id: String,
    pub label: String,
    pub children: Vec<SnapshotNode>,
}

/// Fetches the persisted segment tree for a campaign root.
pub trait TreeLoader: Send + Sync {
    fn fetch(&self, root_id: &PersistedId) -> Result<TreeSnapshot, TransportError>;
}

/// Identifier assignments returned by a successful submission, keyed by
/// the temp refs carried in the change-set's creates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub created_ids: BTreeMap<TempRef, PersistedId>,
}

/// Applies a change-set server-side as one atomic unit, or fails
/// entirely. The core treats any error as full failure; no partial
/// application is reconcilable.
pub trait PersistenceSubmitter: Send + Sync {
    fn submit(&self, change_set: &ChangeSet) -> Result<SubmitReceipt, TransportError>;
}

/// Sink for user-visible outcomes. The core never formats or localizes
/// text; the namespace tells the embedding which label set to resolve.
pub trait MessageSurface: Send + Sync {
    fn on_load_error(&self, namespace: LabelNamespace, detail: &str);
    fn on_save_error(&self, namespace: LabelNamespace, detail: &str);
    fn on_save_success(&self, namespace: LabelNamespace);
}

/// Gate that always allows. For single-operator embeddings and tests.
pub struct AllowAll;

impl PermissionGate for AllowAll {
    fn check_access(&self) -> AccessDecision {
        AccessDecision::Allowed
    }
}

/// Message surface that routes outcomes to the tracing log.
///
/// Default for embeddings without a user-facing page-message widget.
pub struct LoggingSurface;

impl MessageSurface for LoggingSurface {
    fn on_load_error(&self, namespace: LabelNamespace, detail: &str) {
        error!(?namespace, detail, "segment tree load failed");
    }

    fn on_save_error(&self, namespace: LabelNamespace, detail: &str) {
        warn!(?namespace, detail, "segment tree save failed");
    }

    fn on_save_success(&self, namespace: LabelNamespace) {
        info!(?namespace, "segment tree saved");
    }
}

/// In-memory loader/submitter pair backing tests and demo embeddings.
///
/// Serves one configured snapshot and acknowledges submissions by
/// assigning sequential `srv-<n>` ids to every create. Submitted
/// change-sets are recorded for inspection.
pub struct InMemoryCampaignStore {
    snapshot: TreeSnapshot,
    next_id: AtomicU64,
    submissions: Mutex<Vec<ChangeSet>>,
}

impl InMemoryCampaignStore {
    pub fn new(snapshot: TreeSnapshot) -> Self {
        Self {
            snapshot,
            next_id: AtomicU64::new(1),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Change-sets received so far, in submission order.
    pub fn submissions(&self) -> Vec<ChangeSet> {
        self.submissions
            .lock()
            .expect("submissions mutex poisoned")
            .clone()
    }
}

impl TreeLoader for InMemoryCampaignStore {
    fn fetch(&self, root_id: &PersistedId) -> Result<TreeSnapshot, TransportError> {
        if root_id.as_str() != self.snapshot.root_id {
            return Err(TransportError::Rejected(format!(
                "unknown root id: {root_id}"
            )));
        }
        Ok(self.snapshot.clone())
    }
}

impl PersistenceSubmitter for InMemoryCampaignStore {
    fn submit(&self, change_set: &ChangeSet) -> Result<SubmitReceipt, TransportError> {
        let mut created_ids = BTreeMap::new();
        for create in &change_set.creates {
            let serial = self.next_id.fetch_add(1, Ordering::SeqCst);
            created_ids.insert(create.temp_ref, PersistedId::new(format!("srv-{serial}")));
        }
        self.submissions
            .lock()
            .expect("submissions mutex poisoned")
            .push(change_set.clone());
        Ok(SubmitReceipt { created_ids })
    }
}
