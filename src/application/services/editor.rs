//! List editor session facade
//!
//! Formalizes the controller flow around the core: verify permissions
//! once, load the tree, forward mutations, and route save outcomes to
//! the message surface under the configured label namespace.

use std::sync::Arc;

use tracing::instrument;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::save::SaveCoordinator;
use crate::application::services::store::TreeStore;
use crate::config::Settings;
use crate::domain::node::{AudienceRef, PersistedId};
use crate::domain::tree::{NodeHandle, SegmentTree};
use crate::infrastructure::traits::{
    AccessDecision, MessageSurface, PermissionGate, PersistenceSubmitter, TreeLoader,
};

/// One editing session over a campaign's segment tree.
pub struct ListEditor {
    settings: Arc<Settings>,
    store: TreeStore,
    coordinator: SaveCoordinator,
    surface: Arc<dyn MessageSurface>,
}

impl std::fmt::Debug for ListEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListEditor")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ListEditor {
    /// Gate, load, and construct the editor.
    ///
    /// On a denied gate the core is never initialized. A load failure is
    /// routed to the message surface and returned; the caller may retry
    /// initialization.
    #[instrument(level = "debug", skip_all, fields(root_id = %root_id))]
    pub fn initialize(
        gate: &dyn PermissionGate,
        loader: Arc<dyn TreeLoader>,
        submitter: Arc<dyn PersistenceSubmitter>,
        surface: Arc<dyn MessageSurface>,
        settings: Arc<Settings>,
        root_id: &PersistedId,
    ) -> ApplicationResult<Self> {
        if let AccessDecision::Denied { reason } = gate.check_access() {
            return Err(ApplicationError::AccessDenied { reason });
        }

        let mut store = TreeStore::new(loader);
        if let Err(err) = store.load(root_id) {
            surface.on_load_error(settings.namespace, &err.to_string());
            return Err(err);
        }

        Ok(Self {
            settings,
            store,
            coordinator: SaveCoordinator::new(submitter),
            surface,
        })
    }

    /// Read-only view of the live tree for rendering.
    pub fn tree(&self) -> ApplicationResult<&SegmentTree> {
        self.store.current_tree()
    }

    pub fn root(&self) -> ApplicationResult<NodeHandle> {
        self.store.root()
    }

    pub fn add_group(
        &mut self,
        parent: NodeHandle,
        label: impl Into<String>,
    ) -> ApplicationResult<NodeHandle> {
        self.store.add_group(parent, label)
    }

    pub fn add_segment(
        &mut self,
        parent: NodeHandle,
        label: impl Into<String>,
        audience: AudienceRef,
    ) -> ApplicationResult<NodeHandle> {
        self.store.add_segment(parent, label, audience)
    }

    pub fn delete_node(&mut self, node: NodeHandle) -> ApplicationResult<()> {
        self.store.delete_node(node)
    }

    /// Save pending edits and route the outcome to the message surface.
    ///
    /// `SaveInProgress` is returned without surfacing: the caller should
    /// simply decline the re-entrant attempt (e.g. keep the save action
    /// disabled), not show an error.
    pub fn save(&mut self) -> ApplicationResult<()> {
        match self.coordinator.save(&mut self.store) {
            Ok(()) => {
                self.surface.on_save_success(self.settings.namespace);
                Ok(())
            }
            Err(err @ ApplicationError::SaveInProgress) => Err(err),
            Err(err) => {
                self.surface.on_save_error(self.settings.namespace, &err.to_string());
                Err(err)
            }
        }
    }
}
