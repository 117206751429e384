//! Service container for dependency injection
//!
//! Wires settings and collaborators into editor sessions.

use std::sync::Arc;

use crate::application::error::ApplicationResult;
use crate::application::services::editor::ListEditor;
use crate::config::Settings;
use crate::domain::node::PersistedId;
use crate::infrastructure::traits::{
    MessageSurface, PermissionGate, PersistenceSubmitter, TreeLoader,
};

/// Container holding the collaborators an editor session needs.
pub struct ServiceContainer {
    pub settings: Arc<Settings>,
    pub gate: Arc<dyn PermissionGate>,
    pub loader: Arc<dyn TreeLoader>,
    pub submitter: Arc<dyn PersistenceSubmitter>,
    pub surface: Arc<dyn MessageSurface>,
}

impl ServiceContainer {
    pub fn new(
        settings: Settings,
        gate: Arc<dyn PermissionGate>,
        loader: Arc<dyn TreeLoader>,
        submitter: Arc<dyn PersistenceSubmitter>,
        surface: Arc<dyn MessageSurface>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            gate,
            loader,
            submitter,
            surface,
        }
    }

    /// Open a gated editor session over the given campaign root.
    pub fn open_editor(&self, root_id: &PersistedId) -> ApplicationResult<ListEditor> {
        ListEditor::initialize(
            self.gate.as_ref(),
            Arc::clone(&self.loader),
            Arc::clone(&self.submitter),
            Arc::clone(&self.surface),
            Arc::clone(&self.settings),
            root_id,
        )
    }
}
