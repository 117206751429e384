//! Save coordinator service
//!
//! Serializes save attempts through an `Idle`/`Saving` state machine.
//! Mutations stay synchronous, but a save's external submission may
//! settle after further UI events, so the guard rejects re-entrant
//! attempts instead of queueing them.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::store::TreeStore;
use crate::domain::diff::ChangeSet;
use crate::infrastructure::error::TransportError;
use crate::infrastructure::traits::{PersistenceSubmitter, SubmitReceipt};

/// Save lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
}

/// Coordinates change-set submission and baseline reconciliation.
pub struct SaveCoordinator {
    submitter: Arc<dyn PersistenceSubmitter>,
    state: SaveState,
}

impl SaveCoordinator {
    pub fn new(submitter: Arc<dyn PersistenceSubmitter>) -> Self {
        Self {
            submitter,
            state: SaveState::Idle,
        }
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    /// Transition `Idle → Saving` and compute the change-set to submit.
    ///
    /// Returns [`ApplicationError::SaveInProgress`] while a prior save
    /// is outstanding; no second submission is issued and nothing is
    /// queued. A failed change-set computation leaves the state `Idle`.
    #[instrument(level = "debug", skip_all)]
    pub fn begin(&mut self, store: &TreeStore) -> ApplicationResult<ChangeSet> {
        if self.state == SaveState::Saving {
            return Err(ApplicationError::SaveInProgress);
        }
        let change_set = store.change_set()?;
        self.state = SaveState::Saving;
        debug!(
            creates = change_set.creates.len(),
            deletes = change_set.deletes.len(),
            "save begun"
        );
        Ok(change_set)
    }

    /// Settle the in-flight save with the submitter's outcome.
    ///
    /// On success the server-assigned ids are rewritten into the live
    /// tree and the baseline is rebased; on failure both trees are left
    /// untouched so pending edits survive for a retry. Either way the
    /// coordinator returns to `Idle`.
    #[instrument(level = "debug", skip_all)]
    pub fn complete(
        &mut self,
        store: &mut TreeStore,
        outcome: Result<SubmitReceipt, TransportError>,
    ) -> ApplicationResult<()> {
        if self.state != SaveState::Saving {
            return Err(ApplicationError::NoPendingSave);
        }
        self.state = SaveState::Idle;
        match outcome {
            Ok(receipt) => {
                store.reconcile(&receipt)?;
                debug!("save reconciled");
                Ok(())
            }
            Err(source) => Err(ApplicationError::SaveFailed { source }),
        }
    }

    /// Begin, submit and complete in one call, for embeddings where the
    /// submitter settles synchronously.
    pub fn save(&mut self, store: &mut TreeStore) -> ApplicationResult<()> {
        let change_set = self.begin(store)?;
        let outcome = self.submitter.submit(&change_set);
        self.complete(store, outcome)
    }
}
