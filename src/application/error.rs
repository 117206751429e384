//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::error::TransportError;

/// Errors surfaced by the editor services.
///
/// Contract violations (`Domain`, `NotLoaded`, `NoPendingSave`) are
/// fatal to the calling code path; `LoadFailed`, `SaveFailed` and
/// `SaveInProgress` are recoverable and leave the live tree intact.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("tree store used before a successful load")]
    NotLoaded,

    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("failed to load segment tree: {source}")]
    LoadFailed {
        #[source]
        source: TransportError,
    },

    #[error("failed to save segment changes: {source}")]
    SaveFailed {
        #[source]
        source: TransportError,
    },

    #[error("a save is already in progress")]
    SaveInProgress,

    #[error("no save is pending completion")]
    NoPendingSave,

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
