//! Infrastructure-level errors: failures reported by collaborators

use thiserror::Error;

/// Failure reported by an external collaborator (loader or submitter).
///
/// The core never inspects these beyond surfacing their message; retry
/// policy belongs to the embedding.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("transport failed: {context}")]
    Failed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TransportError {
    /// Wrap an arbitrary transport failure with context.
    pub fn failed(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Failed {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
