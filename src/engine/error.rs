use thiserror::Error;
use uuid::Uuid;

use crate::domain::{ContentKind, ProgressStatus};
use crate::storage::StoreError;

/// Errors emitted by [`super::ProgressEngine`]. All of them are per-request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("{kind} {content_id} not found")]
    NotFound { kind: ContentKind, content_id: Uuid },

    #[error("rating {0} is outside [0, 5]")]
    InvalidRating(f64),

    #[error("{kind} progress cannot move from {from} to {to}")]
    InvalidTransition {
        kind: ContentKind,
        from: ProgressStatus,
        to: ProgressStatus,
    },

    /// Creation kept losing the race on the (user, content item) unique key.
    #[error("concurrent creation of {kind} progress for content {content_id} did not settle")]
    DuplicateKey { kind: ContentKind, content_id: Uuid },

    /// The row kept changing between the read and a conditional status write.
    #[error("{kind} progress for content {content_id} changed concurrently")]
    ConcurrentUpdate { kind: ContentKind, content_id: Uuid },

    #[error("{field}: {message}")]
    ValidationFailed {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProgressError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ProgressError::ValidationFailed {
            field,
            message: message.into(),
        }
    }
}
