//! Shared error types for the services crate.

use thiserror::Error;

use deck_core::model::CardValidationError;
use storage::StorageError;

/// Errors surfaced by the deck and session services.
///
/// Persistence failures inside the deck service itself are logged and
/// swallowed (best-effort policy); `Storage` only appears on paths where a
/// caller explicitly asked for storage work.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] CardValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("session loop has shut down")]
    SessionClosed,
}
