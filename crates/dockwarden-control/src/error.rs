//! Errors surfaced by control-plane operations.

use dockwarden_common::types::Action;
use dockwarden_runtime::EngineError;
use dockwarden_store::StoreError;
use thiserror::Error;

/// Outcome of a rejected or failed control-plane operation.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Login with an unknown username or a wrong credential.
    #[error("invalid username or credential")]
    Authentication,

    /// The session token is unknown, expired, or names a vanished user.
    #[error("not authenticated")]
    Unauthenticated,

    /// The caller's role lacks the flag for `action`.
    #[error("permission denied: {action} not allowed")]
    Authorization {
        /// The denied action.
        action: Action,
    },

    /// A user-management operation by a non-admin.
    #[error("permission denied: admin privileges required")]
    AdminRequired,

    /// A user with this username already exists.
    #[error("username already exists: {username}")]
    DuplicateUsername {
        /// The rejected username.
        username: String,
    },

    /// Request input failed validation.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// The identity or build-memory store failed.
    #[error(transparent)]
    Store(StoreError),

    /// The container engine reported a failure.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername { username } => Self::DuplicateUsername { username },
            other => Self::Store(other),
        }
    }
}

/// Convenience alias for control-plane results.
pub type Result<T> = std::result::Result<T, ControlError>;
