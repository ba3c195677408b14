//! Error types for the identity and build-memory stores.

use std::path::PathBuf;

use dockwarden_common::types::UserId;
use thiserror::Error;

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A user with this username already exists.
    #[error("username already exists: {username}")]
    DuplicateUsername {
        /// The rejected username.
        username: String,
    },

    /// A role was requested for a user the store does not know.
    #[error("unknown user id: {id}")]
    UnknownUser {
        /// The unknown user id.
        id: UserId,
    },

    /// Hashing a credential failed.
    #[error("credential hashing failed: {message}")]
    Credential {
        /// Description from the hashing backend.
        message: String,
    },

    /// Reading or writing the store file failed.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// Path of the store file or its directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The store document could not be encoded or decoded.
    #[error("store document error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
