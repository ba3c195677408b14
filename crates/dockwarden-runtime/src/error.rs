//! Closed error set of the container runtime gateway.
//!
//! Engine failures never escape the gateway as anything other than one of
//! these variants, so callers can match exhaustively.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by, or while talking to, the container engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not be reached at all.
    #[error("container engine unavailable: {message}")]
    Unavailable {
        /// What went wrong reaching the engine.
        message: String,
    },

    /// The engine does not know the container id or name.
    #[error("container not found: {id}")]
    NotFound {
        /// The id or name that was looked up.
        id: String,
    },

    /// The engine rejected a lifecycle or query command.
    #[error("failed to {action} container {container}: {message}")]
    CommandFailed {
        /// Action attempted (`start`, `stop`, `logs`, ...).
        action: &'static str,
        /// Container id or name the action targeted.
        container: String,
        /// Engine-reported message.
        message: String,
    },

    /// An image build ran and failed.
    #[error("failed to build image {tag} from {}: {message}", path.display())]
    BuildFailed {
        /// Tag the image was being built as.
        tag: String,
        /// Build context directory.
        path: PathBuf,
        /// Trailing build output.
        message: String,
    },

    /// The engine answered with output that could not be understood.
    #[error("unexpected engine output: {message}")]
    MalformedOutput {
        /// Parse failure detail.
        message: String,
    },
}

/// Convenience alias for gateway results.
pub type Result<T> = std::result::Result<T, EngineError>;
