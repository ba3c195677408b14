//! Container engine abstraction used by the control plane.

pub mod docker;
pub mod memory;

use std::fmt;
use std::path::Path;

use dockwarden_common::types::{ContainerId, ContainerSummary};

use crate::error::Result;

/// A container resolved by the engine, ready for lifecycle calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    /// Engine-reported full id.
    pub id: ContainerId,
    /// Container name without the leading `/`.
    pub name: String,
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Blocking gateway to a single container engine host.
///
/// Implementors surface whatever the engine does: starting a running
/// container or stopping a stopped one is not normalised here.
pub trait ContainerGateway: Send + Sync {
    /// Returns a snapshot of the engine's containers.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be queried.
    fn list(&self, include_stopped: bool) -> Result<Vec<ContainerSummary>>;

    /// Resolves a container id or name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`](crate::EngineError::NotFound) if the
    /// engine does not know the container.
    fn get(&self, id: &ContainerId) -> Result<ContainerHandle>;

    /// Starts a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the start.
    fn start(&self, handle: &ContainerHandle) -> Result<()>;

    /// Stops a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the stop.
    fn stop(&self, handle: &ContainerHandle) -> Result<()>;

    /// Returns at most `tail_lines` trailing log lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot produce the logs.
    fn logs(&self, handle: &ContainerHandle, tail_lines: usize) -> Result<String>;

    /// Builds an image from `source_path` and tags it `tag`. Blocks until the
    /// build finishes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BuildFailed`](crate::EngineError::BuildFailed)
    /// if the build runs and fails.
    fn build_image(&self, source_path: &Path, tag: &str) -> Result<()>;

    /// Returns whether the engine answers at all.
    fn is_available(&self) -> bool;
}
