//! Build memory contract.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Remembers, per container name, the last path an image build was
/// attempted from.
///
/// The memory records attempts, not successes: callers write the path
/// before running the build so a failed build stays retryable.
pub trait BuildMemoryStore: Send + Sync {
    /// Returns the last recorded build path for `container_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, container_name: &str) -> Result<Option<PathBuf>>;

    /// Records `path` for `container_name`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be committed.
    fn put(&self, container_name: &str, path: &Path) -> Result<()>;
}
