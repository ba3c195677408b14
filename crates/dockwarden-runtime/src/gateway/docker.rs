//! Gateway driving the `docker` CLI.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use dockwarden_common::types::{ContainerId, ContainerSummary};

use super::{ContainerGateway, ContainerHandle};
use crate::error::{EngineError, Result};
use crate::inspect::parse_inspect;
use crate::logs::{interleave_timestamped, merge_streams, tail_lines};

/// Lines of build output kept in a [`EngineError::BuildFailed`] message.
const BUILD_ERROR_TAIL: usize = 20;

/// Gateway that shells out to the `docker` binary for every call.
///
/// Every call blocks until the CLI exits; image builds may take minutes.
#[derive(Debug, Clone)]
pub struct DockerCliGateway {
    binary: PathBuf,
}

impl DockerCliGateway {
    /// Creates a gateway using an explicit `docker` binary.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Locates `docker` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] if no binary is found.
    pub fn discover() -> Result<Self> {
        which::which(dockwarden_common::constants::DOCKER_BINARY)
            .map(Self::new)
            .map_err(|e| EngineError::Unavailable {
                message: format!("docker binary not found on PATH: {e}"),
            })
    }

    /// Uses `binary` when given, otherwise discovers `docker` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] if discovery fails.
    pub fn from_config(binary: Option<&Path>) -> Result<Self> {
        binary.map_or_else(Self::discover, |path| Ok(Self::new(path)))
    }

    /// Returns the binary this gateway invokes.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Returns the engine server version.
    ///
    /// # Errors
    ///
    /// Returns an error if the daemon does not answer.
    pub fn server_version(&self) -> Result<String> {
        let output = self.run(["version", "--format", "{{.Server.Version}}"])?;
        if !output.status.success() {
            return Err(EngineError::Unavailable {
                message: stderr_text(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.binary);
        let _ = command.args(args);
        tracing::debug!(command = ?command, "invoking engine CLI");
        command.output().map_err(|e| EngineError::Unavailable {
            message: format!("failed to run {}: {e}", self.binary.display()),
        })
    }

    fn inspect(&self, ids: &[String]) -> Result<Output> {
        let mut args = vec!["inspect", "--type", "container", "--"];
        args.extend(ids.iter().map(String::as_str));
        self.run(args)
    }

    fn lifecycle(&self, action: &'static str, handle: &ContainerHandle) -> Result<()> {
        let output = self.run([action, "--", handle.id.as_str()])?;
        if output.status.success() {
            tracing::info!(container = %handle.name, action, "engine accepted lifecycle call");
            Ok(())
        } else {
            Err(classify_failure(action, handle.name.as_str(), &stderr_text(&output)))
        }
    }
}

impl ContainerGateway for DockerCliGateway {
    fn list(&self, include_stopped: bool) -> Result<Vec<ContainerSummary>> {
        let mut args = vec!["ps", "--quiet", "--no-trunc"];
        if include_stopped {
            args.push("--all");
        }
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(classify_failure("list", "*", &stderr_text(&output)));
        }
        let ids: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let output = self.inspect(&ids)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let docs = match parse_inspect(&stdout) {
            Ok(docs) => docs,
            Err(parse_err) if output.status.success() => return Err(parse_err),
            Err(_) => return Err(classify_failure("inspect", "*", &stderr_text(&output))),
        };
        if docs.len() < ids.len() {
            // Containers removed between `ps` and `inspect` drop out of the snapshot.
            tracing::debug!(
                listed = ids.len(),
                inspected = docs.len(),
                "containers vanished while listing"
            );
        }
        Ok(docs.into_iter().map(|d| d.into_summary()).collect())
    }

    fn get(&self, id: &ContainerId) -> Result<ContainerHandle> {
        let output = self.inspect(&[id.as_str().to_string()])?;
        if !output.status.success() {
            return Err(classify_failure("inspect", id.as_str(), &stderr_text(&output)));
        }
        let doc = parse_inspect(&String::from_utf8_lossy(&output.stdout))?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::NotFound {
                id: id.to_string(),
            })?;
        Ok(ContainerHandle {
            name: doc.display_name().to_string(),
            id: ContainerId::new(doc.id),
        })
    }

    fn start(&self, handle: &ContainerHandle) -> Result<()> {
        self.lifecycle("start", handle)
    }

    fn stop(&self, handle: &ContainerHandle) -> Result<()> {
        self.lifecycle("stop", handle)
    }

    fn logs(&self, handle: &ContainerHandle, tail: usize) -> Result<String> {
        let output = self.run([
            "logs",
            "--timestamps",
            "--tail",
            &tail.to_string(),
            "--",
            handle.id.as_str(),
        ])?;
        if !output.status.success() {
            return Err(classify_failure("logs", handle.name.as_str(), &stderr_text(&output)));
        }
        Ok(interleave_timestamped(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
            tail,
        ))
    }

    fn build_image(&self, source_path: &Path, tag: &str) -> Result<()> {
        tracing::info!(tag, path = %source_path.display(), "building image");
        let output = self.run([
            OsStr::new("build"),
            OsStr::new("--tag"),
            OsStr::new(tag),
            OsStr::new("--"),
            source_path.as_os_str(),
        ])?;
        if output.status.success() {
            tracing::info!(tag, "image built");
            return Ok(());
        }
        let combined = merge_streams(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
            BUILD_ERROR_TAIL,
        );
        Err(EngineError::BuildFailed {
            tag: tag.to_string(),
            path: source_path.to_path_buf(),
            message: combined.trim().to_string(),
        })
    }

    fn is_available(&self) -> bool {
        self.server_version().is_ok()
    }
}

fn stderr_text(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr);
    tail_lines(text.trim(), BUILD_ERROR_TAIL).to_string()
}

/// Maps a failed CLI invocation onto the closed error set.
#[must_use]
pub fn classify_failure(action: &'static str, container: &str, stderr: &str) -> EngineError {
    let message = stderr.trim();
    if message.contains("No such container") || message.contains("No such object") {
        return EngineError::NotFound {
            id: container.to_string(),
        };
    }
    if message.contains("Cannot connect to the Docker daemon")
        || message.contains("permission denied while trying to connect")
    {
        return EngineError::Unavailable {
            message: message.to_string(),
        };
    }
    EngineError::CommandFailed {
        action,
        container: container.to_string(),
        message: if message.is_empty() {
            "engine exited with an error and no message".to_string()
        } else {
            message.to_string()
        },
    }
}
