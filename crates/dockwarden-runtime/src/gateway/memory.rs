//! In-process container engine.
//!
//! Holds a fixed set of containers whose status flips on start/stop, serves
//! canned logs, and records every call in a journal. Builds succeed unless a
//! failure has been scripted for the tag.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dockwarden_common::types::{ContainerId, ContainerSummary};

use super::{ContainerGateway, ContainerHandle};
use crate::error::{EngineError, Result};
use crate::logs::tail_lines;

/// One call received by an [`InMemoryGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `list`.
    List {
        /// Whether stopped containers were requested.
        include_stopped: bool,
    },
    /// `get` with the requested id or name.
    Get(String),
    /// `start` of a container name.
    Start(String),
    /// `stop` of a container name.
    Stop(String),
    /// `logs` of a container name.
    Logs {
        /// Container name.
        name: String,
        /// Requested tail length.
        tail_lines: usize,
    },
    /// `build_image`.
    Build {
        /// Build context.
        path: PathBuf,
        /// Image tag.
        tag: String,
    },
}

#[derive(Debug, Clone)]
struct MemoryContainer {
    summary: ContainerSummary,
    logs: String,
}

#[derive(Debug, Default)]
struct EngineState {
    containers: Vec<MemoryContainer>,
    build_failures: HashMap<String, String>,
    built: Vec<(PathBuf, String)>,
    journal: Vec<GatewayCall>,
    offline: bool,
}

/// Deterministic engine kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    state: Mutex<EngineState>,
}

impl InMemoryGateway {
    /// Creates an engine with no containers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a container with the given status and log text.
    #[must_use]
    pub fn with_container(self, id: &str, name: &str, status: &str, logs: &str) -> Self {
        self.insert(ContainerSummary {
            id: ContainerId::new(id),
            name: name.to_string(),
            status: status.to_string(),
            ports: Vec::new(),
            host_paths: Vec::new(),
        }, logs);
        self
    }

    /// Adds or replaces a container.
    pub fn insert(&self, summary: ContainerSummary, logs: &str) {
        let mut state = self.lock();
        state.containers.retain(|c| c.summary.id != summary.id);
        state.containers.push(MemoryContainer {
            summary,
            logs: logs.to_string(),
        });
    }

    /// Makes every build of `tag` fail with `message`, or clears the
    /// failure when `message` is `None`.
    pub fn set_build_failure(&self, tag: &str, message: Option<&str>) {
        let mut state = self.lock();
        match message {
            Some(m) => {
                let _ = state.build_failures.insert(tag.to_string(), m.to_string());
            }
            None => {
                let _ = state.build_failures.remove(tag);
            }
        }
    }

    /// Simulates an unreachable engine: every call fails with
    /// [`EngineError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Returns every call received so far, oldest first.
    #[must_use]
    pub fn journal(&self) -> Vec<GatewayCall> {
        self.lock().journal.clone()
    }

    /// Returns the (path, tag) pairs of successful builds.
    #[must_use]
    pub fn built_images(&self) -> Vec<(PathBuf, String)> {
        self.lock().built.clone()
    }

    /// Returns the current status of a container by name.
    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<String> {
        self.lock()
            .containers
            .iter()
            .find(|c| c.summary.name == name)
            .map(|c| c.summary.status.clone())
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `call` and fails if the engine is offline.
    fn enter(&self, call: GatewayCall) -> Result<MutexGuard<'_, EngineState>> {
        let mut state = self.lock();
        state.journal.push(call);
        if state.offline {
            return Err(EngineError::Unavailable {
                message: "in-memory engine is offline".into(),
            });
        }
        Ok(state)
    }

    fn set_status(&self, call: GatewayCall, handle: &ContainerHandle, status: &str) -> Result<()> {
        let mut state = self.enter(call)?;
        let container = state
            .containers
            .iter_mut()
            .find(|c| c.summary.id == handle.id)
            .ok_or_else(|| EngineError::NotFound {
                id: handle.id.to_string(),
            })?;
        container.summary.status = status.to_string();
        Ok(())
    }
}

impl ContainerGateway for InMemoryGateway {
    fn list(&self, include_stopped: bool) -> Result<Vec<ContainerSummary>> {
        let state = self.enter(GatewayCall::List { include_stopped })?;
        Ok(state
            .containers
            .iter()
            .map(|c| &c.summary)
            .filter(|s| include_stopped || s.is_running())
            .cloned()
            .collect())
    }

    fn get(&self, id: &ContainerId) -> Result<ContainerHandle> {
        let state = self.enter(GatewayCall::Get(id.to_string()))?;
        state
            .containers
            .iter()
            .map(|c| &c.summary)
            .find(|s| s.id == *id || s.name == id.as_str())
            .map(|s| ContainerHandle {
                id: s.id.clone(),
                name: s.name.clone(),
            })
            .ok_or_else(|| EngineError::NotFound { id: id.to_string() })
    }

    fn start(&self, handle: &ContainerHandle) -> Result<()> {
        self.set_status(GatewayCall::Start(handle.name.clone()), handle, "running")
    }

    fn stop(&self, handle: &ContainerHandle) -> Result<()> {
        self.set_status(GatewayCall::Stop(handle.name.clone()), handle, "exited")
    }

    fn logs(&self, handle: &ContainerHandle, tail: usize) -> Result<String> {
        let state = self.enter(GatewayCall::Logs {
            name: handle.name.clone(),
            tail_lines: tail,
        })?;
        state
            .containers
            .iter()
            .find(|c| c.summary.id == handle.id)
            .map(|c| tail_lines(&c.logs, tail).to_string())
            .ok_or_else(|| EngineError::NotFound {
                id: handle.id.to_string(),
            })
    }

    fn build_image(&self, source_path: &Path, tag: &str) -> Result<()> {
        let mut state = self.enter(GatewayCall::Build {
            path: source_path.to_path_buf(),
            tag: tag.to_string(),
        })?;
        if let Some(message) = state.build_failures.get(tag) {
            return Err(EngineError::BuildFailed {
                tag: tag.to_string(),
                path: source_path.to_path_buf(),
                message: message.clone(),
            });
        }
        state.built.push((source_path.to_path_buf(), tag.to_string()));
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.lock().offline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> InMemoryGateway {
        InMemoryGateway::new()
            .with_container("c1", "web", "running", "l1\nl2\nl3\n")
            .with_container("c2", "db", "exited", "")
    }

    #[test]
    fn list_filters_stopped_unless_requested() {
        let gw = engine();
        assert_eq!(gw.list(false).expect("list").len(), 1);
        assert_eq!(gw.list(true).expect("list").len(), 2);
    }

    #[test]
    fn get_resolves_id_or_name() {
        let gw = engine();
        assert_eq!(gw.get(&ContainerId::new("c1")).expect("by id").name, "web");
        assert_eq!(gw.get(&ContainerId::new("db")).expect("by name").id.as_str(), "c2");
        assert!(matches!(
            gw.get(&ContainerId::new("nope")),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn start_and_stop_flip_status() {
        let gw = engine();
        let db = gw.get(&ContainerId::new("db")).expect("get");
        gw.start(&db).expect("start");
        assert_eq!(gw.status_of("db").as_deref(), Some("running"));
        gw.stop(&db).expect("stop");
        assert_eq!(gw.status_of("db").as_deref(), Some("exited"));
    }

    #[test]
    fn logs_are_tailed() {
        let gw = engine();
        let web = gw.get(&ContainerId::new("web")).expect("get");
        assert_eq!(gw.logs(&web, 2).expect("logs"), "l2\nl3\n");
    }

    #[test]
    fn scripted_build_failure() {
        let gw = engine();
        gw.set_build_failure("api", Some("no Dockerfile"));
        let err = gw.build_image(Path::new("/a"), "api").unwrap_err();
        assert!(matches!(err, EngineError::BuildFailed { .. }));
        gw.set_build_failure("api", None);
        gw.build_image(Path::new("/a"), "api").expect("build");
        assert_eq!(gw.built_images(), vec![(PathBuf::from("/a"), "api".to_string())]);
    }

    #[test]
    fn offline_engine_is_unavailable_and_journals() {
        let gw = engine();
        gw.set_offline(true);
        assert!(!gw.is_available());
        assert!(matches!(gw.list(true), Err(EngineError::Unavailable { .. })));
        assert_eq!(gw.journal(), vec![GatewayCall::List { include_stopped: true }]);
    }
}
