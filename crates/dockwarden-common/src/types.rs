//! Domain primitive types used across the Dockwarden workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw row identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw row identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engine-side identifier of a container. Either an id or a name is accepted
/// wherever the engine resolves one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-user permission flags governing container actions.
///
/// The flags are independent: `rebuild` does not imply `view`. Whether a user
/// has a `Role` at all is a separate question; see the permission evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// May list containers and read their logs.
    pub view: bool,
    /// May start and stop containers.
    pub start_stop: bool,
    /// May rebuild container images.
    pub rebuild: bool,
}

impl Role {
    /// A role with every flag set.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            view: true,
            start_stop: true,
            rebuild: true,
        }
    }

    /// A role with every flag cleared.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            view: false,
            start_stop: false,
            rebuild: false,
        }
    }

    /// Returns the flag governing `action`.
    #[must_use]
    pub const fn flag(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::StartStop => self.start_stop,
            Action::Rebuild => self.rebuild,
        }
    }
}

/// Nominal creation default of a role row: view only.
impl Default for Role {
    fn default() -> Self {
        Self {
            view: true,
            start_stop: false,
            rebuild: false,
        }
    }
}

/// Container action gated by a [`Role`] flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// List containers and read logs.
    View,
    /// Start or stop a container.
    StartStop,
    /// Rebuild a container image.
    Rebuild,
}

impl Action {
    /// Every gated action, in declaration order.
    pub const ALL: [Self; 3] = [Self::View, Self::StartStop, Self::Rebuild];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::StartStop => write!(f, "start/stop"),
            Self::Rebuild => write!(f, "rebuild"),
        }
    }
}

/// Snapshot of a container as reported by the engine. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSummary {
    /// Engine-reported container id.
    pub id: ContainerId,
    /// Container name without the engine's leading `/`.
    pub name: String,
    /// Engine status string (`running`, `exited`, ...).
    pub status: String,
    /// One host port per published container port.
    pub ports: Vec<String>,
    /// Host-side source paths of the container's mounts.
    pub host_paths: Vec<String>,
}

impl ContainerSummary {
    /// Returns whether the engine reports the container as running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_default_is_view_only() {
        let role = Role::default();
        assert!(role.view);
        assert!(!role.start_stop);
        assert!(!role.rebuild);
    }

    #[test]
    fn role_flag_maps_each_action() {
        let role = Role {
            view: false,
            start_stop: true,
            rebuild: false,
        };
        assert!(!role.flag(Action::View));
        assert!(role.flag(Action::StartStop));
        assert!(!role.flag(Action::Rebuild));
    }

    #[test]
    fn role_serializes_camel_case() {
        let json = serde_json::to_string(&Role::all()).unwrap();
        assert_eq!(json, r#"{"view":true,"startStop":true,"rebuild":true}"#);
    }

    #[test]
    fn action_display_names() {
        assert_eq!(Action::View.to_string(), "view");
        assert_eq!(Action::StartStop.to_string(), "start/stop");
        assert_eq!(Action::Rebuild.to_string(), "rebuild");
    }

    #[test]
    fn summary_running_status() {
        let summary = ContainerSummary {
            id: ContainerId::new("abc"),
            name: "web".into(),
            status: "running".into(),
            ports: vec![],
            host_paths: vec![],
        };
        assert!(summary.is_running());
    }
}
