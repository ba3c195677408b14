//! Parsing of engine inspect documents into container summaries.

use std::collections::BTreeMap;

use dockwarden_common::types::{ContainerId, ContainerSummary};
use serde::Deserialize;

use crate::error::{EngineError, Result};

/// The subset of a `docker inspect` document the control plane reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectDocument {
    /// Full container id.
    pub id: String,
    /// Container name, usually with a leading `/`.
    #[serde(default)]
    pub name: String,
    /// Runtime state.
    #[serde(default)]
    pub state: InspectState,
    /// Network configuration, including published ports.
    #[serde(default)]
    pub network_settings: NetworkSettings,
    /// Mounts in engine order.
    #[serde(default)]
    pub mounts: Vec<Mount>,
}

/// `State` section of an inspect document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectState {
    /// Status string (`running`, `exited`, `created`, ...).
    #[serde(default)]
    pub status: String,
}

/// `NetworkSettings` section of an inspect document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkSettings {
    /// Container port (`80/tcp`) to host bindings. Unpublished ports map
    /// to `null`.
    #[serde(default)]
    pub ports: Option<BTreeMap<String, Option<Vec<PortBinding>>>>,
}

/// One host binding of a container port.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortBinding {
    /// Host interface address.
    #[serde(default)]
    pub host_ip: String,
    /// Host port number, as a string.
    #[serde(default)]
    pub host_port: String,
}

/// One entry of the `Mounts` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mount {
    /// Host-side source path.
    #[serde(default)]
    pub source: Option<String>,
}

impl InspectDocument {
    /// Returns the container name without the engine's leading `/`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.strip_prefix('/').unwrap_or(&self.name)
    }

    /// Host ports, one per published container port. When a container port
    /// has several host bindings the first one reported wins.
    #[must_use]
    pub fn host_ports(&self) -> Vec<String> {
        self.network_settings
            .ports
            .iter()
            .flat_map(BTreeMap::values)
            .filter_map(|bindings| bindings.as_ref()?.first())
            .map(|binding| binding.host_port.clone())
            .collect()
    }

    /// Host-side mount sources in engine order.
    #[must_use]
    pub fn host_paths(&self) -> Vec<String> {
        self.mounts
            .iter()
            .filter_map(|m| m.source.clone())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Converts the document into a [`ContainerSummary`].
    #[must_use]
    pub fn into_summary(self) -> ContainerSummary {
        ContainerSummary {
            name: self.display_name().to_string(),
            status: self.state.status.clone(),
            ports: self.host_ports(),
            host_paths: self.host_paths(),
            id: ContainerId::new(self.id),
        }
    }
}

/// Parses the JSON array printed by `docker inspect`.
///
/// # Errors
///
/// Returns [`EngineError::MalformedOutput`] if the text is not an array of
/// inspect documents.
pub fn parse_inspect(json: &str) -> Result<Vec<InspectDocument>> {
    serde_json::from_str(json).map_err(|e| EngineError::MalformedOutput {
        message: format!("inspect output: {e}"),
    })
}
