//! Request and response bodies.

use dockwarden_common::types::{Role, UserId};
use serde::{Deserialize, Serialize};

/// `POST /login` body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plaintext credential.
    #[serde(alias = "password")]
    pub credential: String,
}

/// `POST /login` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// `GET /me` response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmI {
    /// Login name.
    pub username: String,
    /// Whether the user may manage users.
    pub is_admin: bool,
    /// Whether a role row exists for the user.
    pub has_role: bool,
    /// Flags in force; all false when the role is absent.
    pub permissions: Role,
}

/// Machine-readable log view.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    /// Trailing log lines.
    pub logs: String,
}

/// Confirmation of a lifecycle or rebuild action.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// `POST /containers/rebuild/{name}` body.
#[derive(Debug, Deserialize)]
pub struct RebuildRequest {
    /// Build context directory.
    #[serde(rename = "folderPath", alias = "folder_path")]
    pub folder_path: String,
}

/// `GET /containers/rebuild/{name}` response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildInfo {
    /// Container name.
    pub name: String,
    /// Last attempted build path, empty when unknown.
    pub last_path: String,
}

const fn default_view() -> bool {
    true
}

/// `POST /users` body. Flags default like a fresh role row: view only.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Login name.
    pub username: String,
    /// Plaintext credential.
    #[serde(alias = "password")]
    pub credential: String,
    /// May list containers and read logs.
    #[serde(default = "default_view")]
    pub view: bool,
    /// May start and stop containers.
    #[serde(default, alias = "start_stop")]
    pub start_stop: bool,
    /// May rebuild images.
    #[serde(default)]
    pub rebuild: bool,
}

impl CreateUserRequest {
    /// Returns the requested role flags.
    #[must_use]
    pub const fn role(&self) -> Role {
        Role {
            view: self.view,
            start_stop: self.start_stop,
            rebuild: self.rebuild,
        }
    }
}

/// `POST /users` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// Id of the new user.
    pub id: UserId,
    /// Login name of the new user.
    pub username: String,
}
