//! Persisted rows and the values exchanged with store callers.

use std::path::PathBuf;

use dockwarden_common::types::{Role, UserId};
use serde::{Deserialize, Serialize};

/// A user as seen by callers of the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Opaque credential hash (PHC string).
    pub credential_hash: String,
    /// Grants user-management operations. Container actions are governed
    /// by the role only.
    pub is_admin: bool,
}

/// Input to [`IdentityStore::create_user`](crate::IdentityStore::create_user).
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Credential hash produced by [`hash_credential`](crate::credential::hash_credential).
    pub credential_hash: String,
    /// Whether the user may manage other users.
    pub is_admin: bool,
    /// Permission flags stored in the user's role row.
    pub role: Role,
}

/// `user` table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Primary key.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Opaque credential hash.
    pub credential_hash: String,
    /// Admin flag.
    #[serde(default)]
    pub is_admin: bool,
    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created_at: String,
}

impl From<&UserRecord> for User {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            credential_hash: record.credential_hash.clone(),
            is_admin: record.is_admin,
        }
    }
}

/// `role` table row, one per user at most.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Primary key.
    pub id: u64,
    /// Owning user (unique).
    pub user_id: UserId,
    /// May list containers and read logs.
    pub view: bool,
    /// May start and stop containers.
    pub start_stop: bool,
    /// May rebuild images.
    pub rebuild: bool,
}

impl RoleRecord {
    /// Returns the permission flags of this row.
    #[must_use]
    pub const fn role(&self) -> Role {
        Role {
            view: self.view,
            start_stop: self.start_stop,
            rebuild: self.rebuild,
        }
    }
}

/// `container_config` table row: the build memory of one container name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfigRecord {
    /// Primary key.
    pub id: u64,
    /// Container name (unique).
    pub container_name: String,
    /// Last attempted build source path.
    pub last_build_path: Option<PathBuf>,
}
