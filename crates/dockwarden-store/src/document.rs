//! JSON-document store backing both the identity store and build memory.
//!
//! The three tables (`users`, `roles`, `container_configs`) live in one
//! document. Every mutation runs as a transaction: a draft copy of the
//! document is modified, written to a temporary file next to the state file
//! and renamed over it, and only then swapped in as the live copy. A failed
//! write leaves both the file and the live copy untouched.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dockwarden_common::types::{Role, UserId};
use serde::{Deserialize, Serialize};

use crate::build_memory::BuildMemoryStore;
use crate::error::{Result, StoreError};
use crate::identity::IdentityStore;
use crate::model::{ContainerConfigRecord, NewUser, RoleRecord, User, UserRecord};

/// On-disk layout of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreDocument {
    /// `user` table.
    pub users: Vec<UserRecord>,
    /// `role` table.
    pub roles: Vec<RoleRecord>,
    /// `container_config` table.
    pub container_configs: Vec<ContainerConfigRecord>,
}

impl StoreDocument {
    fn next_user_id(&self) -> UserId {
        UserId::new(self.users.iter().map(|u| u.id.get()).max().unwrap_or(0) + 1)
    }

    fn next_role_id(&self) -> u64 {
        self.roles.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    fn next_config_id(&self) -> u64 {
        self.container_configs
            .iter()
            .map(|c| c.id)
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Store over a single JSON document, optionally backed by a file.
#[derive(Debug)]
pub struct JsonStore {
    path: Option<PathBuf>,
    document: Mutex<StoreDocument>,
}

impl JsonStore {
    /// Opens the store at `path`. A missing file is an empty store; the file
    /// is created on the first committed write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        tracing::info!(path = %path.display(), "opening store");
        let document = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| StoreError::Io {
                path: path.clone(),
                source: e,
            })?;
            serde_json::from_str(&content)?
        } else {
            StoreDocument::default()
        };
        Ok(Self {
            path: Some(path),
            document: Mutex::new(document),
        })
    }

    /// Creates a store that lives only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            document: Mutex::new(StoreDocument::default()),
        }
    }

    /// Returns the backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a copy of the current document.
    #[must_use]
    pub fn snapshot(&self) -> StoreDocument {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(&StoreDocument) -> T) -> T {
        f(&self.lock())
    }

    /// Runs `f` against a draft of the document and commits the draft if
    /// `f` succeeds and the write goes through.
    fn transaction<T>(&self, f: impl FnOnce(&mut StoreDocument) -> Result<T>) -> Result<T> {
        let mut live = self.lock();
        let mut draft = live.clone();
        let value = f(&mut draft)?;
        if let Some(path) = &self.path {
            write_document(path, &draft)?;
        }
        *live = draft;
        Ok(value)
    }
}

/// Writes the document to a sibling temporary file and renames it into place.
fn write_document(path: &Path, document: &StoreDocument) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| StoreError::Io {
        path: parent.clone(),
        source: e,
    })?;
    let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(|e| StoreError::Io {
        path: parent.clone(),
        source: e,
    })?;
    serde_json::to_writer_pretty(&mut tmp, document)?;
    tmp.as_file().sync_all().map_err(|e| StoreError::Io {
        path: tmp.path().to_path_buf(),
        source: e,
    })?;
    let _ = tmp.persist(path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    tracing::debug!(path = %path.display(), "store committed");
    Ok(())
}

impl IdentityStore for JsonStore {
    fn create_user(&self, new_user: NewUser) -> Result<UserId> {
        let username = new_user.username.clone();
        let id = self.transaction(|doc| {
            if doc.users.iter().any(|u| u.username == new_user.username) {
                return Err(StoreError::DuplicateUsername {
                    username: new_user.username,
                });
            }
            let id = doc.next_user_id();
            let role_id = doc.next_role_id();
            doc.users.push(UserRecord {
                id,
                username: new_user.username,
                credential_hash: new_user.credential_hash,
                is_admin: new_user.is_admin,
                created_at: chrono::Utc::now().to_rfc3339(),
            });
            doc.roles.push(RoleRecord {
                id: role_id,
                user_id: id,
                view: new_user.role.view,
                start_stop: new_user.role.start_stop,
                rebuild: new_user.role.rebuild,
            });
            Ok(id)
        })?;
        tracing::info!(user = %username, id = %id, "user created");
        Ok(id)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.read(|doc| {
            doc.users
                .iter()
                .find(|u| u.username == username)
                .map(User::from)
        }))
    }

    fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.read(|doc| doc.users.iter().find(|u| u.id == id).map(User::from)))
    }

    fn role_of(&self, id: UserId) -> Result<Option<Role>> {
        self.read(|doc| {
            if !doc.users.iter().any(|u| u.id == id) {
                return Err(StoreError::UnknownUser { id });
            }
            Ok(doc
                .roles
                .iter()
                .find(|r| r.user_id == id)
                .map(RoleRecord::role))
        })
    }

    fn usernames(&self) -> Result<Vec<String>> {
        Ok(self.read(|doc| doc.users.iter().map(|u| u.username.clone()).collect()))
    }
}

impl BuildMemoryStore for JsonStore {
    fn get(&self, container_name: &str) -> Result<Option<PathBuf>> {
        Ok(self.read(|doc| {
            doc.container_configs
                .iter()
                .find(|c| c.container_name == container_name)
                .and_then(|c| c.last_build_path.clone())
        }))
    }

    fn put(&self, container_name: &str, path: &Path) -> Result<()> {
        self.transaction(|doc| {
            if let Some(config) = doc
                .container_configs
                .iter_mut()
                .find(|c| c.container_name == container_name)
            {
                config.last_build_path = Some(path.to_path_buf());
            } else {
                let id = doc.next_config_id();
                doc.container_configs.push(ContainerConfigRecord {
                    id,
                    container_name: container_name.to_string(),
                    last_build_path: Some(path.to_path_buf()),
                });
            }
            Ok(())
        })?;
        tracing::debug!(container = container_name, path = %path.display(), "build path recorded");
        Ok(())
    }
}
