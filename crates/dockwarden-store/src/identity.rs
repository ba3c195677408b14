//! Identity & role store contract.

use dockwarden_common::types::{Role, UserId};

use crate::error::Result;
use crate::model::{NewUser, User};

/// Persists users and their one-to-one role records.
///
/// Implementations must commit a user and its role as one unit: no reader
/// may ever observe a freshly created user without its role.
pub trait IdentityStore: Send + Sync {
    /// Creates a user together with its role row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateUsername`](crate::StoreError::DuplicateUsername)
    /// if the username is taken, or a persistence error. On error nothing
    /// is committed.
    fn create_user(&self, new_user: NewUser) -> Result<UserId>;

    /// Looks a user up by login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Looks a user up by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Returns the role of a user, or `None` when no role row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn role_of(&self, id: UserId) -> Result<Option<Role>>;

    /// Returns every username, in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn usernames(&self) -> Result<Vec<String>>;
}
