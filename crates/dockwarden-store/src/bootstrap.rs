//! Seed admin account creation.

use dockwarden_common::constants::ADMIN_USERNAME;
use dockwarden_common::types::{Role, UserId};

use crate::credential::hash_credential;
use crate::error::{Result, StoreError};
use crate::identity::IdentityStore;
use crate::model::NewUser;

/// Ensures a user named `admin` exists, creating it with every role flag
/// and `credential` when absent.
///
/// Returns the id of the newly created admin, or `None` if one already
/// existed.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn ensure_admin(store: &dyn IdentityStore, credential: &str) -> Result<Option<UserId>> {
    if store.find_by_username(ADMIN_USERNAME)?.is_some() {
        tracing::debug!("admin account present");
        return Ok(None);
    }

    let new_user = NewUser {
        username: ADMIN_USERNAME.to_string(),
        credential_hash: hash_credential(credential)?,
        is_admin: true,
        role: Role::all(),
    };
    match store.create_user(new_user) {
        Ok(id) => {
            tracing::warn!(
                user = ADMIN_USERNAME,
                "created bootstrap admin with the initial credential; rotate it"
            );
            Ok(Some(id))
        }
        // Another process bootstrapped between the lookup and the insert.
        Err(StoreError::DuplicateUsername { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::verify_credential;
    use crate::document::JsonStore;

    #[test]
    fn creates_admin_with_all_flags() {
        let store = JsonStore::in_memory();
        let id = ensure_admin(&store, "admin123")
            .expect("bootstrap")
            .expect("created");
        let admin = store.find_by_id(id).expect("read").expect("present");
        assert_eq!(admin.username, "admin");
        assert!(admin.is_admin);
        assert!(verify_credential("admin123", &admin.credential_hash));
        assert_eq!(store.role_of(id).expect("role"), Some(Role::all()));
    }

    #[test]
    fn second_bootstrap_is_noop() {
        let store = JsonStore::in_memory();
        assert!(ensure_admin(&store, "admin123").expect("first").is_some());
        assert!(ensure_admin(&store, "different").expect("second").is_none());
        assert_eq!(store.usernames().expect("list"), vec!["admin".to_string()]);
    }
}
