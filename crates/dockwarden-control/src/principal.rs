//! The resolved identity and permission context of a request.

use dockwarden_common::types::{Action, Role, UserId};
use dockwarden_store::IdentityStore;
use serde::Serialize;

use crate::error::Result;
use crate::policy::allows;

/// Who is asking, and with which role. Built once per request and passed by
/// reference to every gated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Store id of the user.
    pub user_id: UserId,
    /// Login name.
    pub username: String,
    /// May manage users. Grants nothing on containers.
    pub is_admin: bool,
    /// Role row, absent for users created without one.
    pub role: Option<Role>,
}

impl Principal {
    /// Loads the principal of `user_id`, or `None` if the user no longer
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn resolve(store: &dyn IdentityStore, user_id: UserId) -> Result<Option<Self>> {
        let Some(user) = store.find_by_id(user_id)? else {
            return Ok(None);
        };
        let role = store.role_of(user.id)?;
        Ok(Some(Self {
            user_id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            role,
        }))
    }

    /// Returns whether this principal may perform `action`.
    #[must_use]
    pub const fn can(&self, action: Action) -> bool {
        allows(self.role.as_ref(), action)
    }

    /// The flags actually in force: an absent role counts as all-false.
    #[must_use]
    pub const fn effective_role(&self) -> Role {
        Role {
            view: self.can(Action::View),
            start_stop: self.can(Action::StartStop),
            rebuild: self.can(Action::Rebuild),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockwarden_store::JsonStore;
    use dockwarden_store::model::NewUser;

    #[test]
    fn resolve_loads_role() {
        let store = JsonStore::in_memory();
        let id = store
            .create_user(NewUser {
                username: "ops".into(),
                credential_hash: "h".into(),
                is_admin: false,
                role: Role {
                    view: true,
                    start_stop: true,
                    rebuild: false,
                },
            })
            .expect("create");
        let principal = Principal::resolve(&store, id).expect("resolve").expect("present");
        assert_eq!(principal.username, "ops");
        assert!(principal.can(Action::StartStop));
        assert!(!principal.can(Action::Rebuild));
    }

    #[test]
    fn resolve_unknown_user_is_none() {
        let store = JsonStore::in_memory();
        assert!(Principal::resolve(&store, UserId::new(9)).expect("resolve").is_none());
    }

    #[test]
    fn effective_role_of_absent_role_is_all_false() {
        let principal = Principal {
            user_id: UserId::new(1),
            username: "legacy".into(),
            is_admin: true,
            role: None,
        };
        assert_eq!(principal.effective_role(), Role::none());
    }
}
