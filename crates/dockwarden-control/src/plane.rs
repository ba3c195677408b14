//! The control-plane orchestrator.
//!
//! Each operation runs to completion on the calling thread, including any
//! blocking engine call. Concurrent requests against the same container are
//! not serialised here: two rebuilds of one name race on the build memory
//! (last commit wins) and two start/stop calls race at the engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dockwarden_common::constants::DEFAULT_LOG_TAIL_LINES;
use dockwarden_common::types::{Action, ContainerId, ContainerSummary, Role, UserId};
use dockwarden_runtime::{ContainerGateway, ContainerHandle};
use dockwarden_store::bootstrap::ensure_admin;
use dockwarden_store::credential::{hash_credential, verify_absent_user, verify_credential};
use dockwarden_store::model::NewUser;
use dockwarden_store::{BuildMemoryStore, IdentityStore};

use crate::error::{ControlError, Result};
use crate::principal::Principal;
use crate::session::{SessionRegistry, SessionToken};
use crate::validate;

/// Request to create a user account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Login name.
    pub username: String,
    /// Plaintext credential; hashed before storage.
    pub credential: String,
    /// Permission flags of the new user.
    pub role: Role,
}

/// Composes the stores, the evaluator, and the engine gateway.
pub struct ControlPlane {
    identity: Arc<dyn IdentityStore>,
    build_memory: Arc<dyn BuildMemoryStore>,
    gateway: Arc<dyn ContainerGateway>,
    sessions: SessionRegistry,
    log_tail_lines: usize,
}

impl ControlPlane {
    /// Creates a control plane over the given stores and gateway.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        build_memory: Arc<dyn BuildMemoryStore>,
        gateway: Arc<dyn ContainerGateway>,
    ) -> Self {
        Self {
            identity,
            build_memory,
            gateway,
            sessions: SessionRegistry::new(),
            log_tail_lines: DEFAULT_LOG_TAIL_LINES,
        }
    }

    /// Sets how many trailing log lines the log views return.
    #[must_use]
    pub const fn with_log_tail_lines(mut self, lines: usize) -> Self {
        self.log_tail_lines = lines;
        self
    }

    /// Returns the gateway this plane drives.
    #[must_use]
    pub fn gateway(&self) -> &dyn ContainerGateway {
        self.gateway.as_ref()
    }

    /// Ensures the seed admin exists. Returns its id when it was just
    /// created.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity store fails.
    pub fn bootstrap(&self, credential: &str) -> Result<Option<UserId>> {
        Ok(ensure_admin(self.identity.as_ref(), credential)?)
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Verifies credentials and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Authentication`] for an unknown user or a
    /// wrong credential, without saying which.
    pub fn login(&self, username: &str, credential: &str) -> Result<SessionToken> {
        validate::require("username", username)?;
        validate::require("credential", credential)?;

        let user = self.identity.find_by_username(username)?;
        let verified = match &user {
            Some(user) => verify_credential(credential, &user.credential_hash),
            None => verify_absent_user(credential),
        };
        match user {
            Some(user) if verified => {
                tracing::info!(user = %user.username, "login succeeded");
                Ok(self.sessions.issue(user.id))
            }
            _ => {
                tracing::warn!(user = username, "login rejected");
                Err(ControlError::Authentication)
            }
        }
    }

    /// Ends a session. Unknown tokens are ignored.
    pub fn logout(&self, token: &SessionToken) {
        if self.sessions.revoke(token) {
            tracing::info!("session closed");
        }
    }

    /// Resolves the principal behind a session token.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Unauthenticated`] if the session is unknown
    /// or its user no longer exists.
    pub fn principal(&self, token: &SessionToken) -> Result<Principal> {
        let user_id = self
            .sessions
            .resolve(token)
            .ok_or(ControlError::Unauthenticated)?;
        if let Some(principal) = Principal::resolve(self.identity.as_ref(), user_id)? {
            return Ok(principal);
        }
        let _ = self.sessions.revoke(token);
        Err(ControlError::Unauthenticated)
    }

    // ── Authorization ────────────────────────────────────────────────

    /// Checks `action` against the principal's role.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Authorization`] on deny.
    pub fn authorize(&self, principal: &Principal, action: Action) -> Result<()> {
        if principal.can(action) {
            return Ok(());
        }
        tracing::warn!(
            user = %principal.username,
            action = %action,
            has_role = principal.role.is_some(),
            "action denied"
        );
        Err(ControlError::Authorization { action })
    }

    // ── Containers ───────────────────────────────────────────────────

    /// Lists every container, including stopped ones. Requires `view`.
    ///
    /// # Errors
    ///
    /// Returns an authorization or engine error.
    pub fn list_containers(&self, principal: &Principal) -> Result<Vec<ContainerSummary>> {
        self.authorize(principal, Action::View)?;
        let containers = self.gateway.list(true)?;
        tracing::debug!(user = %principal.username, count = containers.len(), "containers listed");
        Ok(containers)
    }

    /// Returns the log tail of a container. Requires `view`.
    ///
    /// # Errors
    ///
    /// Returns an authorization error, `NotFound` for an unknown container,
    /// or another engine error.
    pub fn container_logs(&self, principal: &Principal, id: &ContainerId) -> Result<String> {
        self.authorize(principal, Action::View)?;
        let handle = self.gateway.get(id)?;
        Ok(self.gateway.logs(&handle, self.log_tail_lines)?)
    }

    /// Starts a container. Requires `startStop`.
    ///
    /// # Errors
    ///
    /// Returns an authorization error or the engine's failure.
    pub fn start_container(&self, principal: &Principal, id: &ContainerId) -> Result<ContainerHandle> {
        self.lifecycle(principal, id, "start", |gw, handle| gw.start(handle))
    }

    /// Stops a container. Requires `startStop`.
    ///
    /// # Errors
    ///
    /// Returns an authorization error or the engine's failure.
    pub fn stop_container(&self, principal: &Principal, id: &ContainerId) -> Result<ContainerHandle> {
        self.lifecycle(principal, id, "stop", |gw, handle| gw.stop(handle))
    }

    fn lifecycle(
        &self,
        principal: &Principal,
        id: &ContainerId,
        action: &'static str,
        call: impl FnOnce(&dyn ContainerGateway, &ContainerHandle) -> dockwarden_runtime::Result<()>,
    ) -> Result<ContainerHandle> {
        self.authorize(principal, Action::StartStop)?;
        let handle = self.gateway.get(id)?;
        match call(self.gateway.as_ref(), &handle) {
            Ok(()) => {
                tracing::info!(user = %principal.username, container = %handle.name, action, "lifecycle call succeeded");
                Ok(handle)
            }
            Err(e) => {
                tracing::error!(user = %principal.username, container = %handle.name, action, error = %e, "lifecycle call failed");
                Err(e.into())
            }
        }
    }

    // ── Rebuild ──────────────────────────────────────────────────────

    /// Returns the last attempted build path of a container name.
    /// Requires `rebuild`.
    ///
    /// # Errors
    ///
    /// Returns an authorization or store error.
    pub fn last_build_path(&self, principal: &Principal, name: &str) -> Result<Option<PathBuf>> {
        self.authorize(principal, Action::Rebuild)?;
        Ok(self.build_memory.get(name)?)
    }

    /// Records `path` as the build path of `name`, then builds an image
    /// tagged `name` from it. Requires `rebuild`.
    ///
    /// The path is committed before the build starts and stays committed
    /// when the build fails.
    ///
    /// # Errors
    ///
    /// Returns an authorization, validation, store, or build error.
    pub fn rebuild(&self, principal: &Principal, name: &str, path: &Path) -> Result<()> {
        self.authorize(principal, Action::Rebuild)?;
        validate::require("container name", name)?;
        validate::build_path(path)?;

        self.build_memory.put(name, path)?;
        match self.gateway.build_image(path, name) {
            Ok(()) => {
                tracing::info!(user = %principal.username, container = name, path = %path.display(), "rebuild succeeded");
                Ok(())
            }
            Err(e) => {
                tracing::error!(user = %principal.username, container = name, path = %path.display(), error = %e, "rebuild failed");
                Err(e.into())
            }
        }
    }

    // ── Users ────────────────────────────────────────────────────────

    /// Creates a user and its role in one commit. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::AdminRequired`] for non-admins,
    /// [`ControlError::DuplicateUsername`] if the name is taken, or a
    /// validation or store error.
    pub fn create_user(&self, principal: &Principal, account: NewAccount) -> Result<UserId> {
        if !principal.is_admin {
            tracing::warn!(user = %principal.username, "user creation denied");
            return Err(ControlError::AdminRequired);
        }
        validate::username(&account.username)?;
        validate::new_credential(&account.credential)?;

        if self.identity.find_by_username(&account.username)?.is_some() {
            return Err(ControlError::DuplicateUsername {
                username: account.username,
            });
        }
        let id = self.identity.create_user(NewUser {
            credential_hash: hash_credential(&account.credential)?,
            username: account.username,
            is_admin: false,
            role: account.role,
        })?;
        tracing::info!(admin = %principal.username, id = %id, "user created");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockwarden_runtime::gateway::memory::{GatewayCall, InMemoryGateway};
    use dockwarden_store::JsonStore;

    fn plane_with(gateway: Arc<InMemoryGateway>) -> (ControlPlane, Arc<JsonStore>) {
        let store = Arc::new(JsonStore::in_memory());
        let plane = ControlPlane::new(store.clone(), store.clone(), gateway);
        (plane, store)
    }

    fn principal(role: Option<Role>, is_admin: bool) -> Principal {
        Principal {
            user_id: UserId::new(1),
            username: "tester".into(),
            is_admin,
            role,
        }
    }

    #[test]
    fn authorize_denies_without_role() {
        let (plane, _) = plane_with(Arc::new(InMemoryGateway::new()));
        for action in Action::ALL {
            assert!(matches!(
                plane.authorize(&principal(None, true), action),
                Err(ControlError::Authorization { .. })
            ));
        }
    }

    #[test]
    fn login_issues_session_for_valid_credentials() {
        let (plane, _) = plane_with(Arc::new(InMemoryGateway::new()));
        let _ = plane.bootstrap("admin123").expect("bootstrap");
        let token = plane.login("admin", "admin123").expect("login");
        let who = plane.principal(&token).expect("principal");
        assert_eq!(who.username, "admin");
        assert!(who.is_admin);
        assert_eq!(who.role, Some(Role::all()));
    }

    #[test]
    fn login_rejects_wrong_credential_and_unknown_user() {
        let (plane, _) = plane_with(Arc::new(InMemoryGateway::new()));
        let _ = plane.bootstrap("admin123").expect("bootstrap");
        assert!(matches!(plane.login("admin", "wrong!"), Err(ControlError::Authentication)));
        assert!(matches!(plane.login("ghost", "admin123"), Err(ControlError::Authentication)));
    }

    #[test]
    fn unknown_user_still_runs_a_verification() {
        let (plane, _) = plane_with(Arc::new(InMemoryGateway::new()));
        assert!(matches!(plane.login("ghost", "whatever"), Err(ControlError::Authentication)));
        assert!(dockwarden_store::credential::absent_user_hash().is_some());
    }

    #[test]
    fn login_requires_fields() {
        let (plane, _) = plane_with(Arc::new(InMemoryGateway::new()));
        assert!(matches!(plane.login("", "x"), Err(ControlError::InvalidInput { .. })));
    }

    #[test]
    fn logout_invalidates_session() {
        let (plane, _) = plane_with(Arc::new(InMemoryGateway::new()));
        let _ = plane.bootstrap("admin123").expect("bootstrap");
        let token = plane.login("admin", "admin123").expect("login");
        plane.logout(&token);
        assert!(matches!(plane.principal(&token), Err(ControlError::Unauthenticated)));
    }

    #[test]
    fn logs_use_configured_tail() {
        let gateway = Arc::new(InMemoryGateway::new().with_container("c1", "web", "running", "a\nb\nc\n"));
        let (plane, _) = plane_with(gateway.clone());
        let plane = plane.with_log_tail_lines(2);
        let logs = plane
            .container_logs(&principal(Some(Role::default()), false), &ContainerId::new("web"))
            .expect("logs");
        assert_eq!(logs, "b\nc\n");
        assert!(gateway.journal().contains(&GatewayCall::Logs {
            name: "web".into(),
            tail_lines: 2
        }));
    }

    #[test]
    fn rebuild_rejects_empty_path_before_writing() {
        let gateway = Arc::new(InMemoryGateway::new());
        let (plane, store) = plane_with(gateway.clone());
        let err = plane
            .rebuild(&principal(Some(Role::all()), false), "api", Path::new(""))
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidInput { .. }));
        assert!(BuildMemoryStore::get(store.as_ref(), "api").expect("get").is_none());
        assert!(gateway.journal().is_empty());
    }

    #[test]
    fn create_user_requires_admin_flag_not_role() {
        let (plane, store) = plane_with(Arc::new(InMemoryGateway::new()));
        let account = NewAccount {
            username: "carol".into(),
            credential: "secret1".into(),
            role: Role::default(),
        };
        let err = plane
            .create_user(&principal(Some(Role::all()), false), account)
            .unwrap_err();
        assert!(matches!(err, ControlError::AdminRequired));
        assert!(store.usernames().expect("list").is_empty());
    }

    #[test]
    fn created_users_are_not_admins() {
        let (plane, store) = plane_with(Arc::new(InMemoryGateway::new()));
        let id = plane
            .create_user(
                &principal(None, true),
                NewAccount {
                    username: "dave".into(),
                    credential: "secret1".into(),
                    role: Role::none(),
                },
            )
            .expect("create");
        let dave = store.find_by_id(id).expect("read").expect("present");
        assert!(!dave.is_admin);
        assert_eq!(store.role_of(id).expect("role"), Some(Role::none()));
    }
}
