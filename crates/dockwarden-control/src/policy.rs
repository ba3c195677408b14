//! Permission evaluator.
//!
//! A pure function of `(role, action)`. A missing role denies everything,
//! which is deliberately different from [`Role::default`] (view only): the
//! absence of a role row and an all-false row must both deny, and neither is
//! allowed to fall back to the creation default.

use dockwarden_common::types::{Action, Role};

/// Returns whether `role` permits `action`. Fail-closed on a missing role.
#[must_use]
pub const fn allows(role: Option<&Role>, action: Action) -> bool {
    match role {
        Some(role) => role.flag(action),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_roles() -> Vec<Role> {
        let mut roles = Vec::new();
        for bits in 0u8..8 {
            roles.push(Role {
                view: bits & 1 != 0,
                start_stop: bits & 2 != 0,
                rebuild: bits & 4 != 0,
            });
        }
        roles
    }

    #[test]
    fn absent_role_denies_every_action() {
        for action in Action::ALL {
            assert!(!allows(None, action), "{action} allowed without a role");
        }
    }

    #[test]
    fn absent_role_differs_from_default_role() {
        assert!(allows(Some(&Role::default()), Action::View));
        assert!(!allows(None, Action::View));
    }

    #[test]
    fn all_false_role_denies_every_action() {
        for action in Action::ALL {
            assert!(!allows(Some(&Role::none()), action));
        }
    }

    #[test]
    fn decision_depends_only_on_the_action_flag() {
        for role in all_roles() {
            assert_eq!(allows(Some(&role), Action::View), role.view);
            assert_eq!(allows(Some(&role), Action::StartStop), role.start_stop);
            assert_eq!(allows(Some(&role), Action::Rebuild), role.rebuild);
        }
    }

    #[test]
    fn rebuild_without_view_cannot_list() {
        let role = Role {
            view: false,
            start_stop: false,
            rebuild: true,
        };
        assert!(!allows(Some(&role), Action::View));
        assert!(allows(Some(&role), Action::Rebuild));
    }
}
