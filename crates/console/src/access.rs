//! Access evaluator: pure permission and role queries.
//!
//! All checks fail closed: with no identity, every query returns false. The
//! evaluator has no side effects and no state of its own; it reads the static
//! role-permission registry in `plateful_core`.
//!
//! Conventions for the list combinators (pinned by tests):
//! - [`has_any_permission`] on an empty list returns `false` (there is
//!   nothing to satisfy the "any").
//! - [`has_all_permissions`] on an empty list returns `true` (vacuous truth).

use plateful_core::{Identity, Permission, Role};

use crate::error::StoreError;

/// Whether the identity holds `permission`. `None` identity fails closed.
#[must_use]
pub fn has_permission(identity: Option<&Identity>, permission: Permission) -> bool {
    identity.is_some_and(|i| i.role.grants(permission))
}

/// Whether the identity holds at least one of `permissions`.
///
/// An empty list returns `false`.
#[must_use]
pub fn has_any_permission(identity: Option<&Identity>, permissions: &[Permission]) -> bool {
    permissions
        .iter()
        .any(|&p| has_permission(identity, p))
}

/// Whether the identity holds every one of `permissions`.
///
/// An empty list returns `true` (vacuous truth).
#[must_use]
pub fn has_all_permissions(identity: Option<&Identity>, permissions: &[Permission]) -> bool {
    permissions
        .iter()
        .all(|&p| has_permission(identity, p))
}

/// Whether the identity has exactly this role. `None` identity fails closed.
#[must_use]
pub fn has_role(identity: Option<&Identity>, role: Role) -> bool {
    identity.is_some_and(|i| i.role == role)
}

/// Whether the identity has one of `roles`. An empty list returns `false`.
#[must_use]
pub fn has_any_role(identity: Option<&Identity>, roles: &[Role]) -> bool {
    roles.iter().any(|&r| has_role(identity, r))
}

/// Evaluate `permission` for a mutator, producing the uniform error shape.
///
/// Store mutators call this before touching the cache or the API, so
/// permission enforcement does not depend on the view layer hiding buttons.
///
/// # Errors
///
/// Returns [`StoreError::PermissionDenied`] with a display-ready message if
/// the identity is absent or lacks the permission.
pub fn require_permission(
    identity: Option<&Identity>,
    permission: Permission,
) -> Result<(), StoreError> {
    if has_permission(identity, permission) {
        return Ok(());
    }

    let token = serde_json::to_value(permission)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_else(|| format!("{permission:?}"));

    Err(StoreError::PermissionDenied(match identity {
        Some(i) => format!("role {} does not grant {token}", i.role),
        None => format!("sign in to perform this action ({token})"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateful_core::{Email, UserId};

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::new("u-1"),
            name: "Sam".to_string(),
            email: Email::parse("sam@plateful.dev").unwrap(),
            role,
        }
    }

    #[test]
    fn no_identity_fails_closed_for_every_token() {
        for permission in Permission::ALL {
            assert!(!has_permission(None, permission));
        }
        assert!(!has_role(None, Role::SuperAdmin));
    }

    #[test]
    fn permission_matches_the_registry() {
        for role in Role::ALL {
            let id = identity(role);
            for permission in Permission::ALL {
                assert_eq!(
                    has_permission(Some(&id), permission),
                    role.grants(permission),
                    "{role} / {permission:?}"
                );
            }
        }
    }

    #[test]
    fn support_agent_cannot_refund_orders() {
        let agent = identity(Role::SupportAgent);
        assert!(!has_permission(Some(&agent), Permission::RefundOrders));
    }

    #[test]
    fn any_on_empty_list_is_false() {
        let admin = identity(Role::SuperAdmin);
        assert!(!has_any_permission(Some(&admin), &[]));
    }

    #[test]
    fn all_on_empty_list_is_true() {
        assert!(has_all_permissions(None, &[]));
    }

    #[test]
    fn combinators_respect_the_registry() {
        let finance = identity(Role::Finance);
        assert!(has_any_permission(
            Some(&finance),
            &[Permission::BanUsers, Permission::RefundOrders]
        ));
        assert!(!has_all_permissions(
            Some(&finance),
            &[Permission::BanUsers, Permission::RefundOrders]
        ));
    }

    #[test]
    fn role_checks() {
        let logistics = identity(Role::Logistics);
        assert!(has_role(Some(&logistics), Role::Logistics));
        assert!(!has_role(Some(&logistics), Role::Admin));
        assert!(has_any_role(
            Some(&logistics),
            &[Role::Admin, Role::Logistics]
        ));
        assert!(!has_any_role(Some(&logistics), &[]));
    }

    #[test]
    fn require_permission_reports_the_role_and_token() {
        let agent = identity(Role::SupportAgent);
        let err = require_permission(Some(&agent), Permission::RefundOrders).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("support_agent"));
        assert!(message.contains("refund_orders"));

        let err = require_permission(None, Permission::ViewOrders).unwrap_err();
        assert!(err.to_string().contains("sign in"));
    }
}
