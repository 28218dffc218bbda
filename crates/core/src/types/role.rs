//! Roles, permission tokens, and the static role-permission registry.
//!
//! Every console capability is named by a [`Permission`] token. Each
//! [`Role`] carries a fixed set of tokens; the mapping is immutable and
//! compiled in. `SuperAdmin` holds the full set, so every token is reachable
//! by at least one role (pinned by a test below).

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// An authenticated console user.
///
/// Exactly one role per identity; there is no multi-role composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

/// Console role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every console capability.
    SuperAdmin,
    /// Platform operations: catalog, orders, merchants, users, moderation.
    Admin,
    /// A merchant's own storefront: menu, orders, coupons, review responses.
    MerchantAdmin,
    /// Customer support: ticket handling and read access to orders and users.
    SupportAgent,
    /// Finance team: refunds, payouts, financial reporting.
    Finance,
    /// Delivery operations: order flow and merchant visibility.
    Logistics,
}

impl Role {
    /// All roles in the closed set.
    pub const ALL: [Self; 6] = [
        Self::SuperAdmin,
        Self::Admin,
        Self::MerchantAdmin,
        Self::SupportAgent,
        Self::Finance,
        Self::Logistics,
    ];

    /// The permission tokens this role holds.
    #[must_use]
    pub const fn permissions(&self) -> &'static [Permission] {
        use Permission as P;
        match self {
            Self::SuperAdmin => &P::ALL,
            Self::Admin => &[
                P::ViewOrders,
                P::ManageOrders,
                P::RefundOrders,
                P::CancelOrders,
                P::DeleteOrders,
                P::ViewProducts,
                P::ManageProducts,
                P::ViewMerchants,
                P::ManageMerchants,
                P::ApproveMerchants,
                P::ViewUsers,
                P::ManageUsers,
                P::BanUsers,
                P::ViewCoupons,
                P::ManageCoupons,
                P::ViewReviews,
                P::ModerateReviews,
                P::ViewFinance,
                P::ViewReports,
                P::ViewSettings,
                P::ViewTickets,
                P::ManageTickets,
            ],
            Self::MerchantAdmin => &[
                P::ViewOrders,
                P::ManageOrders,
                P::CancelOrders,
                P::ViewProducts,
                P::ManageProducts,
                P::ViewCoupons,
                P::ManageCoupons,
                P::ViewReviews,
                P::RespondReviews,
                P::ViewReports,
            ],
            Self::SupportAgent => &[
                P::ViewOrders,
                P::CancelOrders,
                P::ViewUsers,
                P::ViewReviews,
                P::ViewTickets,
                P::ManageTickets,
            ],
            Self::Finance => &[
                P::ViewOrders,
                P::RefundOrders,
                P::ViewFinance,
                P::ManagePayouts,
                P::ViewReports,
            ],
            Self::Logistics => &[
                P::ViewOrders,
                P::ManageOrders,
                P::ViewMerchants,
                P::ViewReports,
            ],
        }
    }

    /// Whether this role holds a permission token.
    #[must_use]
    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::MerchantAdmin => "merchant_admin",
            Self::SupportAgent => "support_agent",
            Self::Finance => "finance",
            Self::Logistics => "logistics",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "merchant_admin" => Ok(Self::MerchantAdmin),
            "support_agent" => Ok(Self::SupportAgent),
            "finance" => Ok(Self::Finance),
            "logistics" => Ok(Self::Logistics),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// A permission token naming one allowed console action.
///
/// Tokens are grouped by resource domain. Serialized as snake_case strings
/// matching the wire format (`view_orders`, `refund_orders`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Orders
    ViewOrders,
    ManageOrders,
    RefundOrders,
    CancelOrders,
    DeleteOrders,
    // Products
    ViewProducts,
    ManageProducts,
    // Merchants
    ViewMerchants,
    ManageMerchants,
    ApproveMerchants,
    // Users
    ViewUsers,
    ManageUsers,
    BanUsers,
    // Coupons
    ViewCoupons,
    ManageCoupons,
    // Reviews
    ViewReviews,
    ModerateReviews,
    RespondReviews,
    // Finance
    ViewFinance,
    ManagePayouts,
    // Reports
    ViewReports,
    // Settings
    ViewSettings,
    ManageSettings,
    // Audit
    ViewAuditLog,
    // Support
    ViewTickets,
    ManageTickets,
}

impl Permission {
    /// Every permission token in the fixed set.
    pub const ALL: [Self; 26] = [
        Self::ViewOrders,
        Self::ManageOrders,
        Self::RefundOrders,
        Self::CancelOrders,
        Self::DeleteOrders,
        Self::ViewProducts,
        Self::ManageProducts,
        Self::ViewMerchants,
        Self::ManageMerchants,
        Self::ApproveMerchants,
        Self::ViewUsers,
        Self::ManageUsers,
        Self::BanUsers,
        Self::ViewCoupons,
        Self::ManageCoupons,
        Self::ViewReviews,
        Self::ModerateReviews,
        Self::RespondReviews,
        Self::ViewFinance,
        Self::ManagePayouts,
        Self::ViewReports,
        Self::ViewSettings,
        Self::ManageSettings,
        Self::ViewAuditLog,
        Self::ViewTickets,
        Self::ManageTickets,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_holds_the_full_set() {
        for permission in Permission::ALL {
            assert!(Role::SuperAdmin.grants(permission), "{permission:?}");
        }
    }

    #[test]
    fn every_permission_is_reachable_by_at_least_one_role() {
        for permission in Permission::ALL {
            let reachable = Role::ALL.iter().any(|role| role.grants(permission));
            assert!(reachable, "{permission:?} is granted by no role");
        }
    }

    #[test]
    fn support_agent_cannot_refund() {
        assert!(!Role::SupportAgent.grants(Permission::RefundOrders));
        assert!(Role::SupportAgent.grants(Permission::CancelOrders));
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in Role::ALL {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn permission_serializes_as_snake_case_token() {
        let json = serde_json::to_string(&Permission::RefundOrders).unwrap();
        assert_eq!(json, "\"refund_orders\"");
    }
}
