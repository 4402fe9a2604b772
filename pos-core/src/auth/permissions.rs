//! Permission Definitions
//!
//! Selling, collecting payments and recording cash movements need no
//! permission. Sensitive operations are gated individually.

/// Override a cart line's catalog price
pub const MODIFY_PRICE: &str = "orders:modify_price";
/// Issue credit notes against finalized sales
pub const REFUND: &str = "orders:refund";
/// Open and close cash sessions
pub const CASH_DRAWER: &str = "cash_drawer:open";
/// View ledger reports
pub const REPORTS_VIEW: &str = "reports:view";

/// Configurable permissions
pub const ALL_PERMISSIONS: &[&str] = &[MODIFY_PRICE, REFUND, CASH_DRAWER, REPORTS_VIEW];

pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[MODIFY_PRICE, REFUND, CASH_DRAWER, REPORTS_VIEW];

pub const DEFAULT_USER_PERMISSIONS: &[&str] = &[CASH_DRAWER];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    let defaults = match role_name {
        "admin" => DEFAULT_ADMIN_PERMISSIONS,
        "manager" => DEFAULT_MANAGER_PERMISSIONS,
        "user" => DEFAULT_USER_PERMISSIONS,
        _ => &[],
    };
    defaults.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_has_no_permissions() {
        assert!(get_default_permissions("guest").is_empty());
    }

    #[test]
    fn test_manager_gets_every_configurable_permission() {
        let perms = get_default_permissions("manager");
        for p in ALL_PERMISSIONS {
            assert!(perms.iter().any(|x| x == p), "missing {}", p);
        }
    }
}
