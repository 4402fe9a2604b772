use serde::{Deserialize, Serialize};

/// Signed-in staff member
///
/// Permissions use `module:action` names. Checks follow these rules:
/// 1. The `admin` role holds every permission
/// 2. A permission list containing `"all"` holds every permission
/// 3. Exact match, or prefix match with a `:*` wildcard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Operator {
    /// Build an operator with the default permissions of `role`
    pub fn with_role(
        id: i64,
        username: impl Into<String>,
        display_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        let role = role.into();
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
            permissions: super::permissions::get_default_permissions(&role),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        if self.permissions.iter().any(|p| p == "all") {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == permission {
                return true;
            }
            // "orders:*" matches "orders:refund"
            if let Some(prefix) = p.strip_suffix(":*") {
                permission.starts_with(&format!("{}:", prefix))
            } else {
                false
            }
        })
    }
}
