//! Well-known role names and what each role may do.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_USER: &str = "user";
pub const ROLE_VIEWER: &str = "viewer";

/// A capability checked by the HTTP layer before an action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageStock,
    ChangeStatus,
    ManageUsers,
    ManagePrices,
    DeleteData,
    ApproveOrder,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManageStock => "manage_stock",
            Self::ChangeStatus => "change_status",
            Self::ManageUsers => "manage_users",
            Self::ManagePrices => "manage_prices",
            Self::DeleteData => "delete_data",
            Self::ApproveOrder => "approve_order",
        }
    }
}

/// Permissions granted to a role. Unknown roles get none.
pub fn permissions_for(role: &str) -> &'static [Permission] {
    use self::Permission::*;
    match role {
        ROLE_ADMIN => &[ManageStock, ChangeStatus, ManageUsers, ManagePrices, DeleteData],
        ROLE_MANAGER => &[ManageStock, ChangeStatus, ApproveOrder],
        ROLE_USER => &[ManageStock, ChangeStatus],
        _ => &[],
    }
}

pub fn has_permission(role: &str, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// `Forbidden` unless `role` carries `permission`.
pub fn require_permission(role: &str, permission: Permission) -> Result<(), CoreError> {
    if has_permission(role, permission) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "role '{role}' lacks permission '{}'",
            permission.as_str()
        )))
    }
}
