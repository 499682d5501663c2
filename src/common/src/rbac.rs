use lazy_static::lazy_static;
use serde::Deserialize;
use serde::Serialize;

use crate::error::CommonError;
use crate::Result;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    All,
    ManageAccounts,
    ViewAccounts,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

lazy_static! {
    pub static ref PERMISSIONS: Vec<(Role, Vec<Permission>)> = vec![
        (Role::Admin, vec![Permission::All]),
        (Role::Manager, vec![Permission::ViewAccounts]),
    ];
}

pub fn check_permission(role: Role, permission: Permission) -> Result<()> {
    for (root_role, role_permissions) in PERMISSIONS.iter() {
        if *root_role != role {
            continue;
        }
        if role_permissions.contains(&Permission::All) {
            return Ok(());
        }
        if role_permissions.contains(&permission) {
            return Ok(());
        }
    }

    Err(CommonError::Forbidden("forbidden".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_every_permission() {
        check_permission(Role::Admin, Permission::ManageAccounts).unwrap();
        check_permission(Role::Admin, Permission::ViewAccounts).unwrap();
    }

    #[test]
    fn manager_can_only_view_accounts() {
        check_permission(Role::Manager, Permission::ViewAccounts).unwrap();
        assert!(check_permission(Role::Manager, Permission::ManageAccounts).is_err());
    }

    #[test]
    fn user_has_no_admin_permissions() {
        assert!(check_permission(Role::User, Permission::ViewAccounts).is_err());
        assert!(check_permission(Role::User, Permission::ManageAccounts).is_err());
    }
}
