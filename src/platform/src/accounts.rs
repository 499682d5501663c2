use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::rbac::Permission;
use common::rbac::Role;
use common::types::OptionalProperty;
use common::ADMIN_ID;
use metadata::accounts::Accounts as MDAccounts;
use serde::Deserialize;
use serde::Serialize;

use crate::Context;
use crate::ListResponse;
use crate::PlatformError;
use crate::Result;

pub struct Accounts {
    prov: Arc<MDAccounts>,
}

impl Accounts {
    pub fn new(prov: Arc<MDAccounts>) -> Self {
        Self { prov }
    }

    pub async fn get_by_id(&self, ctx: Context, id: u64) -> Result<Account> {
        ctx.check_permission(Permission::ViewAccounts)?;

        Ok(self.prov.get_by_id(id)?.into())
    }

    pub async fn list(&self, ctx: Context) -> Result<ListResponse<Account>> {
        ctx.check_permission(Permission::ViewAccounts)?;
        let resp = self.prov.list()?;

        Ok(resp.into())
    }

    pub async fn list_by_role(&self, ctx: Context, role: Role) -> Result<ListResponse<Account>> {
        ctx.check_permission(Permission::ViewAccounts)?;
        let resp = self.prov.list_by_role(role)?;

        Ok(resp.into())
    }

    pub async fn update_role(&self, ctx: Context, account_id: u64, role: Role) -> Result<Account> {
        ctx.check_permission(Permission::ManageAccounts)?;
        if account_id == ADMIN_ID {
            return Err(PlatformError::Forbidden(
                "the root account role can't be changed".to_string(),
            ));
        }

        let md_req = metadata::accounts::UpdateAccountRequest {
            updated_by: ctx.account_id,
            role: OptionalProperty::Some(role),
            ..Default::default()
        };
        let account = self.prov.update(account_id, md_req)?;

        Ok(account.into())
    }

    pub async fn delete(&self, ctx: Context, id: u64) -> Result<Account> {
        ctx.check_permission(Permission::ManageAccounts)?;
        if id == ADMIN_ID {
            return Err(PlatformError::Forbidden(
                "the root account can't be deleted".to_string(),
            ));
        }

        Ok(self.prov.delete(id)?.into())
    }
}

/// Wire shape of an account. Password hash and reset token never leave
/// the metadata layer.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile_image: Option<String>,
}

impl From<metadata::accounts::Account> for Account {
    fn from(acc: metadata::accounts::Account) -> Self {
        Account {
            id: acc.id,
            created_at: acc.created_at,
            updated_at: acc.updated_at,
            username: acc.username,
            email: acc.email,
            role: acc.role,
            profile_image: acc.profile_image,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateRoleRequest {
    pub role: Role,
}
