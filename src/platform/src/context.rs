use std::sync::Arc;

use axum::async_trait;
use axum::extract::Extension;
use axum::http::request::Parts;
use axum_core::extract::FromRequestParts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use common::policy::Caller;
use common::rbac;
use common::rbac::Permission;
use common::rbac::Role;

use crate::auth;
use crate::auth::token::parse_access_token;
use crate::error::AuthError;
use crate::PlatformError;
use crate::Result;

#[derive(Clone)]
pub struct Context {
    pub account_id: u64,
    pub role: Role,
}

impl Context {
    pub fn check_permission(&self, permission: Permission) -> Result<()> {
        Ok(rbac::check_permission(self.role, permission)?)
    }

    pub fn caller(&self) -> Caller {
        Caller::new(self.account_id, self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where S: Send + Sync
{
    type Rejection = PlatformError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> core::result::Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_err| AuthError::CantParseBearerHeader)?;

        let Extension(auth_cfg) = Extension::<auth::Config>::from_request_parts(parts, state)
            .await
            .map_err(|err| PlatformError::Internal(err.to_string()))?;

        let claims = parse_access_token(bearer.token(), &auth_cfg.access_token_key)
            .map_err(|err| err.wrap_into(AuthError::CantParseAccessToken))?;
        let Extension(md_acc_prov) =
            Extension::<Arc<metadata::accounts::Accounts>>::from_request_parts(parts, state)
                .await
                .map_err(|err| PlatformError::Internal(err.to_string()))?;

        // the token may outlive the account it was minted for
        let acc = md_acc_prov
            .get_by_id(claims.account_id)
            .map_err(|_err| PlatformError::Unauthorized("account not found".to_string()))?;

        Ok(Context {
            account_id: acc.id,
            role: acc.role,
        })
    }
}
