use std::sync::Arc;

use axum::extract::Extension;
use axum::extract::Path;
use axum::extract::Query;
use axum::routing;
use axum::Router;
use common::http::Json;
use common::rbac::Role;
use serde::Deserialize;

use crate::accounts::Account;
use crate::accounts::Accounts;
use crate::accounts::UpdateRoleRequest;
use crate::Context;
use crate::ListResponse;
use crate::Result;

#[derive(Deserialize)]
struct ListQuery {
    role: Option<Role>,
}

async fn list(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<Account>>> {
    let resp = match query.role {
        Some(role) => provider.list_by_role(ctx, role).await?,
        None => provider.list(ctx).await?,
    };

    Ok(Json(resp))
}

async fn get_by_id(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
    Path(account_id): Path<u64>,
) -> Result<Json<Account>> {
    Ok(Json(provider.get_by_id(ctx, account_id).await?))
}

async fn update_role(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
    Path(account_id): Path<u64>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<Account>> {
    Ok(Json(
        provider.update_role(ctx, account_id, request.role).await?,
    ))
}

async fn delete(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
    Path(account_id): Path<u64>,
) -> Result<Json<Account>> {
    Ok(Json(provider.delete(ctx, account_id).await?))
}

pub fn attach_routes(router: Router) -> Router {
    router.nest(
        "/admin/accounts",
        Router::new()
            .route("/", routing::get(list))
            .route("/:account_id", routing::get(get_by_id).delete(delete))
            .route("/:account_id/role", routing::put(update_role)),
    )
}
