use std::sync::Arc;

use axum::extract::Extension;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing;
use axum::Router;
use common::http::Json;

use crate::tasks::CreateTaskRequest;
use crate::tasks::SetStatusRequest;
use crate::tasks::Task;
use crate::tasks::Tasks;
use crate::tasks::UpdateTaskRequest;
use crate::Context;
use crate::ListResponse;
use crate::Result;

async fn create(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>)> {
    Ok((
        StatusCode::CREATED,
        Json(provider.create(ctx, request).await?),
    ))
}

async fn get_by_id(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
) -> Result<Json<Task>> {
    Ok(Json(provider.get_by_id(ctx, task_id).await?))
}

async fn list(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
) -> Result<Json<ListResponse<Task>>> {
    Ok(Json(provider.list(ctx).await?))
}

async fn list_by_project(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(project_id): Path<u64>,
) -> Result<Json<ListResponse<Task>>> {
    Ok(Json(provider.list_by_project(ctx, project_id).await?))
}

async fn list_own(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
) -> Result<Json<ListResponse<Task>>> {
    Ok(Json(provider.list_own(ctx).await?))
}

async fn list_own_in_project(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(project_id): Path<u64>,
) -> Result<Json<ListResponse<Task>>> {
    Ok(Json(provider.list_own_in_project(ctx, project_id).await?))
}

async fn update(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    Ok(Json(provider.update(ctx, task_id, request).await?))
}

async fn delete(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
) -> Result<Json<Task>> {
    Ok(Json(provider.delete(ctx, task_id).await?))
}

async fn finish(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
) -> Result<Json<Task>> {
    Ok(Json(provider.finish(ctx, task_id).await?))
}

async fn set_status(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<Task>> {
    Ok(Json(provider.set_status(ctx, task_id, request).await?))
}

pub fn attach_routes(router: Router) -> Router {
    router.nest(
        "/tasks",
        Router::new()
            .route("/", routing::post(create).get(list))
            .route(
                "/:task_id",
                routing::get(get_by_id).delete(delete).put(update),
            )
            .route("/:task_id/finish", routing::put(finish))
            .route("/:task_id/status", routing::put(set_status))
            .route("/project/:project_id", routing::get(list_by_project))
            .route("/user", routing::get(list_own))
            .route(
                "/user/project/:project_id",
                routing::get(list_own_in_project),
            ),
    )
}
