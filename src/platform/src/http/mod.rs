pub mod accounts;
pub mod auth;
pub mod projects;
pub mod tasks;

use std::sync::Arc;

use axum::middleware;
use axum::Extension;
use axum::Router;
use common::http::print_request_response;
use metadata::MetadataProvider;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::PlatformProvider;

pub fn attach_routes(
    mut router: Router,
    md: &Arc<MetadataProvider>,
    platform: &Arc<PlatformProvider>,
    auth_cfg: crate::auth::Config,
) -> Router {
    router = auth::attach_routes(router);
    router = accounts::attach_routes(router);
    router = projects::attach_routes(router);
    router = tasks::attach_routes(router);

    router = router
        .layer(Extension(md.accounts.clone()))
        .layer(Extension(platform.auth.clone()))
        .layer(Extension(platform.accounts.clone()))
        .layer(Extension(platform.projects.clone()))
        .layer(Extension(platform.tasks.clone()))
        .layer(Extension(auth_cfg));

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    router = router
        .layer(cors)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(print_request_response));

    router
}
