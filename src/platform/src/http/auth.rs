use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use common::http::Json;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;
use tower_cookies::Cookie;
use tower_cookies::Cookies;

use crate::accounts::Account;
use crate::auth::provider::Config;
use crate::auth::provider::ForgotPasswordRequest;
use crate::auth::provider::LogInRequest;
use crate::auth::provider::ResetPasswordRequest;
use crate::auth::provider::SignUpRequest;
use crate::auth::provider::TokensResponse;
use crate::auth::provider::UpdatePasswordRequest;
use crate::auth::provider::UpdateProfileRequest;
use crate::auth::Auth;
use crate::Context;
use crate::PlatformError;
use crate::Result;

pub const COOKIE_NAME_REFRESH_TOKEN: &str = "refresh_token";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

fn set_refresh_token_cookie(cookies: &Cookies, refresh_token: &str, expires: OffsetDateTime) {
    let cookie = Cookie::build((COOKIE_NAME_REFRESH_TOKEN, refresh_token.to_owned()))
        .expires(expires)
        .http_only(true)
        .build();
    cookies.add(cookie);
}

fn refresh_cookie_expiry(cfg: &Config) -> OffsetDateTime {
    match cfg.refresh_token_duration.to_std() {
        Ok(duration) => OffsetDateTime::now_utc() + duration,
        Err(_) => OffsetDateTime::now_utc(),
    }
}

async fn sign_up(
    cookies: Cookies,
    Extension(provider): Extension<Arc<Auth>>,
    Extension(cfg): Extension<Config>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<TokensResponse>)> {
    let tokens = provider.sign_up(req).await?;
    set_refresh_token_cookie(
        &cookies,
        tokens.refresh_token.as_str(),
        refresh_cookie_expiry(&cfg),
    );

    Ok((StatusCode::CREATED, Json(tokens)))
}

async fn log_in(
    cookies: Cookies,
    Extension(provider): Extension<Arc<Auth>>,
    Extension(cfg): Extension<Config>,
    Json(req): Json<LogInRequest>,
) -> Result<Json<TokensResponse>> {
    let tokens = provider.log_in(req).await?;
    set_refresh_token_cookie(
        &cookies,
        tokens.refresh_token.as_str(),
        refresh_cookie_expiry(&cfg),
    );

    Ok(Json(tokens))
}

async fn refresh_token(
    cookies: Cookies,
    Extension(provider): Extension<Arc<Auth>>,
    Extension(cfg): Extension<Config>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<TokensResponse>> {
    // read refresh token giving priority to cookies
    let refresh_token = if let Some(cookie) = cookies.get(COOKIE_NAME_REFRESH_TOKEN) {
        cookie.value().to_string()
    } else if let Some(token) = req.refresh_token {
        token
    } else {
        return Err(PlatformError::BadRequest(
            "refresh token hasn't provided".to_string(),
        ));
    };

    let tokens = provider.refresh_token(refresh_token.as_str()).await?;
    set_refresh_token_cookie(
        &cookies,
        tokens.refresh_token.as_str(),
        refresh_cookie_expiry(&cfg),
    );

    Ok(Json(tokens))
}

async fn get_profile(
    ctx: Context,
    Extension(provider): Extension<Arc<Auth>>,
) -> Result<Json<Account>> {
    Ok(Json(provider.get_profile(ctx).await?))
}

async fn update_profile(
    ctx: Context,
    Extension(provider): Extension<Arc<Auth>>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Account>> {
    Ok(Json(provider.update_profile(ctx, request).await?))
}

async fn update_password(
    ctx: Context,
    Extension(provider): Extension<Arc<Auth>>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Json<TokensResponse>> {
    Ok(Json(provider.update_password(ctx, request).await?))
}

async fn forgot_password(
    Extension(provider): Extension<Arc<Auth>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<StatusCode> {
    provider.forgot_password(request).await?;

    Ok(StatusCode::OK)
}

async fn reset_password(
    cookies: Cookies,
    Extension(provider): Extension<Arc<Auth>>,
    Extension(cfg): Extension<Config>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<TokensResponse>> {
    let tokens = provider.reset_password(request).await?;
    set_refresh_token_cookie(
        &cookies,
        tokens.refresh_token.as_str(),
        refresh_cookie_expiry(&cfg),
    );

    Ok(Json(tokens))
}

pub fn attach_routes(router: Router) -> Router {
    router.nest(
        "/auth",
        Router::new()
            .route("/signup", post(sign_up))
            .route("/login", post(log_in))
            .route("/refresh-token", post(refresh_token))
            .route("/forgot-password", post(forgot_password))
            .route("/reset-password", post(reset_password))
            .route("/profile", get(get_profile).put(update_profile))
            .route("/profile/password", put(update_password)),
    )
}
