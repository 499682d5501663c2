use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use common::config::Config;
use common::rbac::Role;
use common::ADMIN_ID;
use common::DATA_PATH_METADATA;
use metadata::accounts::CreateAccountRequest;
use metadata::error::MetadataError;
use metadata::MetadataProvider;
use platform::auth;
use platform::auth::password::make_password_hash;
use platform::PlatformProvider;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::select;
use tokio::signal::unix::SignalKind;
use tracing::debug;
use tracing::info;

use crate::error::Result;

pub async fn start(cfg: Config) -> Result<()> {
    debug!("db path: {:?}", cfg.data.path);

    fs::create_dir_all(cfg.data.path.join(DATA_PATH_METADATA))?;
    let rocks = Arc::new(metadata::rocksdb::new(
        cfg.data.path.join(DATA_PATH_METADATA),
    )?);
    let md = Arc::new(MetadataProvider::try_new(rocks)?);

    let admin_pwd = match md.accounts.get_by_id(ADMIN_ID) {
        Ok(_) => None,
        Err(MetadataError::NotFound(_)) => {
            let pwd: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(32)
                .map(char::from)
                .collect();
            info!("creating admin account...");
            md.accounts.create(CreateAccountRequest {
                created_by: None,
                username: "admin".to_string(),
                email: "admin@admin.com".to_string(),
                password_hash: make_password_hash(&pwd)?,
                role: Role::Admin,
                profile_image: None,
            })?;

            Some(pwd)
        }
        Err(other) => return Err(other.into()),
    };

    let auth_cfg = auth::Config {
        access_token_duration: cfg.auth.access_token_duration,
        access_token_key: non_empty_key(cfg.auth.access_token_key),
        refresh_token_duration: cfg.auth.refresh_token_duration,
        refresh_token_key: non_empty_key(cfg.auth.refresh_token_key),
    };
    let platform = Arc::new(PlatformProvider::new(&md, auth_cfg.clone()));

    let api = platform::http::attach_routes(Router::new(), &md, &platform, auth_cfg);
    let router = Router::new().nest("/api", api);

    let signal = async {
        let mut sig_int =
            tokio::signal::unix::signal(SignalKind::interrupt()).expect("failed to install signal");
        let mut sig_term =
            tokio::signal::unix::signal(SignalKind::terminate()).expect("failed to install signal");
        select! {
            _=sig_int.recv()=>info!("SIGINT received"),
            _=sig_term.recv()=>info!("SIGTERM received"),
        }
    };

    info!("listening on http://{}", cfg.server.host);
    if let Some(pwd) = admin_pwd {
        info!("login: admin");
        info!("password: {pwd}");
    }

    let listener = tokio::net::TcpListener::bind(cfg.server.host).await?;
    Ok(axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(signal)
    .await?)
}

// tokens signed with an empty secret would be forgeable
fn non_empty_key(key: String) -> String {
    if key.is_empty() {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    } else {
        key
    }
}
