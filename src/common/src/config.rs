use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Server {
    pub host: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct Data {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub access_token_duration: Duration,
    pub access_token_key: String,
    pub refresh_token_duration: Duration,
    pub refresh_token_key: String,
}

#[derive(Debug, Clone)]
pub struct Log {
    pub level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: Server,
    pub data: Data,
    pub auth: Auth,
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: Server {
                host: SocketAddr::from_str("0.0.0.0:8080").unwrap(),
            },
            data: Data {
                path: Default::default(),
            },
            auth: Auth {
                access_token_duration: Duration::hours(1),
                access_token_key: "".to_string(),
                refresh_token_duration: Duration::days(30),
                refresh_token_key: "".to_string(),
            },
            log: Log {
                level: LevelFilter::INFO,
            },
        }
    }
}
