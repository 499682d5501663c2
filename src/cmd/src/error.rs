use std::result;

use chrono::OutOfRangeError;
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("bad request: {0:?}")]
    BadRequest(String),
    #[error("internal: {0:?}")]
    Internal(String),
    #[error("config: {0:?}")]
    Config(#[from] config::ConfigError),
    #[error("metadata: {0:?}")]
    Metadata(#[from] metadata::error::MetadataError),
    #[error("platform: {0:?}")]
    Platform(#[from] platform::PlatformError),
    #[error("set global default subscriber: {0:?}")]
    SetGlobalDefaultError(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("stdio: {0:?}")]
    StdIO(#[from] std::io::Error),
    #[error("time duration out of range: {0:?}")]
    TimeDurationOutOfRange(#[from] OutOfRangeError),
    #[error("parse duration: {0:?}")]
    ParseDuration(#[from] parse_duration::parse::Error),
    #[error("other: {0:?}")]
    Other(#[from] anyhow::Error),
}
