use std::collections::BTreeMap;
use std::result;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use common::error::CommonError;
use common::http::ApiError;
use metadata::error::MetadataError;
use thiserror::Error;

pub type Result<T> = result::Result<T, PlatformError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("invalid reset token")]
    InvalidResetToken,
    #[error("password hashing error")]
    InvalidPasswordHashing,
    #[error("can't make access token")]
    CantMakeAccessToken,
    #[error("can't make refresh token")]
    CantMakeRefreshToken,
    #[error("can't parse bearer header")]
    CantParseBearerHeader,
    #[error("can't parse access token")]
    CantParseAccessToken,
}

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("{1:?} error wrapped into {0:?}")]
    Wrapped(Box<PlatformError>, Box<PlatformError>),
    #[error("invalid fields")]
    InvalidFields(BTreeMap<String, String>),
    #[error("bad request: {0:?}")]
    BadRequest(String),
    #[error("unauthorized: {0:?}")]
    Unauthorized(String),
    #[error("forbidden: {0:?}")]
    Forbidden(String),
    #[error("not found: {0:?}")]
    NotFound(String),
    #[error("already exists: {0:?}")]
    AlreadyExists(String),
    #[error("internal: {0:?}")]
    Internal(String),
    #[error("serde: {0:?}")]
    Serde(#[from] serde_json::Error),
    #[error("password hash")]
    PasswordHash(#[from] password_hash::Error),
    #[error("jsonwebtoken: {0:?}")]
    JSONWebToken(#[from] jsonwebtoken::errors::Error),
    #[error("metadata: {0:?}")]
    Metadata(#[from] MetadataError),
    #[error("common: {0:?}")]
    Common(#[from] CommonError),
    #[error("auth: {0:?}")]
    Auth(#[from] AuthError),
    #[error("axum: {0:?}")]
    Axum(#[from] axum::http::Error),
    #[error("other: {0:?}")]
    Other(#[from] anyhow::Error),
}

impl PlatformError {
    pub fn invalid_field(field: impl Into<String>, err: impl Into<String>) -> Self {
        PlatformError::InvalidFields(BTreeMap::from([(field.into(), err.into())]))
    }

    pub fn wrap_into(self, err: impl Into<PlatformError>) -> PlatformError {
        PlatformError::Wrapped(Box::new(self), Box::new(err.into()))
    }

    pub fn into_api_error(self) -> ApiError {
        match self {
            PlatformError::Serde(err) => ApiError::bad_request(err.to_string()),
            PlatformError::Metadata(err) => match err {
                MetadataError::AlreadyExists(_) => ApiError::conflict(err.to_string()),
                MetadataError::NotFound(_) => ApiError::not_found(err.to_string()),
                MetadataError::Internal(_) => ApiError::internal(err.to_string()),
                MetadataError::Common(ref inner) => match inner {
                    CommonError::Forbidden(_) => ApiError::forbidden(err.to_string()),
                    CommonError::Internal(_) => ApiError::internal(err.to_string()),
                },
                MetadataError::RocksDb(err) => ApiError::internal(err.to_string()),
                MetadataError::FromUtf8(err) => ApiError::internal(err.to_string()),
                MetadataError::Bincode(err) => ApiError::internal(err.to_string()),
                MetadataError::Io(err) => ApiError::internal(err.to_string()),
                MetadataError::Other(_) => ApiError::internal(err.to_string()),
            },
            PlatformError::Common(err) => match err {
                CommonError::Forbidden(_) => ApiError::forbidden(err.to_string()),
                CommonError::Internal(_) => ApiError::internal(err.to_string()),
            },
            PlatformError::Auth(err) => match err {
                AuthError::InvalidCredentials => ApiError::unauthorized(err),
                AuthError::InvalidRefreshToken => ApiError::unauthorized(err),
                AuthError::InvalidResetToken => ApiError::unauthorized(err),
                AuthError::InvalidPasswordHashing => ApiError::internal(err),
                AuthError::CantMakeAccessToken => ApiError::internal(err),
                AuthError::CantMakeRefreshToken => ApiError::internal(err),
                AuthError::CantParseBearerHeader => ApiError::unauthorized(err),
                AuthError::CantParseAccessToken => ApiError::unauthorized(err),
            },
            PlatformError::BadRequest(msg) => ApiError::bad_request(msg),
            PlatformError::Unauthorized(msg) => ApiError::unauthorized(msg),
            PlatformError::Forbidden(msg) => ApiError::forbidden(msg),
            PlatformError::NotFound(msg) => ApiError::not_found(msg),
            PlatformError::AlreadyExists(msg) => ApiError::conflict(msg),
            PlatformError::Internal(msg) => ApiError::internal(msg),
            PlatformError::PasswordHash(err) => ApiError::internal(err.to_string()),
            PlatformError::JSONWebToken(err) => ApiError::internal(err.to_string()),
            PlatformError::Axum(err) => ApiError::internal(err.to_string()),
            PlatformError::Other(err) => ApiError::internal(err.to_string()),
            PlatformError::Wrapped(_, outer) => outer.into_api_error(),
            PlatformError::InvalidFields(fields) => {
                ApiError::new(StatusCode::BAD_REQUEST).with_fields(fields)
            }
        }
    }
}

#[derive(Default)]
pub struct ValidationError {
    fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, err: impl Into<String>) {
        self.fields.insert(field.into(), err.into());
    }

    pub fn push_invalid(&mut self, field: impl Into<String>) {
        self.fields
            .insert(field.into(), "invalid field value".into());
    }

    pub fn result(self) -> Result<()> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(PlatformError::InvalidFields(self.fields))
        }
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        self.into_api_error().into_response()
    }
}
