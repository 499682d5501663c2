use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, CommonError>;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("forbidden: {0:?}")]
    Forbidden(String),
    #[error("internal: {0:?}")]
    Internal(String),
}
