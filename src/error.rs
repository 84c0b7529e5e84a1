//! Error types for Bucle

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("callback `{name}` failed: {reason}")]
    Callback { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
