//! Configuration-level error type.
//!
//! Subsystem crates keep their own error enums; `DdError` covers what
//! happens before any subsystem exists (loading and validating settings).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DdError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DdResult<T> = Result<T, DdError>;
