use thiserror::Error;

/// Errors produced by grain type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("payload load failed: {0}")]
    Load(String),
}
