//! Error types for the comparison crate.
//!
//! Mismatches between grains are never errors; they are recorded as
//! failing nodes in the result tree. These errors cover misuse of the API
//! and inputs the engine cannot interpret.

/// Errors that can occur while configuring or querying comparisons.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompareError {
    /// Options were combined or configured inconsistently.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An option path does not start with a known grain field.
    #[error("unknown grain field in option path '{0}'")]
    UnknownField(String),

    /// A child node was requested by a field name it does not have.
    #[error("no such field: {0}")]
    NoSuchField(String),

    /// A child node was requested by a container key it does not have.
    #[error("key not found: {0}")]
    NoSuchKey(String),

    /// PSNR has no definition for the grain type or payload format.
    #[error("PSNR not supported: {0}")]
    UnsupportedPsnr(String),

    /// The grains are PSNR-comparable in principle but their payloads
    /// cannot be decoded as described by their metadata.
    #[error("PSNR input error: {0}")]
    PsnrInput(String),

    /// A word layout for the binary differ is not decodable.
    #[error("invalid word layout: {0}")]
    InvalidWordSpec(String),

    /// Configuration text failed to parse.
    #[error("config parse error: {0}")]
    ConfigParse(String),
}

/// Convenience alias for comparison results.
pub type CompareResult<T> = Result<T, CompareError>;
