//! Error types for the docseal core.

use thiserror::Error;

/// Errors from core data-model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid chain address: {0}")]
    InvalidAddress(String),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,
}

/// Signing-key configuration problems.
///
/// Key material is carried raw in configuration and parsed lazily, so these
/// surface at the first operation that needs a signature, not at startup.
/// Messages describe the shape problem and never echo the material itself.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No signing key was configured.
    #[error("signing key is not configured")]
    MissingSigningKey,

    /// The configured material is neither a 64-char hex key nor a
    /// 12-24 word recovery phrase.
    #[error("malformed signing key: {0}")]
    MalformedSigningKey(String),
}
