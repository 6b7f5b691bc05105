//! Error types for the key network client.

use thiserror::Error;

/// Errors from key network operations.
///
/// `Auth`, `Denied`, and `Integrity` are the network's own classifications
/// and are reported verbatim; the client never reinterprets one as
/// another. Policy evaluation strictly precedes integrity checking on the
/// network side, so `Denied` is never masked by `Integrity`.
#[derive(Debug, Error)]
pub enum KeynetError {
    /// The network could not be reached or the dial failed.
    #[error("key network unreachable: {0}")]
    Unreachable(String),

    /// Local sealing failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// The handshake was rejected or a presented credential was invalid,
    /// expired, or out of scope.
    #[error("authorization failed: {0}")]
    Auth(String),

    /// The conditions evaluated false for the proven address.
    #[error("access denied: {0}")]
    Denied(String),

    /// The ciphertext, hash, or policy binding failed verification.
    #[error("integrity check failed: {0}")]
    Integrity(String),

    /// Malformed or unexpected network traffic.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A payload expected to be text is not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8")]
    NotText(#[from] std::string::FromUtf8Error),
}

/// Result type for key network operations.
pub type Result<T> = std::result::Result<T, KeynetError>;
