//! Error types for content storage.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from publishing and fetching envelopes.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The storage network did not accept the upload.
    #[error("upload failed: {0}")]
    Upload(String),

    /// No content exists at the requested reference.
    #[error("content not found: {0}")]
    NotFound(String),

    /// Content exists but does not decode as an envelope.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// HTTP transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
