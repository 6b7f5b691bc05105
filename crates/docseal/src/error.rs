//! Error types for the pipeline.

use docseal_core::ConfigError;
use docseal_keynet::KeynetError;
use docseal_store::StoreError;
use thiserror::Error;

/// Errors that can occur during pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Signing key missing or malformed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Key network error: connectivity, sessions, decryption.
    #[error("key network error: {0}")]
    Network(#[from] KeynetError),

    /// Storage error: upload, retrieval, envelope decoding.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// A pipeline stage did not finish within the call timeout.
    #[error("{stage} timed out after {after:?}")]
    Timeout {
        stage: &'static str,
        after: std::time::Duration,
    },
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
