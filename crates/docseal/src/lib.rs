//! # Docseal
//!
//! The unified API for sealed document exchange - encrypt under
//! wallet-gated conditions, publish, fetch, decrypt.
//!
//! ## Overview
//!
//! Docseal provides the encrypted-document core of a contract-signing
//! flow:
//!
//! - **Policies**: Condition lists naming who may unseal a document
//! - **Sealing**: Local encryption toward a key-custody network, bound to
//!   the policy and the plaintext hash
//! - **Publishing**: Envelopes uploaded to a public gateway under the
//!   sender's signing identity
//! - **Unsealing**: A fresh authorization handshake and a network-side
//!   policy re-evaluation on every fetch
//!
//! ## Key Concepts
//!
//! - **Envelope**: Ciphertext, plaintext hash, and the conditions, stored
//!   as one public JSON document. Possession reveals nothing.
//! - **Credential**: Short-lived proof of wallet control. Never stored.
//! - **Fail-fast**: The first failing stage aborts the operation. No
//!   retries, no partial results.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docseal::{Pipeline, PipelineConfig};
//! use docseal::keynet::StubNetwork;
//! use docseal::store::MemoryGateway;
//! use docseal::core::DocumentMeta;
//!
//! async fn example() {
//!     let config = PipelineConfig::from_env();
//!     let pipeline = Pipeline::new(StubNetwork::new(), MemoryGateway::new(), config);
//!
//!     let recipient = "0x0011223344556677889900112233445566778899".parse().unwrap();
//!     let reference = pipeline
//!         .seal_for(&recipient, b"agreement text", &DocumentMeta::for_file("agreement.pdf"))
//!         .await
//!         .unwrap();
//!
//!     // The recipient's own pipeline can now fetch and unseal it
//!     // let document = pipeline.fetch_and_unseal(&reference).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `docseal::core` - Policies, envelopes, wallet signing
//! - `docseal::keynet` - Key network client, sessions, sealing
//! - `docseal::store` - Envelope upload and retrieval

pub mod error;
pub mod pipeline;

// Re-export component crates
pub use docseal_core as core;
pub use docseal_keynet as keynet;
pub use docseal_store as store;

// Re-export main types for convenience
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, PipelineConfig, UnsealedDocument, CHAIN_ENV, SIGNING_KEY_ENV};

// Re-export commonly used core types
pub use docseal_core::{
    AccessPolicy, ChainAddress, ContentReference, DocumentMeta, EncryptedEnvelope, WalletSigner,
};
