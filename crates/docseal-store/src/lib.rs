//! # Docseal Store
//!
//! Content storage for sealed envelopes. Provides a trait-based interface
//! for publishing and fetching with gateway and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts envelope storage behind the [`ContentStore`]
//! trait, keeping the pipeline storage-agnostic. The primary
//! implementation is [`GatewayStore`], with [`MemoryGateway`] for testing.
//!
//! ## Key Types
//!
//! - [`ContentStore`] - The async trait for upload and retrieval
//! - [`GatewayStore`] - Bundler uploads, public gateway retrieval
//! - [`MemoryGateway`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docseal_store::{envelope_tags, ContentStore, GatewayStore};
//! use docseal_core::{AccessPolicy, DocumentMeta, EncryptedEnvelope, WalletSigner};
//!
//! async fn example() {
//!     let store = GatewayStore::new();
//!     let signer = WalletSigner::generate();
//!     let meta = DocumentMeta::for_file("agreement.pdf");
//!
//!     let policy = AccessPolicy::single_recipient(&signer.address(), "ethereum");
//!     let envelope = EncryptedEnvelope::new("00ff".into(), "aa".repeat(32), policy, &meta);
//!     let reference = store
//!         .upload(&envelope, &envelope_tags(&meta), &signer)
//!         .await
//!         .unwrap();
//!     let fetched = store.retrieve(&reference).await.unwrap();
//!     assert_eq!(fetched, envelope);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Byte-identical retrieval**: what was uploaded is what comes back
//! - **Tags are metadata only**: they never change the stored bytes
//! - **Closed error set**: upload failure, not found, malformed envelope,
//!   transport

pub mod error;
pub mod gateway;
pub mod memory;
pub mod tags;
pub mod traits;

pub use error::{Result, StoreError};
pub use gateway::{GatewayStore, DEFAULT_BUNDLER_URL, DEFAULT_GATEWAY_PREFIX};
pub use memory::MemoryGateway;
pub use tags::{
    envelope_tags, CONTENT_TYPE_TAG, DOCUMENT_TYPE_TAG, ENVELOPE_CONTENT_TYPE, FILE_NAME_TAG,
};
pub use traits::ContentStore;
