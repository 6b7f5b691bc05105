//! # docseal core
//!
//! Pure data model for the docseal pipeline: wallet keys and addresses,
//! access-control policies, and the envelope format published to the
//! content gateway.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`WalletSigner`] - Ed25519 signing key parsed from configured material
//! - [`ChainAddress`] - 20-byte address derived from a wallet public key
//! - [`AccessPolicy`] - ordered condition list gating decryption
//! - [`EncryptedEnvelope`] - the JSON document published to the gateway
//! - [`ContentReference`] - opaque gateway transaction id

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod policy;
pub mod signer;
pub mod types;

pub use crypto::{Blake3Hash, ChainAddress, WalletPublicKey, WalletSignature};
pub use envelope::EncryptedEnvelope;
pub use error::{ConfigError, CoreError};
pub use policy::{
    AccessControlCondition, AccessPolicy, Comparator, ReturnValueTest, CALLER_ADDRESS_PLACEHOLDER,
};
pub use signer::WalletSigner;
pub use types::{guess_content_type, ContentReference, DocumentMeta, Tag};
