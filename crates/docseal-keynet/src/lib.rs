//! # Docseal Keynet
//!
//! Client for the key-custody network that holds decryption authority
//! over sealed documents.
//!
//! ## Overview
//!
//! Sealing happens locally: a connected client seals payloads toward the
//! network's sealing key, bound to an access-condition list and the
//! plaintext hash. Opening is a network call. The client presents a
//! session credential and the network re-verifies it, re-evaluates the
//! conditions, and only then opens the payload. Encryption therefore
//! needs connectivity only; decryption needs authorization.
//!
//! ## Key Concepts
//!
//! - **NetworkHandle**: Owns a network client and its at-most-one
//!   connection
//! - **SessionCredential**: Proof of wallet control, attested by the
//!   network, scoped to condition lists
//! - **SealedBox**: The hybrid-sealed unit an envelope's ciphertext
//!   decodes to
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docseal_keynet::{
//!     encrypt, establish, NetworkConfig, NetworkHandle, SessionScope, StubNetwork,
//! };
//! use docseal_core::{AccessPolicy, WalletSigner};
//!
//! async fn example() {
//!     let handle = NetworkHandle::new(StubNetwork::new(), NetworkConfig::default());
//!     let signer = WalletSigner::generate();
//!     let policy = AccessPolicy::single_recipient(&signer.address(), handle.chain());
//!
//!     let sealed = encrypt(&handle, &policy, b"agreement text").await.unwrap();
//!
//!     let credential = establish(&handle, &signer, SessionScope::any_conditions())
//!         .await
//!         .unwrap();
//!     // let opened = decrypt(&handle, &envelope, &credential).await.unwrap();
//! }
//! ```

pub mod cipher;
pub mod connection;
pub mod crypto;
pub mod error;
pub mod http;
pub mod messages;
pub mod network;
pub mod session;
pub mod stub;

pub use cipher::{decrypt, decrypt_text, encrypt, encrypt_text, SealedPayload};
pub use connection::NetworkHandle;
pub use error::{KeynetError, Result};
pub use http::HttpNetwork;
pub use messages::{
    Ability, ChallengeId, CredentialTag, DecryptRequest, ResourceAbility, ResourcePattern,
    SessionChallenge, SessionCredential, SessionRequest, SignInStatement,
};
pub use network::{KeyNetwork, NetworkConfig, NetworkInfo, DEFAULT_CHAIN};
pub use session::{establish, SessionScope};
pub use stub::StubNetwork;
