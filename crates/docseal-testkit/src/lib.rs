//! # Docseal Testkit
//!
//! Testing utilities for docseal.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: pinned wire forms for the policy JSON every envelope carries
//! - **Generators**: proptest strategies for property-based testing
//! - **Fixtures**: an in-process rig wiring pipelines to stub backends
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the policy wire format and digests:
//!
//! ```rust
//! use docseal_testkit::vectors::{all_vectors, policy_from_vector};
//!
//! for vector in all_vectors() {
//!     let policy = policy_from_vector(&vector);
//!     println!("{}: {}", vector.name, policy.digest().to_hex());
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use docseal_testkit::generators::SealParams;
//!
//! proptest! {
//!     #[test]
//!     fn policy_digest_is_deterministic(params: SealParams) {
//!         prop_assert_eq!(params.policy().digest(), params.policy().digest());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly wire up a two-party scenario:
//!
//! ```rust,no_run
//! use docseal_testkit::fixtures::{party_signer, TestRig};
//!
//! # async fn exchange() -> docseal::Result<()> {
//! let rig = TestRig::new();
//! let sender = rig.party(1);
//! let reference = sender
//!     .seal_text_for(&party_signer(2).address(), "the agreement")
//!     .await?;
//! let text = rig.party(2).unseal_text(&reference).await?;
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_signers, party_key, party_signer, RigPipeline, TestRig};
pub use generators::SealParams;
pub use vectors::{
    all_vectors, envelope_from_vector, policy_from_vector, verify_all_vectors, GoldenVector,
};
