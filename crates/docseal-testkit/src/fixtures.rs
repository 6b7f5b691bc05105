//! Test fixtures and helpers.
//!
//! Common setup code for pipeline tests. A [`TestRig`] wires one
//! in-process key network and one in-memory gateway to as many pipelines
//! as a test needs; parties built from the same rig share the network
//! sealing key, so a document sealed by one party opens for another
//! whenever the policy admits it.

use std::sync::Arc;

use docseal::{Pipeline, PipelineConfig};
use docseal_core::WalletSigner;
use docseal_keynet::StubNetwork;
use docseal_store::MemoryGateway;
use rand::RngCore;

/// A pipeline wired to the rig's shared network and gateway.
pub type RigPipeline = Pipeline<Arc<StubNetwork>, Arc<MemoryGateway>>;

/// A test rig with a shared key network and gateway.
pub struct TestRig {
    network: Arc<StubNetwork>,
    gateway: Arc<MemoryGateway>,
}

impl TestRig {
    /// Create a new rig with random network keys.
    pub fn new() -> Self {
        Self::from_network(StubNetwork::new())
    }

    /// Create with deterministic network keys from a seed.
    ///
    /// Rigs built from the same seed accept each other's ciphertexts.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_network(StubNetwork::with_seed(seed))
    }

    /// Create around a preconfigured network.
    pub fn from_network(network: StubNetwork) -> Self {
        Self {
            network: Arc::new(network),
            gateway: Arc::new(MemoryGateway::new()),
        }
    }

    /// The shared key network.
    pub fn network(&self) -> &Arc<StubNetwork> {
        &self.network
    }

    /// The shared gateway.
    pub fn gateway(&self) -> &Arc<MemoryGateway> {
        &self.gateway
    }

    /// A pipeline for one party, from raw signing-key material.
    pub fn pipeline(&self, signing_key: impl Into<String>) -> RigPipeline {
        self.pipeline_with(PipelineConfig::default().with_signing_key(signing_key))
    }

    /// A pipeline with explicit configuration.
    pub fn pipeline_with(&self, config: PipelineConfig) -> RigPipeline {
        Pipeline::new(Arc::clone(&self.network), Arc::clone(&self.gateway), config)
    }

    /// A pipeline for the numbered party.
    ///
    /// The same index always yields the same wallet; [`party_signer`]
    /// gives the matching signer.
    pub fn party(&self, index: u8) -> RigPipeline {
        self.pipeline(party_key(index))
    }
}

impl Default for TestRig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hex signing-key material for the numbered party wallet.
pub fn party_key(index: u8) -> String {
    hex::encode([index; 32])
}

/// The wallet signer behind [`party_key`].
pub fn party_signer(index: u8) -> WalletSigner {
    WalletSigner::from_seed(&[index; 32])
}

/// Create deterministic signers for multi-party tests.
pub fn multi_party_signers(count: usize) -> Vec<WalletSigner> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            WalletSigner::from_seed(&seed)
        })
        .collect()
}

/// Random document bytes of the given length.
pub fn random_document(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}
