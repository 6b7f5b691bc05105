//! The key-custody network abstraction.
//!
//! [`KeyNetwork`] is the seam between the client and a real network:
//! implemented over HTTP by [`crate::http::HttpNetwork`] and in-process by
//! [`crate::stub::StubNetwork`] for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::crypto::X25519PublicKey;
use crate::error::Result;
use crate::messages::{
    ChallengeId, DecryptRequest, SessionChallenge, SessionCredential, SessionRequest,
    SignInStatement,
};
use docseal_core::WalletSignature;

/// The chain every condition list is evaluated against.
pub const DEFAULT_CHAIN: &str = "ethereum";

/// What the network hands out when a connection is established.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// The network's X25519 key that payloads are sealed toward.
    pub sealing_key: X25519PublicKey,
    /// URI signed statements must be addressed to.
    pub session_uri: String,
    /// Chain the network evaluates conditions on.
    pub chain: String,
}

/// Client-side network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Chain conditions are written and evaluated against.
    pub chain: String,
}

impl NetworkConfig {
    pub fn new(chain: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN)
    }
}

/// A key-custody network the client can talk to.
///
/// All calls other than [`fetch_network_info`](Self::fetch_network_info)
/// assume an established connection; the handle in
/// [`crate::connection::NetworkHandle`] enforces that ordering.
#[async_trait]
pub trait KeyNetwork: Send + Sync {
    /// Dial the network and fetch its connection info.
    async fn fetch_network_info(&self) -> Result<NetworkInfo>;

    /// Handshake step one: request a session, receive a challenge.
    async fn begin_session(&self, request: &SessionRequest) -> Result<SessionChallenge>;

    /// Handshake step two: present the signed statement, receive a
    /// credential.
    async fn complete_session(
        &self,
        challenge_id: &ChallengeId,
        statement: &SignInStatement,
        signature: &WalletSignature,
    ) -> Result<SessionCredential>;

    /// Submit a sealed payload for decryption. The network re-verifies the
    /// credential and re-evaluates the conditions before opening anything.
    async fn open_sealed(&self, request: &DecryptRequest) -> Result<Vec<u8>>;

    /// Tear down network-side state. Called once per connection by the
    /// owning handle.
    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

// Lets independently-owned handles share one network client.
#[async_trait]
impl<N: KeyNetwork + ?Sized> KeyNetwork for std::sync::Arc<N> {
    async fn fetch_network_info(&self) -> Result<NetworkInfo> {
        (**self).fetch_network_info().await
    }

    async fn begin_session(&self, request: &SessionRequest) -> Result<SessionChallenge> {
        (**self).begin_session(request).await
    }

    async fn complete_session(
        &self,
        challenge_id: &ChallengeId,
        statement: &SignInStatement,
        signature: &WalletSignature,
    ) -> Result<SessionCredential> {
        (**self).complete_session(challenge_id, statement, signature).await
    }

    async fn open_sealed(&self, request: &DecryptRequest) -> Result<Vec<u8>> {
        (**self).open_sealed(request).await
    }

    async fn disconnect(&self) -> Result<()> {
        (**self).disconnect().await
    }
}
