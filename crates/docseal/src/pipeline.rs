//! The pipeline: seal and publish, fetch and unseal.
//!
//! Brings the key network and the content store together behind one
//! object. Every operation is fail-fast: the first failing stage aborts
//! the call, nothing is retried, and partial progress is never hidden.

use std::future::Future;
use std::time::Duration;

use docseal_core::{
    AccessPolicy, ChainAddress, ConfigError, ContentReference, DocumentMeta, EncryptedEnvelope,
    WalletSigner,
};
use docseal_keynet::{
    cipher, establish, KeyNetwork, KeynetError, NetworkConfig, NetworkHandle, SessionScope,
    DEFAULT_CHAIN,
};
use docseal_store::{envelope_tags, ContentStore};

use crate::error::{PipelineError, Result};

/// Environment variable the signing key is read from.
pub const SIGNING_KEY_ENV: &str = "DOCSEAL_SIGNING_KEY";
/// Environment variable overriding the condition chain.
pub const CHAIN_ENV: &str = "DOCSEAL_CHAIN";

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Signing key material: 64 hex chars with optional `0x`, or a 12 to
    /// 24 word recovery phrase. Not validated until first use.
    pub signing_key: Option<String>,
    /// Chain conditions are written and evaluated against.
    pub chain: String,
    /// Timeout applied to each network and storage call.
    pub call_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            signing_key: None,
            chain: DEFAULT_CHAIN.to_string(),
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl PipelineConfig {
    /// Read configuration from the environment.
    ///
    /// A missing key variable leaves the key unset; the failure surfaces
    /// at the first operation that needs to sign, not here.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var(SIGNING_KEY_ENV) {
            config.signing_key = Some(key);
        }
        if let Ok(chain) = std::env::var(CHAIN_ENV) {
            config.chain = chain;
        }
        config
    }

    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(key.into());
        self
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = chain.into();
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Build the wallet signer from the configured key material.
    ///
    /// This is where key problems surface: a pipeline with a bad key
    /// constructs fine and fails here.
    pub fn signer(&self) -> Result<WalletSigner> {
        let material = self
            .signing_key
            .as_deref()
            .ok_or(ConfigError::MissingSigningKey)?;
        Ok(WalletSigner::from_key_material(material)?)
    }
}

/// What unsealing returns: the document plus whatever metadata the
/// envelope carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsealedDocument {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// The main pipeline struct.
///
/// Owns its network handle (and therefore the connect-once lifecycle)
/// and its content store. There is no ambient global: two pipelines are
/// two independent clients.
pub struct Pipeline<N: KeyNetwork, S: ContentStore> {
    network: NetworkHandle<N>,
    store: S,
    config: PipelineConfig,
}

impl<N: KeyNetwork, S: ContentStore> Pipeline<N, S> {
    /// Create a new pipeline instance.
    pub fn new(network: N, store: S, config: PipelineConfig) -> Self {
        let handle = NetworkHandle::new(network, NetworkConfig::new(config.chain.clone()));
        Self {
            network: handle,
            store,
            config,
        }
    }

    /// The address this pipeline signs and publishes under.
    pub fn address(&self) -> Result<ChainAddress> {
        Ok(self.config.signer()?.address())
    }

    /// The network handle.
    pub fn network(&self) -> &NetworkHandle<N> {
        &self.network
    }

    /// The store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Seal and Publish
    // ─────────────────────────────────────────────────────────────────────────

    /// Seal a document under a condition list and publish the envelope.
    ///
    /// Stages run in order: seal toward the network's key, assemble the
    /// envelope, resolve the signer, upload. Returns the reference the
    /// envelope is retrievable at.
    pub async fn seal_and_publish(
        &self,
        policy: &AccessPolicy,
        document: &[u8],
        meta: &DocumentMeta,
    ) -> Result<ContentReference> {
        let sealed = self
            .bounded("encrypt", cipher::encrypt(&self.network, policy, document))
            .await?;
        let envelope = EncryptedEnvelope::new(
            sealed.cipher_text,
            sealed.data_to_encrypt_hash,
            policy.clone(),
            meta,
        );
        let signer = self.config.signer()?;
        let tags = envelope_tags(meta);
        let reference = self
            .bounded("upload", self.store.upload(&envelope, &tags, &signer))
            .await?;
        tracing::info!("Published sealed document as {}", reference);
        Ok(reference)
    }

    /// Seal a document readable by exactly one recipient address.
    pub async fn seal_for(
        &self,
        recipient: &ChainAddress,
        document: &[u8],
        meta: &DocumentMeta,
    ) -> Result<ContentReference> {
        let policy = AccessPolicy::single_recipient(recipient, self.network.chain());
        self.seal_and_publish(&policy, document, meta).await
    }

    /// Seal text readable by exactly one recipient address.
    pub async fn seal_text_for(
        &self,
        recipient: &ChainAddress,
        text: &str,
    ) -> Result<ContentReference> {
        let meta = DocumentMeta::default().with_content_type("text/plain");
        self.seal_for(recipient, text.as_bytes(), &meta).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fetch and Unseal
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch an envelope and unseal it.
    ///
    /// Runs a fresh authorization handshake scoped to the envelope's own
    /// condition list; the network re-evaluates access on every call.
    pub async fn fetch_and_unseal(&self, reference: &ContentReference) -> Result<UnsealedDocument> {
        let envelope = self
            .bounded("retrieve", self.store.retrieve(reference))
            .await?;
        let signer = self.config.signer()?;
        let digest = envelope.access_control_conditions.digest();
        let credential = self
            .bounded(
                "session",
                establish(&self.network, &signer, SessionScope::for_conditions(&digest)),
            )
            .await?;
        let bytes = self
            .bounded(
                "decrypt",
                cipher::decrypt(&self.network, &envelope, &credential),
            )
            .await?;
        Ok(UnsealedDocument {
            bytes,
            file_name: envelope.file_name,
            content_type: envelope.content_type,
        })
    }

    /// Fetch and unseal a text document.
    pub async fn unseal_text(&self, reference: &ContentReference) -> Result<String> {
        let document = self.fetch_and_unseal(reference).await?;
        Ok(String::from_utf8(document.bytes).map_err(KeynetError::from)?)
    }

    /// Drop the network connection. A later operation reconnects.
    pub async fn shutdown(&self) -> Result<()> {
        Ok(self.network.shutdown().await?)
    }

    /// Run one stage under the call timeout.
    async fn bounded<T, E, F>(&self, stage: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        PipelineError: From<E>,
    {
        match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(PipelineError::Timeout {
                stage,
                after: self.config.call_timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.chain, "ethereum");
        assert_eq!(config.call_timeout, Duration::from_secs(30));
        assert!(config.signing_key.is_none());
    }

    #[test]
    fn test_missing_key_fails_as_config_error() {
        let config = PipelineConfig::default();
        let err = config.signer().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Config(ConfigError::MissingSigningKey)
        ));
    }

    #[test]
    fn test_malformed_key_fails_as_config_error() {
        let config = PipelineConfig::default().with_signing_key("not-a-key");
        let err = config.signer().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Config(ConfigError::MalformedSigningKey(_))
        ));
    }

    #[test]
    fn test_hex_and_phrase_keys_build_signers() {
        let hex_key = format!("0x{}", "ab".repeat(32));
        let config = PipelineConfig::default().with_signing_key(hex_key);
        config.signer().unwrap();

        let phrase = "legal vintage frown pioneer twin brush first \
                      spell rural stereo rent tortoise";
        let config = PipelineConfig::default().with_signing_key(phrase);
        config.signer().unwrap();
    }

    // Serializes tests touching process environment variables.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_from_env_reads_key_and_chain() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(SIGNING_KEY_ENV, "ab".repeat(32));
        std::env::set_var(CHAIN_ENV, "sepolia");

        let config = PipelineConfig::from_env();

        std::env::remove_var(SIGNING_KEY_ENV);
        std::env::remove_var(CHAIN_ENV);

        assert_eq!(config.signing_key.as_deref(), Some("ab".repeat(32).as_str()));
        assert_eq!(config.chain, "sepolia");
    }
}
