//! Wallet signing keys and key-material parsing.
//!
//! Deployments configure the wallet as an opaque string: either a 64-char
//! hex private key (with or without a `0x` prefix) or a 12-24 word recovery
//! phrase. Parsing is deliberately lazy; callers hold the raw material and
//! construct a [`WalletSigner`] at the first operation that needs to sign,
//! so malformed configuration fails that operation rather than startup.

use ed25519_dalek::{Signer, SigningKey};
use std::fmt;

use crate::crypto::{ChainAddress, WalletPublicKey, WalletSignature};
use crate::error::ConfigError;

/// KDF context for turning a recovery phrase into a signing seed.
const PHRASE_SEED_CONTEXT: &str = "docseal/wallet-seed/v1";

/// An Ed25519 signing key acting as the wallet identity.
#[derive(Clone)]
pub struct WalletSigner {
    signing_key: SigningKey,
}

impl WalletSigner {
    /// Generate a new random signer.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Parse configured key material.
    ///
    /// Accepts 64 hex chars (optional `0x`/`0X` prefix) or a 12-24 word
    /// recovery phrase. Surrounding whitespace and quotes are stripped
    /// first; quoted values are a common artifact of env files. Phrases are
    /// normalized (lowercased, single-spaced) before seed derivation, so
    /// formatting differences do not change the wallet. No wordlist or
    /// checksum validation is applied.
    pub fn from_key_material(material: &str) -> Result<Self, ConfigError> {
        let trimmed = material.trim().trim_matches(|c| c == '"' || c == '\'');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingSigningKey);
        }

        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if hex_part.len() == 64 && hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            let bytes = hex::decode(hex_part)
                .map_err(|e| ConfigError::MalformedSigningKey(e.to_string()))?;
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&bytes);
            return Ok(Self::from_seed(&seed));
        }

        let words: Vec<&str> = trimmed.split_whitespace().collect();
        if (12..=24).contains(&words.len()) {
            let phrase = words.join(" ").to_lowercase();
            let seed = blake3::derive_key(PHRASE_SEED_CONTEXT, phrase.as_bytes());
            return Ok(Self::from_seed(&seed));
        }

        Err(ConfigError::MalformedSigningKey(format!(
            "expected 64 hex chars or a 12-24 word phrase, got {} word(s)",
            words.len()
        )))
    }

    /// Get the public key.
    pub fn public_key(&self) -> WalletPublicKey {
        WalletPublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Derive the wallet's chain address.
    pub fn address(&self) -> ChainAddress {
        self.public_key().to_address()
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> WalletSignature {
        let sig = self.signing_key.sign(message);
        WalletSignature(sig.to_bytes())
    }
}

impl fmt::Debug for WalletSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletSigner({:?})", self.address())
    }
}
