//! Sealing cryptography for the key network.
//!
//! Provides X25519 key agreement and ChaCha20-Poly1305 authenticated
//! encryption, plus the hybrid [`SealedBox`] layout every ciphertext
//! decodes to. Both AEAD layers carry the policy digest and plaintext
//! hash as associated data, so a sealed box only opens with the exact
//! policy and hash it was produced with.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

use docseal_core::Blake3Hash;

use crate::error::{KeynetError, Result};

/// KDF context for deriving wrap keys from X25519 shared secrets.
const SEALING_KDF_CONTEXT: &str = "docseal-keynet-v1-sealing";

/// An X25519 public key (32 bytes).
///
/// Serializes as a hex string; it appears in JSON network-info bodies.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct X25519PublicKey(pub [u8; 32]);

impl X25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes =
            hex::decode(s).map_err(|e| KeynetError::Protocol(format!("bad key hex: {e}")))?;
        if bytes.len() != 32 {
            return Err(KeynetError::Protocol(format!(
                "expected 32-byte key, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Convert to x25519-dalek PublicKey.
    pub fn to_dalek(&self) -> PublicKey {
        PublicKey::from(self.0)
    }
}

impl From<PublicKey> for X25519PublicKey {
    fn from(pk: PublicKey) -> Self {
        Self(*pk.as_bytes())
    }
}

impl fmt::Debug for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519Pub({})", &self.to_hex()[..16])
    }
}

impl Serialize for X25519PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for X25519PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// An X25519 static secret (the network's long-lived sealing secret).
///
/// Unlike Ed25519 wallet keys, X25519 keys are only for key agreement,
/// never signing.
pub struct X25519StaticSecret(StaticSecret);

impl X25519StaticSecret {
    /// Generate a new random secret.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(StaticSecret::from(bytes))
    }

    /// Create from seed bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    /// Derive the public key.
    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey::from(PublicKey::from(&self.0))
    }

    /// Perform key agreement with a peer's public key.
    pub fn diffie_hellman(&self, peer_public: &X25519PublicKey) -> SharedKey {
        let shared = self.0.diffie_hellman(&peer_public.to_dalek());
        SharedKey(*shared.as_bytes())
    }
}

/// A shared secret derived from X25519 key agreement.
#[derive(Clone)]
pub struct SharedKey([u8; 32]);

impl SharedKey {
    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive a wrap key from this shared secret.
    ///
    /// The context binds the derived key to a particular use; sealing
    /// passes the policy digest here so the wrap key itself depends on
    /// the policy.
    pub fn derive_sealing_key(&self, context: &[u8]) -> EncryptionKey {
        use blake3::Hasher;
        let mut hasher = Hasher::new_derive_key(SEALING_KDF_CONTEXT);
        hasher.update(&self.0);
        hasher.update(context);
        EncryptionKey(*hasher.finalize().as_bytes())
    }
}

/// A 256-bit symmetric key for ChaCha20-Poly1305.
#[derive(Clone)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encrypt with this key, binding the associated data.
    pub fn seal(&self, plaintext: &[u8], nonce: &EncryptionNonce, aad: &[u8]) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| KeynetError::Encryption(e.to_string()))?;

        let nonce = Nonce::from_slice(&nonce.0);
        cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|e| KeynetError::Encryption(e.to_string()))
    }

    /// Decrypt with this key.
    ///
    /// Fails as an integrity error: a failed open means the ciphertext,
    /// key, nonce, or associated data is not what was sealed.
    pub fn open(&self, ciphertext: &[u8], nonce: &EncryptionNonce, aad: &[u8]) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| KeynetError::Integrity(e.to_string()))?;

        let nonce = Nonce::from_slice(&nonce.0);
        cipher
            .decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad,
                },
            )
            .map_err(|_| KeynetError::Integrity("authenticated decryption failed".into()))
    }
}

/// A 96-bit nonce for ChaCha20-Poly1305.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionNonce(pub [u8; 12]);

impl EncryptionNonce {
    /// Generate a new random nonce.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 12];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

/// Ephemeral key pair for one-time key agreement.
pub struct EphemeralKeyPair {
    secret: EphemeralSecret,
    public: X25519PublicKey,
}

impl EphemeralKeyPair {
    /// Generate a new ephemeral key pair.
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random_from_rng(rand::thread_rng());
        let public = X25519PublicKey::from(PublicKey::from(&secret));
        Self { secret, public }
    }

    /// Get the public key.
    pub fn public_key(&self) -> X25519PublicKey {
        self.public
    }

    /// Perform key agreement with a peer's public key.
    ///
    /// Consumes the ephemeral secret (can only be used once).
    pub fn diffie_hellman(self, peer_public: &X25519PublicKey) -> SharedKey {
        let shared = self.secret.diffie_hellman(&peer_public.to_dalek());
        SharedKey(*shared.as_bytes())
    }
}

/// The pair of values a sealed box is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealingBinding {
    /// Digest of the exact condition list in force.
    pub policy_digest: Blake3Hash,
    /// Blake3 hash of the plaintext.
    pub data_hash: Blake3Hash,
}

impl SealingBinding {
    pub fn new(policy_digest: Blake3Hash, data_hash: Blake3Hash) -> Self {
        Self {
            policy_digest,
            data_hash,
        }
    }

    /// Associated data for both AEAD layers.
    pub fn aad_bytes(&self) -> Vec<u8> {
        [
            self.policy_digest.as_bytes().as_slice(),
            self.data_hash.as_bytes().as_slice(),
        ]
        .concat()
    }
}

/// Version discriminator for the sealed-box layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SealingFormat {
    /// X25519 agreement + ChaCha20-Poly1305, policy-bound associated data.
    X25519ChaCha20Poly1305V1,
}

/// The opaque unit a ciphertext string decodes to.
///
/// Hybrid layout: the payload is encrypted under a fresh content key, and
/// the content key is encrypted under a key agreed between an ephemeral
/// secret and the network's sealing key. The wrap-key KDF context and both
/// AEAD associated-data slots carry the [`SealingBinding`], so a box
/// sealed for one policy and hash cannot be opened with any other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedBox {
    pub format: SealingFormat,
    pub ephemeral_public: X25519PublicKey,
    pub key_nonce: EncryptionNonce,
    pub wrapped_key: Vec<u8>,
    pub payload_nonce: EncryptionNonce,
    pub payload: Vec<u8>,
}

impl SealedBox {
    /// Seal plaintext toward the network's sealing key.
    pub fn seal(
        sealing_key: &X25519PublicKey,
        binding: &SealingBinding,
        plaintext: &[u8],
    ) -> Result<Self> {
        let aad = binding.aad_bytes();

        let content_key = EncryptionKey::generate();
        let payload_nonce = EncryptionNonce::generate();
        let payload = content_key.seal(plaintext, &payload_nonce, &aad)?;

        let ephemeral = EphemeralKeyPair::generate();
        let ephemeral_public = ephemeral.public_key();
        let shared = ephemeral.diffie_hellman(sealing_key);
        let wrap_key = shared.derive_sealing_key(binding.policy_digest.as_bytes());
        let key_nonce = EncryptionNonce::generate();
        let wrapped_key = wrap_key.seal(content_key.as_bytes(), &key_nonce, &aad)?;

        Ok(Self {
            format: SealingFormat::X25519ChaCha20Poly1305V1,
            ephemeral_public,
            key_nonce,
            wrapped_key,
            payload_nonce,
            payload,
        })
    }

    /// Open with the network's static secret.
    ///
    /// Every failure here is an integrity failure: a box that does not
    /// open was not sealed with this binding.
    pub fn open(
        &self,
        sealing_secret: &X25519StaticSecret,
        binding: &SealingBinding,
    ) -> Result<Vec<u8>> {
        let aad = binding.aad_bytes();

        let shared = sealing_secret.diffie_hellman(&self.ephemeral_public);
        let wrap_key = shared.derive_sealing_key(binding.policy_digest.as_bytes());
        let key_bytes = wrap_key.open(&self.wrapped_key, &self.key_nonce, &aad)?;
        if key_bytes.len() != 32 {
            return Err(KeynetError::Integrity("wrapped key has wrong length".into()));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&key_bytes);

        EncryptionKey::from_bytes(key).open(&self.payload, &self.payload_nonce, &aad)
    }

    /// Encode to CBOR bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).expect("CBOR serialization failed");
        buf
    }

    /// Decode from CBOR bytes.
    ///
    /// A ciphertext that does not decode was tampered with; this is an
    /// integrity failure, not a protocol error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes)
            .map_err(|_| KeynetError::Integrity("ciphertext is not a valid sealed box".into()))
    }

    /// Encode to the hex string carried in envelopes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decode from the hex string carried in envelopes.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|_| KeynetError::Integrity("ciphertext is not valid hex".into()))?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_binding() -> SealingBinding {
        SealingBinding::new(
            Blake3Hash::hash(b"policy"),
            Blake3Hash::hash(b"plaintext"),
        )
    }

    #[test]
    fn test_x25519_key_agreement() {
        let network_secret = X25519StaticSecret::generate();
        let network_public = network_secret.public_key();

        let ephemeral = EphemeralKeyPair::generate();
        let ephemeral_public = ephemeral.public_key();

        let client_shared = ephemeral.diffie_hellman(&network_public);
        let network_shared = network_secret.diffie_hellman(&ephemeral_public);

        assert_eq!(client_shared.as_bytes(), network_shared.as_bytes());
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let secret = X25519StaticSecret::generate();
        let binding = test_binding();
        let plaintext = b"the agreement text";

        let sealed = SealedBox::seal(&secret.public_key(), &binding, plaintext).unwrap();
        let opened = sealed.open(&secret, &binding).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_open_with_wrong_secret_fails() {
        let secret = X25519StaticSecret::generate();
        let other = X25519StaticSecret::generate();
        let binding = test_binding();

        let sealed = SealedBox::seal(&secret.public_key(), &binding, b"secret").unwrap();
        let err = sealed.open(&other, &binding).unwrap_err();
        assert!(matches!(err, KeynetError::Integrity(_)));
    }

    #[test]
    fn test_open_with_wrong_binding_fails() {
        let secret = X25519StaticSecret::generate();
        let binding = test_binding();

        let sealed = SealedBox::seal(&secret.public_key(), &binding, b"secret").unwrap();

        let wrong_policy =
            SealingBinding::new(Blake3Hash::hash(b"other policy"), binding.data_hash);
        assert!(matches!(
            sealed.open(&secret, &wrong_policy),
            Err(KeynetError::Integrity(_))
        ));

        let wrong_hash =
            SealingBinding::new(binding.policy_digest, Blake3Hash::hash(b"other data"));
        assert!(matches!(
            sealed.open(&secret, &wrong_hash),
            Err(KeynetError::Integrity(_))
        ));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let secret = X25519StaticSecret::generate();
        let binding = test_binding();

        let mut sealed = SealedBox::seal(&secret.public_key(), &binding, b"payload").unwrap();
        let last = sealed.payload.len() - 1;
        sealed.payload[last] ^= 0x01;

        assert!(matches!(
            sealed.open(&secret, &binding),
            Err(KeynetError::Integrity(_))
        ));
    }

    #[test]
    fn test_hex_roundtrip() {
        let secret = X25519StaticSecret::generate();
        let binding = test_binding();

        let sealed = SealedBox::seal(&secret.public_key(), &binding, b"bytes").unwrap();
        let hex = sealed.to_hex();
        let decoded = SealedBox::from_hex(&hex).unwrap();

        assert_eq!(decoded.open(&secret, &binding).unwrap(), b"bytes");
    }

    #[test]
    fn test_garbage_ciphertext_is_integrity_failure() {
        assert!(matches!(
            SealedBox::from_hex("zz"),
            Err(KeynetError::Integrity(_))
        ));
        assert!(matches!(
            SealedBox::from_hex("deadbeef"),
            Err(KeynetError::Integrity(_))
        ));
    }

    #[test]
    fn test_empty_plaintext_seals() {
        let secret = X25519StaticSecret::generate();
        let binding = SealingBinding::new(Blake3Hash::hash(b"policy"), Blake3Hash::hash(b""));

        let sealed = SealedBox::seal(&secret.public_key(), &binding, b"").unwrap();
        assert_eq!(sealed.open(&secret, &binding).unwrap(), b"");
    }

    #[test]
    fn test_key_derivation_contextual() {
        let shared = SharedKey([0x42; 32]);

        let k1 = shared.derive_sealing_key(b"context-a");
        let k2 = shared.derive_sealing_key(b"context-a");
        let k3 = shared.derive_sealing_key(b"context-b");

        assert_eq!(k1.as_bytes(), k2.as_bytes());
        assert_ne!(k1.as_bytes(), k3.as_bytes());
    }
}
