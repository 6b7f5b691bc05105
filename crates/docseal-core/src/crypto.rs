//! Cryptographic primitives for docseal.
//!
//! Wraps Blake3 hashing and Ed25519 wallet signatures with strong types.
//! Addresses are derived from wallet public keys, never entered as raw
//! key material.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A 32-byte Blake3 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blake3Hash(pub [u8; 32]);

impl Blake3Hash {
    /// Compute the Blake3 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Compute a keyed Blake3 hash (MAC) of the given data.
    pub fn keyed(key: &[u8; 32], data: &[u8]) -> Self {
        Self(*blake3::keyed_hash(key, data).as_bytes())
    }

    /// Derive a key from context and material (Blake3 KDF mode).
    pub fn derive_key(context: &str, material: &[u8]) -> Self {
        Self(blake3::derive_key(context, material))
    }

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

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(CoreError::InvalidHex(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero hash (sentinel value).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blake3({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Blake3Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Blake3Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 32-byte Ed25519 wallet public key.
///
/// Serializes as a hex string so it reads cleanly in JSON message bodies.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletPublicKey(pub [u8; 32]);

impl WalletPublicKey {
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
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(CoreError::InvalidHex(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &WalletSignature) -> Result<(), CoreError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;

        let sig = Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }

    /// Derive the chain address: the last 20 bytes of the key's Blake3 hash.
    pub fn to_address(&self) -> ChainAddress {
        let digest = blake3::hash(&self.0);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&digest.as_bytes()[12..]);
        ChainAddress(addr)
    }
}

impl fmt::Debug for WalletPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletPub({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for WalletPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for WalletPublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for WalletPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for WalletPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 64-byte Ed25519 wallet signature.
///
/// Serializes as a hex string; serde has no derive support for 64-byte
/// arrays.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WalletSignature(pub [u8; 64]);

impl WalletSignature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidHex(e.to_string()))?;
        if bytes.len() != 64 {
            return Err(CoreError::InvalidHex(format!(
                "expected 64 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 64];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero signature (invalid, used as placeholder).
    pub const ZERO: Self = Self([0u8; 64]);
}

impl fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletSig({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for WalletSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 64]> for WalletSignature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

impl Serialize for WalletSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for WalletSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 20-byte chain address.
///
/// Displays in the canonical `0x` + lowercase hex form used everywhere an
/// address appears in policies and messages.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainAddress(pub [u8; 20]);

impl ChainAddress {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainAddress({self})")
    }
}

impl FromStr for ChainAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if hex_part.len() != 40 {
            return Err(CoreError::InvalidAddress(format!(
                "expected 40 hex chars, got {}",
                hex_part.len()
            )));
        }
        let bytes =
            hex::decode(hex_part).map_err(|e| CoreError::InvalidAddress(e.to_string()))?;
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl TryFrom<String> for ChainAddress {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ChainAddress> for String {
    fn from(addr: ChainAddress) -> Self {
        addr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::WalletSigner;

    #[test]
    fn test_blake3_hash() {
        let data = b"test data";
        let h1 = Blake3Hash::hash(data);
        let h2 = Blake3Hash::hash(data);
        assert_eq!(h1, h2);

        let different = b"different data";
        let h3 = Blake3Hash::hash(different);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_blake3_hex_roundtrip() {
        let h = Blake3Hash::hash(b"roundtrip");
        let recovered = Blake3Hash::from_hex(&h.to_hex()).unwrap();
        assert_eq!(h, recovered);

        assert!(Blake3Hash::from_hex("zz").is_err());
        assert!(Blake3Hash::from_hex("abcd").is_err());
    }

    #[test]
    fn test_keyed_hash_differs_from_plain() {
        let key = [0x07u8; 32];
        let plain = Blake3Hash::hash(b"payload");
        let keyed = Blake3Hash::keyed(&key, b"payload");
        assert_ne!(plain, keyed);

        let keyed_again = Blake3Hash::keyed(&key, b"payload");
        assert_eq!(keyed, keyed_again);
    }

    #[test]
    fn test_sign_verify() {
        let signer = WalletSigner::generate();
        let message = b"statement bytes";
        let signature = signer.sign(message);

        signer
            .public_key()
            .verify(message, &signature)
            .expect("valid signature should verify");

        let tampered = b"statement byteZ";
        assert!(signer.public_key().verify(tampered, &signature).is_err());
    }

    #[test]
    fn test_address_derivation_deterministic() {
        let signer = WalletSigner::from_seed(&[0x42u8; 32]);
        let a1 = signer.public_key().to_address();
        let a2 = signer.public_key().to_address();
        assert_eq!(a1, a2);

        let other = WalletSigner::from_seed(&[0x43u8; 32]);
        assert_ne!(a1, other.public_key().to_address());
    }

    #[test]
    fn test_address_display_parse_roundtrip() {
        let addr = WalletSigner::from_seed(&[0x11u8; 32]).address();
        let text = addr.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 42);

        let parsed: ChainAddress = text.parse().unwrap();
        assert_eq!(addr, parsed);

        // Parsing tolerates a missing prefix.
        let parsed_bare: ChainAddress = text.trim_start_matches("0x").parse().unwrap();
        assert_eq!(addr, parsed_bare);
    }

    #[test]
    fn test_address_parse_rejects_garbage() {
        assert!("0x1234".parse::<ChainAddress>().is_err());
        assert!("not-an-address".parse::<ChainAddress>().is_err());
        assert!("0xZZ55667788990011223344556677889900112233"
            .parse::<ChainAddress>()
            .is_err());
    }

    #[test]
    fn test_signature_serde_hex_string() {
        let signer = WalletSigner::from_seed(&[0x05u8; 32]);
        let sig = signer.sign(b"hello");

        let json = serde_json::to_string(&sig).unwrap();
        assert!(json.starts_with('"'));
        assert_eq!(json.len(), 130); // 128 hex chars plus quotes

        let back: WalletSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, back);
    }

    #[test]
    fn test_public_key_serde_hex_string() {
        let pk = WalletSigner::from_seed(&[0x06u8; 32]).public_key();
        let json = serde_json::to_string(&pk).unwrap();
        let back: WalletPublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(pk, back);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_address_text_roundtrip(bytes in proptest::array::uniform20(any::<u8>())) {
                let addr = ChainAddress::from_bytes(bytes);
                let parsed: ChainAddress = addr.to_string().parse().unwrap();
                prop_assert_eq!(addr, parsed);
            }

            #[test]
            fn test_hash_hex_roundtrip(bytes in proptest::array::uniform32(any::<u8>())) {
                let hash = Blake3Hash::from_bytes(bytes);
                prop_assert_eq!(hash, Blake3Hash::from_hex(&hash.to_hex()).unwrap());
            }
        }
    }
}
