//! Wire messages for the authorization handshake and decryption calls.
//!
//! The handshake is two explicit steps: a [`SessionRequest`] answered by a
//! [`SessionChallenge`], then a signed [`SignInStatement`] answered by a
//! [`SessionCredential`]. Decryption submits a [`DecryptRequest`] carrying
//! everything the network needs to re-evaluate access from scratch.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use docseal_core::{AccessPolicy, Blake3Hash, ChainAddress, WalletPublicKey, WalletSignature};

/// Domain separator prefixed to statement bytes before signing.
pub const STATEMENT_SIGN_DOMAIN: &[u8] = b"docseal/session-statement/v1";

/// Default lifetime of a challenge and the credential completing it.
pub const SESSION_TTL_MILLIS: i64 = 10 * 60 * 1000;

/// Identifier of an issued challenge.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChallengeId(pub [u8; 32]);

impl ChallengeId {
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
}

impl fmt::Debug for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChallengeId({})", &self.to_hex()[..16])
    }
}

impl Serialize for ChallengeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChallengeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))?;
        Ok(Self(arr))
    }
}

/// What a session is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    /// Decrypt payloads whose conditions the caller satisfies.
    #[serde(rename = "condition-decryption")]
    ConditionDecryption,
}

/// Which condition lists a session covers: the wildcard, or the hex
/// digest of one specific list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourcePattern(String);

impl ResourcePattern {
    /// The wildcard pattern covering any condition list.
    pub fn any() -> Self {
        Self("*".to_string())
    }

    /// The pattern covering exactly one condition list.
    pub fn conditions(digest: &Blake3Hash) -> Self {
        Self(digest.to_hex())
    }

    /// Whether this pattern covers the given condition-list digest.
    pub fn matches(&self, digest: &Blake3Hash) -> bool {
        self.0 == "*" || self.0 == digest.to_hex()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One resource/ability grant requested for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAbility {
    pub resource: ResourcePattern,
    pub ability: Ability,
}

/// Step one of the handshake: who is asking, on which chain, for what.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    pub address: ChainAddress,
    pub chain: String,
    pub requests: Vec<ResourceAbility>,
}

/// The network's answer to a session request.
///
/// The nonce is fresh per challenge; a challenge is single-use and
/// expires at `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionChallenge {
    pub challenge_id: ChallengeId,
    /// URI the signed statement must be addressed to.
    pub uri: String,
    pub nonce: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// The statement a wallet signs to complete the handshake.
///
/// Embeds the wallet public key: Ed25519 signatures do not allow key
/// recovery, so the verifier checks that the claimed address derives from
/// the embedded key and then verifies the signature under it. The uri,
/// nonce, and expiration must echo the challenge verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInStatement {
    pub uri: String,
    pub address: ChainAddress,
    pub public_key: WalletPublicKey,
    pub chain: String,
    pub requests: Vec<ResourceAbility>,
    pub nonce: String,
    pub issued_at: i64,
    pub expiration: i64,
}

impl SignInStatement {
    /// The exact bytes a wallet signs: domain separator, then the CBOR
    /// encoding of the statement.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut buf = STATEMENT_SIGN_DOMAIN.to_vec();
        ciborium::into_writer(self, &mut buf).expect("CBOR serialization failed");
        buf
    }
}

/// The network's keyed tag over a completed statement and signature.
///
/// A credential is only honored by the network that attested it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CredentialTag(pub [u8; 32]);

impl CredentialTag {
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
}

impl fmt::Debug for CredentialTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialTag({})", &self.to_hex()[..16])
    }
}

impl Serialize for CredentialTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CredentialTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))?;
        Ok(Self(arr))
    }
}

/// A completed, network-attested session credential.
///
/// The single concrete credential type: statement, wallet signature, and
/// the network's attestation tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    pub statement: SignInStatement,
    pub signature: WalletSignature,
    pub attestation: CredentialTag,
}

impl SessionCredential {
    /// Whether the credential has expired at the given wall-clock time.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis >= self.statement.expiration
    }

    /// Whether the credential covers the given condition-list digest with
    /// the given ability.
    pub fn covers(&self, digest: &Blake3Hash, ability: Ability) -> bool {
        self.statement
            .requests
            .iter()
            .any(|r| r.ability == ability && r.resource.matches(digest))
    }

    /// The address this credential proves control of.
    pub fn address(&self) -> ChainAddress {
        self.statement.address
    }
}

/// A decryption call: everything the network needs to re-evaluate access
/// from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    pub chain: String,
    pub access_control_conditions: AccessPolicy,
    pub cipher_text: String,
    pub data_to_encrypt_hash: String,
    pub credential: SessionCredential,
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseal_core::WalletSigner;

    fn sample_statement(signer: &WalletSigner) -> SignInStatement {
        SignInStatement {
            uri: "docseal://session".to_string(),
            address: signer.address(),
            public_key: signer.public_key(),
            chain: "ethereum".to_string(),
            requests: vec![ResourceAbility {
                resource: ResourcePattern::any(),
                ability: Ability::ConditionDecryption,
            }],
            nonce: "abc123".to_string(),
            issued_at: 1_700_000_000_000,
            expiration: 1_700_000_600_000,
        }
    }

    #[test]
    fn test_signing_bytes_deterministic_and_domain_prefixed() {
        let signer = WalletSigner::from_seed(&[0x51u8; 32]);
        let statement = sample_statement(&signer);

        let b1 = statement.signing_bytes();
        let b2 = statement.signing_bytes();
        assert_eq!(b1, b2);
        assert!(b1.starts_with(STATEMENT_SIGN_DOMAIN));

        let mut other = statement.clone();
        other.nonce = "different".to_string();
        assert_ne!(b1, other.signing_bytes());
    }

    #[test]
    fn test_resource_pattern_matching() {
        let digest = Blake3Hash::hash(b"conditions");
        let other = Blake3Hash::hash(b"other conditions");

        assert!(ResourcePattern::any().matches(&digest));
        assert!(ResourcePattern::any().matches(&other));

        let exact = ResourcePattern::conditions(&digest);
        assert!(exact.matches(&digest));
        assert!(!exact.matches(&other));
    }

    #[test]
    fn test_credential_covers_scope() {
        let signer = WalletSigner::from_seed(&[0x52u8; 32]);
        let digest = Blake3Hash::hash(b"conditions");

        let mut statement = sample_statement(&signer);
        statement.requests = vec![ResourceAbility {
            resource: ResourcePattern::conditions(&digest),
            ability: Ability::ConditionDecryption,
        }];
        let credential = SessionCredential {
            statement,
            signature: WalletSignature::ZERO,
            attestation: CredentialTag::from_bytes([0u8; 32]),
        };

        assert!(credential.covers(&digest, Ability::ConditionDecryption));
        assert!(!credential.covers(&Blake3Hash::hash(b"elsewhere"), Ability::ConditionDecryption));
    }

    #[test]
    fn test_credential_expiry() {
        let signer = WalletSigner::from_seed(&[0x53u8; 32]);
        let statement = sample_statement(&signer);
        let expiration = statement.expiration;
        let credential = SessionCredential {
            statement,
            signature: WalletSignature::ZERO,
            attestation: CredentialTag::from_bytes([0u8; 32]),
        };

        assert!(!credential.is_expired(expiration - 1));
        assert!(credential.is_expired(expiration));
        assert!(credential.is_expired(expiration + 1));
    }

    #[test]
    fn test_challenge_id_serde_hex() {
        let id = ChallengeId::from_bytes([0xAB; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));

        let back: ChallengeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
