//! The published envelope format.
//!
//! The envelope is what actually lands on the public gateway: the opaque
//! ciphertext, the plaintext hash the network re-checks before releasing a
//! decryption, the exact policy in force, and optional document metadata
//! for serving the decrypted bytes. Ciphertext and hash are produced as a
//! pair and must never be re-associated with a different policy; the struct
//! enforces the pairing by construction.

use serde::{Deserialize, Serialize};

use crate::policy::AccessPolicy;
use crate::types::DocumentMeta;

/// The JSON document published to the content gateway.
///
/// Field names are the wire format (`cipherText`, `dataToEncryptHash`,
/// `accessControlConditions`, `fileName`, `contentType`) and must not
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    /// Hex-encoded sealed payload, opaque outside the key network.
    pub cipher_text: String,
    /// Hex Blake3 hash of the plaintext, fixed at encryption time.
    pub data_to_encrypt_hash: String,
    /// The policy under which the payload was sealed.
    pub access_control_conditions: AccessPolicy,
    /// Original file name, when the payload was a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Original content type, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl EncryptedEnvelope {
    /// Assemble an envelope from cipher output, the policy it was sealed
    /// under, and optional document metadata.
    pub fn new(
        cipher_text: String,
        data_to_encrypt_hash: String,
        policy: AccessPolicy,
        meta: &DocumentMeta,
    ) -> Self {
        Self {
            cipher_text,
            data_to_encrypt_hash,
            access_control_conditions: policy,
            file_name: meta.file_name.clone(),
            content_type: meta.content_type.clone(),
        }
    }

    /// Serialize to the JSON bytes that get uploaded.
    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("envelope JSON serialization failed")
    }

    /// Parse from retrieved JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::AccessPolicy;
    use crate::signer::WalletSigner;

    fn sample_envelope(meta: &DocumentMeta) -> EncryptedEnvelope {
        let addr = WalletSigner::from_seed(&[0x31u8; 32]).address();
        EncryptedEnvelope::new(
            "deadbeef".to_string(),
            "aa".repeat(32),
            AccessPolicy::single_recipient(&addr, "ethereum"),
            meta,
        )
    }

    #[test]
    fn test_json_roundtrip() {
        let meta = DocumentMeta::default()
            .with_file_name("contract.pdf")
            .with_content_type("application/pdf");
        let envelope = sample_envelope(&meta);

        let bytes = envelope.to_json();
        let back = EncryptedEnvelope::from_json(&bytes).unwrap();
        assert_eq!(envelope, back);
    }

    #[test]
    fn test_wire_field_names() {
        let meta = DocumentMeta::default().with_file_name("contract.pdf");
        let envelope = sample_envelope(&meta);

        let value: serde_json::Value = serde_json::from_slice(&envelope.to_json()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("cipherText"));
        assert!(obj.contains_key("dataToEncryptHash"));
        assert!(obj.contains_key("accessControlConditions"));
        assert!(obj.contains_key("fileName"));
        assert!(!obj.contains_key("contentType"));
        assert!(obj["accessControlConditions"].is_array());
    }

    #[test]
    fn test_metadata_omitted_when_absent() {
        let envelope = sample_envelope(&DocumentMeta::default());

        let value: serde_json::Value = serde_json::from_slice(&envelope.to_json()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("fileName"));
        assert!(!obj.contains_key("contentType"));

        // And an envelope without those keys still parses.
        let back = EncryptedEnvelope::from_json(&envelope.to_json()).unwrap();
        assert_eq!(back.file_name, None);
        assert_eq!(back.content_type, None);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(EncryptedEnvelope::from_json(b"not json").is_err());
        assert!(EncryptedEnvelope::from_json(b"{\"cipherText\": \"aa\"}").is_err());
    }
}
