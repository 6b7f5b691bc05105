//! Golden wire-format vectors.
//!
//! These pin the exact JSON a single-recipient policy serializes to. The
//! policy wire form is shared between published envelopes and decrypt
//! requests; a vector failure means envelopes already on the gateway no
//! longer parse, or no longer produce the digest they were sealed under.

use docseal_core::{AccessPolicy, ChainAddress, DocumentMeta, EncryptedEnvelope};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Recipient address in canonical `0x` form.
    pub recipient: &'static str,
    /// Chain the condition is written against.
    pub chain: &'static str,
    /// Hex ciphertext carried in the envelope.
    pub cipher_text: &'static str,
    /// Hex plaintext hash carried in the envelope.
    pub data_hash: &'static str,
    /// File name, empty for a bare payload.
    pub file_name: &'static str,
    /// Exact compact JSON the policy serializes to.
    pub expected_policy_json: &'static str,
    /// Pinned policy digest (hex); empty leaves the digest unpinned and
    /// [`verify_all_vectors`] reports what was computed.
    pub expected_policy_digest: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "single recipient on ethereum",
            recipient: "0xabababababababababababababababababababab",
            chain: "ethereum",
            cipher_text: "00ff00ff",
            data_hash: "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            file_name: "deal.pdf",
            expected_policy_json: r#"[{"contractAddress":"","standardContractType":"","chain":"ethereum","method":"","parameters":[":userAddress"],"returnValueTest":{"comparator":"=","value":"0xabababababababababababababababababababab"}}]"#,
            expected_policy_digest: "",
        },
        GoldenVector {
            name: "single recipient on polygon",
            recipient: "0x0123456789abcdef0123456789abcdef01234567",
            chain: "polygon",
            cipher_text: "deadbeef",
            data_hash: "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
            file_name: "",
            expected_policy_json: r#"[{"contractAddress":"","standardContractType":"","chain":"polygon","method":"","parameters":[":userAddress"],"returnValueTest":{"comparator":"=","value":"0x0123456789abcdef0123456789abcdef01234567"}}]"#,
            expected_policy_digest: "",
        },
        GoldenVector {
            name: "zero address recipient",
            recipient: "0x0000000000000000000000000000000000000000",
            chain: "ethereum",
            cipher_text: "ff00",
            data_hash: "0000000000000000000000000000000000000000000000000000000000000000",
            file_name: "scan.png",
            expected_policy_json: r#"[{"contractAddress":"","standardContractType":"","chain":"ethereum","method":"","parameters":[":userAddress"],"returnValueTest":{"comparator":"=","value":"0x0000000000000000000000000000000000000000"}}]"#,
            expected_policy_digest: "",
        },
    ]
}

/// Build the policy a vector describes.
pub fn policy_from_vector(vector: &GoldenVector) -> AccessPolicy {
    let recipient: ChainAddress = vector
        .recipient
        .parse()
        .expect("vector recipient is a valid address literal");
    AccessPolicy::single_recipient(&recipient, vector.chain)
}

/// Build the envelope a vector describes.
pub fn envelope_from_vector(vector: &GoldenVector) -> EncryptedEnvelope {
    let meta = if vector.file_name.is_empty() {
        DocumentMeta::default()
    } else {
        DocumentMeta::for_file(vector.file_name)
    };
    EncryptedEnvelope::new(
        vector.cipher_text.to_string(),
        vector.data_hash.to_string(),
        policy_from_vector(vector),
        &meta,
    )
}

/// Verify all golden vectors against their pinned wire forms.
///
/// Returns `(name, matches, digest_hex)` per vector. An empty
/// expectation passes and reports what was computed.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let policy = policy_from_vector(v);
            let json = serde_json::to_string(&policy).expect("policy serialization");
            let digest = policy.digest().to_hex();

            let json_ok = v.expected_policy_json.is_empty() || json == v.expected_policy_json;
            let digest_ok =
                v.expected_policy_digest.is_empty() || digest == v.expected_policy_digest;

            (v.name.to_string(), json_ok && digest_ok, digest)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_json_matches_pinned_form() {
        for vector in all_vectors() {
            let json = serde_json::to_string(&policy_from_vector(&vector)).unwrap();
            assert_eq!(
                json, vector.expected_policy_json,
                "vector '{}' serialized differently",
                vector.name
            );
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            let d1 = policy_from_vector(&vector).digest();
            let d2 = policy_from_vector(&vector).digest();
            assert_eq!(
                d1, d2,
                "vector '{}' produced different digests on regeneration",
                vector.name
            );

            let e1 = envelope_from_vector(&vector).to_json();
            let e2 = envelope_from_vector(&vector).to_json();
            assert_eq!(
                e1, e2,
                "vector '{}' produced different envelope bytes",
                vector.name
            );
        }
    }

    #[test]
    fn test_vector_digests_are_distinct() {
        let digests: Vec<_> = all_vectors()
            .iter()
            .map(|v| policy_from_vector(v).digest())
            .collect();
        for (i, a) in digests.iter().enumerate() {
            for b in &digests[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_envelopes_round_trip() {
        for vector in all_vectors() {
            let envelope = envelope_from_vector(&vector);
            let back = EncryptedEnvelope::from_json(&envelope.to_json()).unwrap();
            assert_eq!(envelope, back, "vector '{}'", vector.name);
        }
    }

    #[test]
    fn test_envelope_embeds_pinned_policy_json() {
        // The policy serializes identically inline and standalone.
        for vector in all_vectors() {
            let json = String::from_utf8(envelope_from_vector(&vector).to_json()).unwrap();
            assert!(
                json.contains(vector.expected_policy_json),
                "vector '{}'",
                vector.name
            );
        }
    }

    #[test]
    fn test_all_vectors_verify() {
        for (name, matches, _) in verify_all_vectors() {
            assert!(matches, "vector '{name}' failed verification");
        }
    }
}
