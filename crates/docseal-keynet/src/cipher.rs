//! Sealing payloads under a condition list and asking the network to open
//! them.
//!
//! Encryption is local: the payload is sealed toward the network's
//! sealing key fetched at connect time, bound to the condition-list digest
//! and the plaintext hash. Decryption is a network call; the network
//! re-verifies the credential and re-evaluates the conditions before
//! opening anything.

use crate::connection::NetworkHandle;
use crate::crypto::{SealedBox, SealingBinding};
use crate::error::Result;
use crate::messages::{DecryptRequest, SessionCredential};
use crate::network::KeyNetwork;
use docseal_core::{AccessPolicy, Blake3Hash, EncryptedEnvelope};

/// What sealing produces: the sealed payload and the plaintext hash, both
/// hex-encoded for the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    pub cipher_text: String,
    pub data_to_encrypt_hash: String,
}

/// Seal a payload under a condition list.
///
/// Needs connectivity only: the network contributes its sealing key, no
/// conditions are evaluated and no credential is involved.
pub async fn encrypt<N: KeyNetwork>(
    handle: &NetworkHandle<N>,
    policy: &AccessPolicy,
    plaintext: &[u8],
) -> Result<SealedPayload> {
    let info = handle.connect().await?;
    let data_hash = Blake3Hash::hash(plaintext);
    let binding = SealingBinding::new(policy.digest(), data_hash);
    let sealed = SealedBox::seal(&info.sealing_key, &binding, plaintext)?;
    Ok(SealedPayload {
        cipher_text: sealed.to_hex(),
        data_to_encrypt_hash: data_hash.to_hex(),
    })
}

/// Convenience wrapper for sealing text.
pub async fn encrypt_text<N: KeyNetwork>(
    handle: &NetworkHandle<N>,
    policy: &AccessPolicy,
    text: &str,
) -> Result<SealedPayload> {
    encrypt(handle, policy, text.as_bytes()).await
}

/// Ask the network to open a sealed envelope.
///
/// The request carries the envelope's condition list and hash verbatim;
/// the network decides from scratch whether the credential's holder
/// satisfies them.
pub async fn decrypt<N: KeyNetwork>(
    handle: &NetworkHandle<N>,
    envelope: &EncryptedEnvelope,
    credential: &SessionCredential,
) -> Result<Vec<u8>> {
    handle.connect().await?;
    let request = DecryptRequest {
        chain: handle.chain().to_string(),
        access_control_conditions: envelope.access_control_conditions.clone(),
        cipher_text: envelope.cipher_text.clone(),
        data_to_encrypt_hash: envelope.data_to_encrypt_hash.clone(),
        credential: credential.clone(),
    };
    handle.network().open_sealed(&request).await
}

/// Convenience wrapper yielding text.
pub async fn decrypt_text<N: KeyNetwork>(
    handle: &NetworkHandle<N>,
    envelope: &EncryptedEnvelope,
    credential: &SessionCredential,
) -> Result<String> {
    let bytes = decrypt(handle, envelope, credential).await?;
    Ok(String::from_utf8(bytes)?)
}
