//! HTTP gateway implementation of [`ContentStore`].
//!
//! Uploads go to a bundler node as a signed JSON transaction; the content
//! then becomes publicly readable at the gateway prefix joined with the
//! returned id. Retrieval is a plain GET of that URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use docseal_core::{
    ChainAddress, ContentReference, EncryptedEnvelope, Tag, WalletSignature, WalletSigner,
};

use crate::error::{Result, StoreError};
use crate::traits::ContentStore;

/// Public gateway prefix sealed envelopes are served from.
pub const DEFAULT_GATEWAY_PREFIX: &str = "https://gateway.irys.xyz/";

/// Bundler node uploads are submitted to.
pub const DEFAULT_BUNDLER_URL: &str = "https://node2.irys.xyz";

const UPLOAD_SIGN_DOMAIN: &[u8] = b"docseal/upload/v1";

/// Gateway-backed content store.
pub struct GatewayStore {
    client: reqwest::Client,
    bundler_url: String,
    gateway_prefix: String,
}

impl GatewayStore {
    /// Store talking to the default bundler and gateway.
    pub fn new() -> Self {
        Self::with_urls(DEFAULT_BUNDLER_URL, DEFAULT_GATEWAY_PREFIX)
    }

    /// Store talking to a specific bundler and gateway. The prefix is
    /// used verbatim: whatever it ends with, the reference is appended
    /// directly.
    pub fn with_urls(bundler_url: impl Into<String>, gateway_prefix: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            bundler_url: bundler_url.into().trim_end_matches('/').to_string(),
            gateway_prefix: gateway_prefix.into(),
        }
    }

    /// Public URL the envelope at a reference is served from.
    pub fn envelope_url(&self, reference: &ContentReference) -> String {
        format!("{}{}", self.gateway_prefix, reference)
    }
}

impl Default for GatewayStore {
    fn default() -> Self {
        Self::new()
    }
}

/// What actually gets stored: the envelope JSON and its tags.
#[derive(Serialize)]
struct UploadPayload {
    data: String,
    tags: Vec<Tag>,
}

/// A signed upload transaction.
#[derive(Serialize)]
struct UploadRequest {
    payload: UploadPayload,
    uploader: ChainAddress,
    /// Signature over the domain-separated CBOR encoding of the payload.
    signature: WalletSignature,
}

#[derive(Deserialize)]
struct UploadResponse {
    id: String,
}

fn sign_payload(payload: &UploadPayload, uploader: &WalletSigner) -> WalletSignature {
    let mut buf = UPLOAD_SIGN_DOMAIN.to_vec();
    ciborium::into_writer(payload, &mut buf).expect("CBOR serialization failed");
    uploader.sign(&buf)
}

#[async_trait]
impl ContentStore for GatewayStore {
    async fn upload(
        &self,
        envelope: &EncryptedEnvelope,
        tags: &[Tag],
        uploader: &WalletSigner,
    ) -> Result<ContentReference> {
        let payload = UploadPayload {
            data: String::from_utf8(envelope.to_json()).expect("envelope JSON is UTF-8"),
            tags: tags.to_vec(),
        };
        let request = UploadRequest {
            signature: sign_payload(&payload, uploader),
            uploader: uploader.address(),
            payload,
        };

        let url = format!("{}/tx", self.bundler_url);
        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Bundler rejected upload: {}", status);
            return Err(StoreError::Upload(format!(
                "bundler returned {status}: {body}"
            )));
        }

        let accepted: UploadResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Upload(format!("bundler response did not parse: {e}")))?;
        tracing::debug!("Uploaded envelope as {}", accepted.id);
        Ok(ContentReference::new(accepted.id))
    }

    async fn retrieve(&self, reference: &ContentReference) -> Result<EncryptedEnvelope> {
        let response = self.client.get(self.envelope_url(reference)).send().await?;
        // The gateway either serves the content or it does not; any
        // unsuccessful status means the reference cannot be resolved.
        if !response.status().is_success() {
            return Err(StoreError::NotFound(reference.to_string()));
        }
        let text = response.text().await?;
        EncryptedEnvelope::from_json(text.as_bytes())
            .map_err(|e| StoreError::MalformedEnvelope(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One-shot HTTP server answering every request with the given
    /// status line. Returns the address it listens on.
    fn serve_status(status_line: &'static str, requests: usize) -> std::net::SocketAddr {
        use std::io::{Read, Write};
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for _ in 0..requests {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let response = format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\n\r\n");
                stream.write_all(response.as_bytes()).unwrap();
            }
        });
        addr
    }

    #[test]
    fn test_envelope_url_appends_reference_to_prefix() {
        let store = GatewayStore::new();
        let url = store.envelope_url(&ContentReference::new("AbC123"));
        assert_eq!(url, "https://gateway.irys.xyz/AbC123");
    }

    #[test]
    fn test_custom_urls_are_respected() {
        let store =
            GatewayStore::with_urls("https://node.example.com/", "https://cdn.example.com/ipfs/");
        let url = store.envelope_url(&ContentReference::new("ref-1"));
        assert_eq!(url, "https://cdn.example.com/ipfs/ref-1");
    }

    #[tokio::test]
    async fn test_any_unsuccessful_status_maps_to_not_found() {
        let addr = serve_status("500 Internal Server Error", 1);
        let store = GatewayStore::with_urls("http://unused.invalid", format!("http://{addr}/"));
        let err = store
            .retrieve(&ContentReference::new("some-ref"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_reference_maps_to_not_found() {
        let addr = serve_status("404 Not Found", 1);
        let store = GatewayStore::with_urls("http://unused.invalid", format!("http://{addr}/"));
        let err = store
            .retrieve(&ContentReference::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_payload_signature_is_deterministic_and_keyed() {
        let signer = WalletSigner::from_seed(&[0x21u8; 32]);
        let payload = UploadPayload {
            data: "{\"cipherText\":\"00\"}".to_string(),
            tags: vec![Tag::new("Content-Type", "application/json")],
        };

        let a = sign_payload(&payload, &signer);
        let b = sign_payload(&payload, &signer);
        assert_eq!(a, b);

        let other = WalletSigner::from_seed(&[0x22u8; 32]);
        assert_ne!(a, sign_payload(&payload, &other));

        signer
            .public_key()
            .verify(
                &{
                    let mut buf = UPLOAD_SIGN_DOMAIN.to_vec();
                    ciborium::into_writer(&payload, &mut buf).unwrap();
                    buf
                },
                &a,
            )
            .unwrap();
    }
}
