//! ContentStore trait: the abstract interface for envelope storage.
//!
//! This trait keeps the pipeline storage-agnostic. Implementations
//! include the HTTP gateway (primary) and in-memory (for tests).

use async_trait::async_trait;
use docseal_core::{ContentReference, EncryptedEnvelope, Tag, WalletSigner};

use crate::error::Result;

/// Where sealed envelopes are published and fetched.
///
/// Implementations store the envelope's serialized bytes as-is:
/// retrieving a reference yields an envelope equal to the one uploaded,
/// field for field. The envelope's ciphertext and hash are hex strings,
/// so field equality is byte equality of the underlying payload.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Publish an envelope under the uploader's identity.
    ///
    /// Tags ride alongside the content for gateway-side indexing and
    /// never influence what bytes are stored. Returns the reference the
    /// content is retrievable at.
    async fn upload(
        &self,
        envelope: &EncryptedEnvelope,
        tags: &[Tag],
        uploader: &WalletSigner,
    ) -> Result<ContentReference>;

    /// Fetch the envelope stored at a reference.
    async fn retrieve(&self, reference: &ContentReference) -> Result<EncryptedEnvelope>;
}

// Lets independently-owned pipelines share one store.
#[async_trait]
impl<S: ContentStore + ?Sized> ContentStore for std::sync::Arc<S> {
    async fn upload(
        &self,
        envelope: &EncryptedEnvelope,
        tags: &[Tag],
        uploader: &WalletSigner,
    ) -> Result<ContentReference> {
        (**self).upload(envelope, tags, uploader).await
    }

    async fn retrieve(&self, reference: &ContentReference) -> Result<EncryptedEnvelope> {
        (**self).retrieve(reference).await
    }
}
