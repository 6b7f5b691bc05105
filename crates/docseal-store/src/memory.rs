//! In-memory implementation of the ContentStore trait.
//!
//! This is primarily for testing. It stores the exact serialized bytes
//! an upload produces, so retrieval exercises the same parse path the
//! gateway does, malformed content included.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use docseal_core::{
    Blake3Hash, ChainAddress, ContentReference, EncryptedEnvelope, Tag, WalletSigner,
};

use crate::error::{Result, StoreError};
use crate::traits::ContentStore;

/// In-memory content store.
///
/// References are content-addressed from the stored bytes, so the same
/// envelope always lands at the same reference. All data is lost when
/// the store is dropped. Thread-safe via RwLock.
pub struct MemoryGateway {
    inner: RwLock<MemoryGatewayInner>,
}

struct MemoryGatewayInner {
    objects: HashMap<ContentReference, StoredObject>,
}

struct StoredObject {
    bytes: Bytes,
    tags: Vec<Tag>,
    uploader: Option<ChainAddress>,
}

impl MemoryGateway {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryGatewayInner {
                objects: HashMap::new(),
            }),
        }
    }

    fn reference_for(bytes: &[u8]) -> ContentReference {
        ContentReference::new(Blake3Hash::hash(bytes).to_hex())
    }

    /// Store raw bytes without going through envelope serialization.
    /// Lets tests plant content that is not a valid envelope.
    pub fn put_raw(&self, bytes: impl Into<Bytes>) -> ContentReference {
        let bytes = bytes.into();
        let reference = Self::reference_for(&bytes);
        self.inner.write().unwrap().objects.insert(
            reference.clone(),
            StoredObject {
                bytes,
                tags: Vec::new(),
                uploader: None,
            },
        );
        reference
    }

    /// The exact bytes stored at a reference.
    pub fn raw(&self, reference: &ContentReference) -> Option<Bytes> {
        self.inner
            .read()
            .unwrap()
            .objects
            .get(reference)
            .map(|o| o.bytes.clone())
    }

    /// Tags recorded for a reference.
    pub fn tags_of(&self, reference: &ContentReference) -> Option<Vec<Tag>> {
        self.inner
            .read()
            .unwrap()
            .objects
            .get(reference)
            .map(|o| o.tags.clone())
    }

    /// Address the content at a reference was uploaded under.
    pub fn uploader_of(&self, reference: &ContentReference) -> Option<ChainAddress> {
        self.inner
            .read()
            .unwrap()
            .objects
            .get(reference)
            .and_then(|o| o.uploader)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryGateway {
    async fn upload(
        &self,
        envelope: &EncryptedEnvelope,
        tags: &[Tag],
        uploader: &WalletSigner,
    ) -> Result<ContentReference> {
        let bytes = Bytes::from(envelope.to_json());
        let reference = Self::reference_for(&bytes);
        self.inner.write().unwrap().objects.insert(
            reference.clone(),
            StoredObject {
                bytes,
                tags: tags.to_vec(),
                uploader: Some(uploader.address()),
            },
        );
        Ok(reference)
    }

    async fn retrieve(&self, reference: &ContentReference) -> Result<EncryptedEnvelope> {
        let bytes = self
            .raw(reference)
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| StoreError::MalformedEnvelope(e.to_string()))?;
        EncryptedEnvelope::from_json(text.as_bytes())
            .map_err(|e| StoreError::MalformedEnvelope(e.to_string()))
    }
}
