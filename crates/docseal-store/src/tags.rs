//! Standard tags attached to envelope uploads.

use docseal_core::{DocumentMeta, Tag};

/// Content type of the stored bytes themselves.
pub const CONTENT_TYPE_TAG: &str = "Content-Type";
/// Original file name of the sealed document, when known.
pub const FILE_NAME_TAG: &str = "X-File-Name";
/// Content type of the sealed document, when known.
pub const DOCUMENT_TYPE_TAG: &str = "X-Content-Type";

/// What the gateway stores is always the envelope's JSON.
pub const ENVELOPE_CONTENT_TYPE: &str = "application/json";

/// The standard tag set for an envelope upload.
///
/// The content-type tag describes the envelope bytes, not the document
/// inside them; the document's own name and type ride in the `X-` tags
/// and only appear when the metadata carries them.
pub fn envelope_tags(meta: &DocumentMeta) -> Vec<Tag> {
    let mut tags = vec![Tag::new(CONTENT_TYPE_TAG, ENVELOPE_CONTENT_TYPE)];
    if let Some(file_name) = &meta.file_name {
        tags.push(Tag::new(FILE_NAME_TAG, file_name));
    }
    if let Some(content_type) = &meta.content_type {
        tags.push(Tag::new(DOCUMENT_TYPE_TAG, content_type));
    }
    tags
}
