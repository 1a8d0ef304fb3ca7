use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::BlobStoreError;

/// The storage trait for summary blob backends.
///
/// A `BlobStore` holds the out-of-band payloads a summary references by
/// content identifier. Writes are idempotent: putting a blob under an
/// identifier that already exists replaces the stored payload, matching
/// the last-write-wins merge applied when summaries are assembled.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` so stores can be
/// shared across async task boundaries.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Store `payload` under `blob_id`, replacing any previous payload.
    async fn put(&self, blob_id: &str, payload: Vec<u8>) -> Result<(), BlobStoreError>;

    /// Fetch the payload stored under `blob_id`.
    ///
    /// Returns `Err(BlobStoreError::BlobNotFound)` if nothing is stored
    /// under the identifier.
    async fn get(&self, blob_id: &str) -> Result<Vec<u8>, BlobStoreError>;

    /// True if a payload is stored under `blob_id`.
    async fn contains(&self, blob_id: &str) -> Result<bool, BlobStoreError>;
}

/// Persist every entry of a summary's blob map, in key order.
///
/// The map type matches the blob map produced by summarization: content
/// identifier to payload bytes.
pub async fn persist_blobs<S: BlobStore + ?Sized>(
    store: &S,
    blobs: &BTreeMap<String, Vec<u8>>,
) -> Result<(), BlobStoreError> {
    for (blob_id, payload) in blobs {
        store.put(blob_id, payload.clone()).await?;
    }
    Ok(())
}
