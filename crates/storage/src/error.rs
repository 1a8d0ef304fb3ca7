/// All errors that can be returned by a BlobStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    /// No blob is stored under the given content identifier.
    #[error("blob not found: {blob_id}")]
    BlobNotFound { blob_id: String },

    /// A backend-specific storage error (connection, I/O, etc.).
    #[error("blob store backend error: {0}")]
    Backend(String),
}
