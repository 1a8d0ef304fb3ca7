//! castor-storage: blob storage backends for summary payloads.
//!
//! Summarization extracts large payloads into a blob map keyed by content
//! identifier; this crate defines the `BlobStore` trait those identifiers
//! resolve against, plus the in-memory backend used in tests and local
//! runs. Durable backends implement the same trait out of tree.

mod error;
mod memory;
mod traits;

pub use error::BlobStoreError;
pub use memory::MemoryBlobStore;
pub use traits::{persist_blobs, BlobStore};
