use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::BlobStoreError;
use crate::traits::BlobStore;

/// In-memory blob store for tests and local runs.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        MemoryBlobStore::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>, BlobStoreError> {
        self.blobs
            .lock()
            .map_err(|_| BlobStoreError::Backend("blob map mutex poisoned".to_string()))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, blob_id: &str, payload: Vec<u8>) -> Result<(), BlobStoreError> {
        self.lock()?.insert(blob_id.to_string(), payload);
        Ok(())
    }

    async fn get(&self, blob_id: &str) -> Result<Vec<u8>, BlobStoreError> {
        self.lock()?
            .get(blob_id)
            .cloned()
            .ok_or_else(|| BlobStoreError::BlobNotFound {
                blob_id: blob_id.to_string(),
            })
    }

    async fn contains(&self, blob_id: &str) -> Result<bool, BlobStoreError> {
        Ok(self.lock()?.contains_key(blob_id))
    }
}
