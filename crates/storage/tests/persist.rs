//! End-to-end: summarize a value, persist its blob map, resolve the ids.

use std::collections::BTreeSet;

use castor_core::{TypeDescriptor, Value};
use castor_registry::Registry;
use castor_storage::{persist_blobs, BlobStore, MemoryBlobStore};

#[tokio::test]
async fn summary_blobs_resolve_against_the_store() {
    let registry = Registry::with_builtins();
    let ty = TypeDescriptor::set(TypeDescriptor::str());

    // Two strings past the blob threshold: their payloads leave the
    // inline summary and land in the blob map.
    let members: BTreeSet<Value> = ["a", "b"]
        .iter()
        .map(|tag| Value::Text(tag.repeat(5000)))
        .collect();
    let value = Value::Set(members);

    let out = registry.summarize(&value, &ty).unwrap();
    assert_eq!(out.blobs.len(), 2);

    let store = MemoryBlobStore::new();
    persist_blobs(&store, &out.blobs).await.unwrap();

    for entry in out.summary["summary"].as_array().unwrap() {
        let blob_id = entry["blob"].as_str().unwrap();
        let payload = store.get(blob_id).await.unwrap();
        assert_eq!(payload.len(), entry["bytes"].as_u64().unwrap() as usize);
    }
}
