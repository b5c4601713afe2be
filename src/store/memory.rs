//! In-memory [`ProfileStore`] implementation for testing.
//!
//! Uses a `HashMap` behind `std::sync::RwLock` for thread safety, plus a
//! write counter so tests can assert how many store writes an ingestion
//! sequence actually performed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::ProfileDocument;

use super::{ProfileStore, StoredRecord};

struct StoredEntry {
    text: String,
    metadata: Value,
    vector: Vec<f32>,
}

/// In-memory store for tests.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, StoredEntry>>,
    writes: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `upsert` calls performed so far.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored summary text for a record, if present.
    pub fn text_of(&self, id: &str) -> Option<String> {
        self.records
            .read()
            .unwrap()
            .get(id)
            .map(|e| e.text.clone())
    }

    /// The stored vector for a record, if present.
    pub fn vector_of(&self, id: &str) -> Option<Vec<f32>> {
        self.records
            .read()
            .unwrap()
            .get(id)
            .map(|e| e.vector.clone())
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get(&self, id: &str) -> Result<Option<StoredRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(id).map(|entry| StoredRecord {
            id: id.to_string(),
            content_sha256: entry
                .metadata
                .get("content_sha256")
                .and_then(Value::as_str)
                .map(str::to_string),
            metadata: entry.metadata.clone(),
        }))
    }

    async fn upsert(&self, doc: &ProfileDocument, vector: &[f32]) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.insert(
            doc.id.clone(),
            StoredEntry {
                text: doc.text.clone(),
                metadata: doc.metadata.clone(),
                vector: vector.to_vec(),
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, hash: &str) -> ProfileDocument {
        ProfileDocument {
            id: id.to_string(),
            text: format!("summary of {}", id),
            metadata: json!({ "profile_id": id, "content_sha256": hash }),
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = InMemoryStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_then_get() {
        let store = InMemoryStore::new();
        store.upsert(&doc("p1", "abc"), &[0.5, 0.5]).await.unwrap();

        let record = store.get("p1").await.unwrap().unwrap();
        assert_eq!(record.id, "p1");
        assert_eq!(record.content_sha256.as_deref(), Some("abc"));
        assert_eq!(store.vector_of("p1").unwrap(), vec![0.5, 0.5]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_wholesale() {
        let store = InMemoryStore::new();
        store.upsert(&doc("p1", "abc"), &[1.0]).await.unwrap();
        store.upsert(&doc("p1", "def"), &[2.0]).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.writes(), 2);
        let record = store.get("p1").await.unwrap().unwrap();
        assert_eq!(record.content_sha256.as_deref(), Some("def"));
    }
}
