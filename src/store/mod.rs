//! Vector store abstraction for Profile Index.
//!
//! The [`ProfileStore`] trait defines the two operations the upsert
//! orchestrator needs — point lookup by document id and wholesale
//! upsert — enabling pluggable backends (Chroma over HTTP, in-memory
//! for tests).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod chroma;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ProfileDocument;

/// A previously indexed record, as returned by [`ProfileStore::get`].
///
/// `content_sha256` is surfaced separately from the rest of the metadata
/// because it drives the skip/update decision; a record stored without one
/// (e.g. written by an older ingester) compares unequal to every hash and is
/// re-indexed on the next upsert.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: String,
    pub content_sha256: Option<String>,
    pub metadata: serde_json::Value,
}

/// Abstract vector store backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get`](ProfileStore::get) | Look up a record by document id |
/// | [`upsert`](ProfileStore::upsert) | Insert or replace a document and its vector |
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up a record by document id. Absence is `Ok(None)`, not an error.
    async fn get(&self, id: &str) -> Result<Option<StoredRecord>>;

    /// Insert or wholesale-replace a document, its metadata, and its vector.
    async fn upsert(&self, doc: &ProfileDocument, vector: &[f32]) -> Result<()>;
}
