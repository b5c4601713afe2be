//! Upsert orchestration.
//!
//! Coordinates the full ingestion flow for one raw profile: content hash →
//! field extraction → store lookup → skip/update/insert decision → summary +
//! metadata → embed → write. Re-ingesting unchanged content is a no-op; hash
//! equality (not full-metadata equality) is the skip criterion, since
//! `ingested_at` changes on every write.
//!
//! Two concurrent upserts of the same profile id can race between the lookup
//! and the write; the store's last write wins. No retries and no partial-write
//! cleanup happen at this layer — store and embedding failures propagate.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use walkdir::WalkDir;

use crate::config::Config;
use crate::embedding::{create_embedder, Embedder};
use crate::fields::extract;
use crate::hash::sha256_of_json;
use crate::models::{ProfileDocument, ProfileFields, UpsertAction, UpsertReceipt};
use crate::store::chroma::ChromaStore;
use crate::store::ProfileStore;
use crate::summary::build_summary;

/// Version tag recorded with every document; bump when the embedding setup
/// changes incompatibly.
pub const EMBEDDING_VERSION: &str = "v1";

/// Provenance tag recorded with every document.
pub const METADATA_SOURCE: &str = "pooled_profiles";

/// Ingestion failure, classified for the HTTP boundary.
#[derive(Debug)]
pub enum IngestError {
    /// The payload is not an object or its `profileId` cannot be determined.
    /// Raised before any store access — a malformed profile never writes.
    MalformedProfile(String),
    /// The vector store could not be reached or rejected a call.
    Store(anyhow::Error),
    /// The embedding provider failed to produce a vector.
    Embedding(anyhow::Error),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::MalformedProfile(msg) => write!(f, "malformed profile: {}", msg),
            IngestError::Store(e) => write!(f, "store error: {}", e),
            IngestError::Embedding(e) => write!(f, "embedding error: {}", e),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::MalformedProfile(_) => None,
            IngestError::Store(e) | IngestError::Embedding(e) => Some(e.as_ref()),
        }
    }
}

/// Upsert one raw profile into the store.
///
/// Returns a receipt carrying the document id and the action taken
/// (inserted, updated, or skipped).
pub async fn upsert_profile(
    store: &dyn ProfileStore,
    embedder: &dyn Embedder,
    raw: &Value,
) -> Result<UpsertReceipt, IngestError> {
    if !raw.is_object() {
        return Err(IngestError::MalformedProfile(
            "payload must be a JSON object".to_string(),
        ));
    }

    let content_hash = sha256_of_json(raw);
    let fields = extract(raw);

    let doc_id = fields.profile_id.clone().ok_or_else(|| {
        IngestError::MalformedProfile("profileId is missing or not a string".to_string())
    })?;

    let existing = store.get(&doc_id).await.map_err(IngestError::Store)?;

    let action = match &existing {
        Some(record) if record.content_sha256.as_deref() == Some(content_hash.as_str()) => {
            println!("[skip] unchanged profile_id={}", doc_id);
            return Ok(UpsertReceipt {
                profile_id: doc_id,
                action: UpsertAction::Skipped,
            });
        }
        Some(_) => {
            println!("[update] content changed for profile_id={}; re-embedding", doc_id);
            UpsertAction::Updated
        }
        None => UpsertAction::Inserted,
    };

    let summary = build_summary(&fields);
    let doc = ProfileDocument {
        id: doc_id.clone(),
        metadata: build_metadata(&fields, &content_hash),
        text: summary.clone(),
    };

    let vectors = embedder
        .embed(std::slice::from_ref(&summary))
        .await
        .map_err(IngestError::Embedding)?;
    let vector = vectors
        .into_iter()
        .next()
        .ok_or_else(|| IngestError::Embedding(anyhow::anyhow!("empty embedding response")))?;

    store
        .upsert(&doc, &vector)
        .await
        .map_err(IngestError::Store)?;

    println!("[{}] profile_id={}", action.as_str(), doc_id);
    Ok(UpsertReceipt {
        profile_id: doc_id,
        action,
    })
}

/// Ingest one `.json` file or every `.json` under a directory.
///
/// This is the `pfx ingest` entry point. Files that fail to parse or upsert
/// are reported and counted but do not abort the run.
pub async fn run_ingest(config: &Config, path: &Path) -> Result<()> {
    let store = ChromaStore::connect(&config.store).await?;
    let embedder = create_embedder(&config.embedding)?;

    let files = collect_profile_files(path)?;
    if files.is_empty() {
        bail!("No .json files found under {}", path.display());
    }

    let mut inserted = 0u64;
    let mut updated = 0u64;
    let mut skipped = 0u64;
    let mut failed = 0u64;

    for file in &files {
        let raw = match read_profile(file) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("Warning: {}: {}", file.display(), e);
                failed += 1;
                continue;
            }
        };

        match upsert_profile(&store, embedder.as_ref(), &raw).await {
            Ok(receipt) => match receipt.action {
                UpsertAction::Inserted => inserted += 1,
                UpsertAction::Updated => updated += 1,
                UpsertAction::Skipped => skipped += 1,
            },
            Err(e) => {
                eprintln!("Warning: {}: {}", file.display(), e);
                failed += 1;
            }
        }
    }

    println!("ingest {}", path.display());
    println!("  fetched: {} files", files.len());
    println!("  inserted: {}", inserted);
    println!("  updated: {}", updated);
    println!("  skipped: {}", skipped);
    println!("  failed: {}", failed);
    println!("ok");

    Ok(())
}

fn read_profile(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| "Failed to parse profile JSON")
}

/// Resolve the ingest target to a sorted list of `.json` files.
fn collect_profile_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("No such file or directory: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Document metadata: the flat fields plus provenance.
fn build_metadata(fields: &ProfileFields, content_hash: &str) -> Value {
    let mut metadata = serde_json::to_value(fields)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();

    metadata.insert(
        "content_sha256".to_string(),
        Value::String(content_hash.to_string()),
    );
    metadata.insert(
        "embedding_version".to_string(),
        Value::String(EMBEDDING_VERSION.to_string()),
    );
    metadata.insert(
        "source".to_string(),
        Value::String(METADATA_SOURCE.to_string()),
    );
    metadata.insert(
        "ingested_at".to_string(),
        Value::String(
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        ),
    );

    Value::Object(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_carries_fields_and_provenance() {
        let fields = ProfileFields {
            profile_id: Some("p1".into()),
            total_items: Some(12),
            ..Default::default()
        };
        let metadata = build_metadata(&fields, "deadbeef");

        assert_eq!(metadata["profile_id"], "p1");
        assert_eq!(metadata["total_items"], 12);
        assert_eq!(metadata["content_sha256"], "deadbeef");
        assert_eq!(metadata["embedding_version"], EMBEDDING_VERSION);
        assert_eq!(metadata["source"], METADATA_SOURCE);
        let ingested_at = metadata["ingested_at"].as_str().unwrap();
        assert!(ingested_at.ends_with('Z'));
    }

    #[test]
    fn test_metadata_keeps_absent_fields_as_null() {
        let metadata = build_metadata(&ProfileFields::default(), "00");
        assert!(metadata["resolution"].is_null());
        assert!(metadata["trend_r2_mean"].is_null());
    }

    #[test]
    fn test_collect_profile_files_filters_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("b.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("a.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "skip me").unwrap();

        let files = collect_profile_files(tmp.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.json"));
        assert!(files[1].ends_with("b.json"));
    }

    #[test]
    fn test_collect_profile_files_single_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("one.json");
        std::fs::write(&file, "{}").unwrap();

        let files = collect_profile_files(&file).unwrap();
        assert_eq!(files, vec![file]);
    }
}
