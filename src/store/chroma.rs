//! Chroma-backed [`ProfileStore`] over the HTTP API.
//!
//! [`ChromaStore::connect`] performs a get-or-create of the named collection
//! (cosine space) and pins its UUID; `get` and `upsert` then address the
//! collection directly. No retries here — a failed store call propagates to
//! the caller immediately.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::StoreConfig;
use crate::models::ProfileDocument;

use super::{ProfileStore, StoredRecord};

pub struct ChromaStore {
    client: reqwest::Client,
    base_url: String,
    collection_id: String,
}

impl ChromaStore {
    /// Connect to Chroma and get-or-create the configured collection.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = config.url.trim_end_matches('/').to_string();

        let resp = client
            .post(format!("{}/api/v1/collections", base_url))
            .json(&json!({
                "name": &config.collection,
                "get_or_create": true,
                "metadata": { "hnsw:space": "cosine" },
            }))
            .send()
            .await
            .with_context(|| format!("Chroma unreachable at {}", base_url))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Chroma collection create failed {}: {}", status, body);
        }

        let body: Value = resp.json().await?;
        let collection_id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("Invalid Chroma response: missing collection id"))?
            .to_string();

        Ok(Self {
            client,
            base_url,
            collection_id,
        })
    }

    fn collection_url(&self, op: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{}",
            self.base_url, self.collection_id, op
        )
    }
}

#[async_trait]
impl ProfileStore for ChromaStore {
    async fn get(&self, id: &str) -> Result<Option<StoredRecord>> {
        let resp = self
            .client
            .post(self.collection_url("get"))
            .json(&json!({
                "ids": [id],
                "include": ["metadatas"],
            }))
            .send()
            .await
            .context("Chroma get failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Chroma get failed {}: {}", status, body);
        }

        let body: Value = resp.json().await?;
        let found = body
            .get("ids")
            .and_then(Value::as_array)
            .is_some_and(|ids| !ids.is_empty());
        if !found {
            return Ok(None);
        }

        let metadata = body
            .get("metadatas")
            .and_then(Value::as_array)
            .and_then(|m| m.first())
            .cloned()
            .unwrap_or(Value::Null);

        let content_sha256 = metadata
            .get("content_sha256")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Some(StoredRecord {
            id: id.to_string(),
            content_sha256,
            metadata,
        }))
    }

    async fn upsert(&self, doc: &ProfileDocument, vector: &[f32]) -> Result<()> {
        let resp = self
            .client
            .post(self.collection_url("upsert"))
            .json(&json!({
                "ids": [&doc.id],
                "embeddings": [vector],
                "metadatas": [scrub_metadata(&doc.metadata)],
                "documents": [&doc.text],
            }))
            .send()
            .await
            .context("Chroma upsert failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Chroma upsert failed {}: {}", status, body);
        }

        Ok(())
    }
}

/// Drop `null` entries from a metadata object.
///
/// Chroma accepts only scalar metadata values; absent profile fields are
/// simply not stored rather than sent as nulls.
fn scrub_metadata(metadata: &Value) -> Value {
    match metadata.as_object() {
        Some(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        None => metadata.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_metadata_drops_nulls() {
        let metadata = json!({
            "profile_id": "p1",
            "total_items": 40,
            "resolution": null,
        });
        let scrubbed = scrub_metadata(&metadata);
        let map = scrubbed.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("resolution"));
        assert_eq!(map["profile_id"], "p1");
    }

    #[test]
    fn test_scrub_metadata_passes_non_objects_through() {
        assert_eq!(scrub_metadata(&Value::Null), Value::Null);
    }
}
