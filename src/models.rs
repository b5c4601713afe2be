//! Core data models used throughout Profile Index.
//!
//! These types represent the flattened profile attributes and the documents
//! that flow through the extraction and upsert pipeline.

use serde::{Deserialize, Serialize};

/// Flat, high-signal attributes extracted from a raw profile.
///
/// Every field is independently optional: an absent source key yields `None`,
/// never an extraction failure. `profile_id` is required downstream (it is the
/// document id) but extraction itself does not enforce that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub profile_id: Option<String>,
    pub snapshot_id: Option<String>,
    pub use_case_id: Option<String>,
    pub profile_type: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Time-series resolution reported by the history-length check (e.g. `"daily"`).
    pub resolution: Option<String>,
    pub min_history_length: Option<i64>,
    pub max_history_length: Option<i64>,
    pub avg_history_length: Option<f64>,
    pub items_analyzed: Option<i64>,
    pub default_exposure_rate: Option<f64>,
    pub exposure_variance: Option<f64>,
    pub overall_zero_ratio: Option<f64>,
    /// `affected_count` of the first zero-values finding, when any was reported.
    pub high_zero_items_count: Option<i64>,
    pub trend_r2_mean: Option<f64>,
    pub strong_trends_count: Option<i64>,
    pub upward_items: Option<i64>,
    pub downward_items: Option<i64>,
    pub no_trend_items: Option<i64>,
    pub total_items: Option<i64>,
}

/// The unit written to the vector store: summary text plus flat metadata,
/// keyed by profile id. Always built fresh — never partially updated.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDocument {
    pub id: String,
    pub text: String,
    pub metadata: serde_json::Value,
}

/// What the orchestrator decided to do with a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Inserted,
    Updated,
    Skipped,
}

impl UpsertAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertAction::Inserted => "inserted",
            UpsertAction::Updated => "updated",
            UpsertAction::Skipped => "skipped",
        }
    }
}

/// Outcome of a single upsert: the document id and the action taken.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertReceipt {
    pub profile_id: String,
    pub action: UpsertAction,
}
