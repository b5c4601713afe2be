//! Fixed-template semantic summary rendering.
//!
//! Renders [`ProfileFields`] into the natural-language text that gets
//! embedded. The template shape is constant: no sentence is omitted when its
//! fields are missing — absent values render as the literal text `None`, so a
//! sparse profile still produces the full structure.

use std::fmt::Display;

use crate::models::ProfileFields;

/// Render the multi-sentence summary for a profile.
pub fn build_summary(fields: &ProfileFields) -> String {
    format!(
        "Profile {} (type={}) snapshot={} use_case={}. \
         {} items at {} with history_min/max/avg={}/{}/{}. \
         Zero ratio={}; high-zero items={}. \
         Exposure default rate={} variance={}. \
         Trend: R2_mean={}, strong_trends={}, counts(up={}, down={}, none={}). \
         Timestamps created={} updated={}.",
        opt(&fields.profile_id),
        opt(&fields.profile_type),
        opt(&fields.snapshot_id),
        opt(&fields.use_case_id),
        opt(&fields.total_items),
        opt(&fields.resolution),
        opt(&fields.min_history_length),
        opt(&fields.max_history_length),
        opt(&fields.avg_history_length),
        opt(&fields.overall_zero_ratio),
        opt(&fields.high_zero_items_count),
        opt(&fields.default_exposure_rate),
        opt(&fields.exposure_variance),
        opt(&fields.trend_r2_mean),
        opt(&fields.strong_trends_count),
        opt(&fields.upward_items),
        opt(&fields.downward_items),
        opt(&fields.no_trend_items),
        opt(&fields.created_at),
        opt(&fields.updated_at),
    )
}

fn opt<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}
