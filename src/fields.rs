//! Field extraction from raw profile JSON.
//!
//! Navigates the nested profile schema and produces a flat [`ProfileFields`]
//! mapping. Extraction is pure and total: every traversal step tolerates a
//! missing container, so a completely empty `data` subtree yields all-`None`
//! derived fields rather than an error.

use serde_json::Value;

use crate::models::ProfileFields;

/// Flatten a raw profile into its high-signal fields.
pub fn extract(profile: &Value) -> ProfileFields {
    let coverage_checks = profile
        .pointer("/data/data_quality/target_time_series/coverage/checks")
        .and_then(Value::as_array);
    let history = coverage_checks.and_then(|c| find_check(c, "history_length"));
    let exposure = coverage_checks.and_then(|c| find_check(c, "exposure_availability"));

    let history_details = history.and_then(|c| c.get("details"));
    let exposure_details = exposure.and_then(|c| c.get("details"));

    let zeros = profile
        .pointer("/data/data_quality/target_time_series/plausibility/checks")
        .and_then(Value::as_array)
        .and_then(|c| find_check(c, "zero_target_values"));

    let high_zero_items_count = zeros
        .and_then(|c| c.get("findings"))
        .and_then(Value::as_array)
        .and_then(|findings| findings.first())
        .and_then(|f| f.get("affected_count"))
        .and_then(Value::as_i64);

    // Trend statistics arrive under data.data.trend — one level deeper than
    // the item_distribution block below. The feed nests them that way; read
    // both paths as-is.
    let r_squared = profile.pointer("/data/data/trend/statistical_metrics/r_squared");
    let item_dist = profile.pointer("/data/trend/item_distribution");

    ProfileFields {
        profile_id: str_field(profile, "profileId"),
        snapshot_id: str_field(profile, "snapshotId"),
        use_case_id: str_field(profile, "useCaseId"),
        profile_type: str_field(profile, "profileType"),
        created_at: str_field(profile, "createdAt"),
        updated_at: str_field(profile, "updatedAt"),
        resolution: history_details.and_then(|d| str_field(d, "resolution")),
        min_history_length: int_at(history_details, "min_history_length"),
        max_history_length: int_at(history_details, "max_history_length"),
        avg_history_length: float_at(history_details, "avg_history_length"),
        items_analyzed: int_at(history_details, "items_analyzed"),
        default_exposure_rate: float_at(exposure_details, "default_exposure_rate"),
        exposure_variance: float_at(exposure_details, "overall_exposure_variance"),
        overall_zero_ratio: float_at(zeros.and_then(|c| c.get("details")), "overall_zero_ratio"),
        high_zero_items_count,
        trend_r2_mean: float_at(r_squared, "mean"),
        strong_trends_count: int_at(r_squared, "strong_trends_count"),
        upward_items: int_at(item_dist, "upward_trend"),
        downward_items: int_at(item_dist, "downward_trend"),
        no_trend_items: int_at(item_dist, "no_trend"),
        total_items: int_at(item_dist, "total_items"),
    }
}

/// Locate the first check object whose `check` name matches.
///
/// Checks lists may contain duplicates; later duplicates are ignored.
fn find_check<'a>(checks: &'a [Value], name: &str) -> Option<&'a Value> {
    checks
        .iter()
        .find(|c| c.get("check").and_then(Value::as_str) == Some(name))
}

fn str_field(container: &Value, key: &str) -> Option<String> {
    container
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn int_at(container: Option<&Value>, key: &str) -> Option<i64> {
    container
        .and_then(|c| c.get(key))
        .and_then(Value::as_i64)
}

fn float_at(container: Option<&Value>, key: &str) -> Option<f64> {
    container
        .and_then(|c| c.get(key))
        .and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_profile() -> Value {
        json!({
            "profileId": "prof-42",
            "snapshotId": "snap-7",
            "useCaseId": "uc-demand",
            "profileType": "pooled",
            "createdAt": "2026-01-05T10:00:00Z",
            "updatedAt": "2026-01-06T10:00:00Z",
            "data": {
                "data_quality": {
                    "target_time_series": {
                        "coverage": {
                            "checks": [
                                {
                                    "check": "history_length",
                                    "details": {
                                        "resolution": "daily",
                                        "min_history_length": 30,
                                        "max_history_length": 365,
                                        "avg_history_length": 182.5,
                                        "items_analyzed": 1200
                                    }
                                },
                                {
                                    "check": "exposure_availability",
                                    "details": {
                                        "default_exposure_rate": 0.92,
                                        "overall_exposure_variance": 0.04
                                    }
                                }
                            ]
                        },
                        "plausibility": {
                            "checks": [
                                {
                                    "check": "zero_target_values",
                                    "details": { "overall_zero_ratio": 0.18 },
                                    "findings": [
                                        { "affected_count": 37 },
                                        { "affected_count": 99 }
                                    ]
                                }
                            ]
                        }
                    }
                },
                "data": {
                    "trend": {
                        "statistical_metrics": {
                            "r_squared": { "mean": 0.61, "strong_trends_count": 140 }
                        }
                    }
                },
                "trend": {
                    "item_distribution": {
                        "upward_trend": 300,
                        "downward_trend": 150,
                        "no_trend": 750,
                        "total_items": 1200
                    }
                }
            }
        })
    }

    #[test]
    fn test_extract_full_profile() {
        let fields = extract(&full_profile());

        assert_eq!(fields.profile_id.as_deref(), Some("prof-42"));
        assert_eq!(fields.snapshot_id.as_deref(), Some("snap-7"));
        assert_eq!(fields.use_case_id.as_deref(), Some("uc-demand"));
        assert_eq!(fields.profile_type.as_deref(), Some("pooled"));
        assert_eq!(fields.created_at.as_deref(), Some("2026-01-05T10:00:00Z"));
        assert_eq!(fields.updated_at.as_deref(), Some("2026-01-06T10:00:00Z"));
        assert_eq!(fields.resolution.as_deref(), Some("daily"));
        assert_eq!(fields.min_history_length, Some(30));
        assert_eq!(fields.max_history_length, Some(365));
        assert_eq!(fields.avg_history_length, Some(182.5));
        assert_eq!(fields.items_analyzed, Some(1200));
        assert_eq!(fields.default_exposure_rate, Some(0.92));
        assert_eq!(fields.exposure_variance, Some(0.04));
        assert_eq!(fields.overall_zero_ratio, Some(0.18));
        assert_eq!(fields.high_zero_items_count, Some(37));
        assert_eq!(fields.trend_r2_mean, Some(0.61));
        assert_eq!(fields.strong_trends_count, Some(140));
        assert_eq!(fields.upward_items, Some(300));
        assert_eq!(fields.downward_items, Some(150));
        assert_eq!(fields.no_trend_items, Some(750));
        assert_eq!(fields.total_items, Some(1200));
    }

    #[test]
    fn test_extract_empty_object_is_total() {
        let fields = extract(&json!({}));
        assert_eq!(fields, ProfileFields::default());
    }

    #[test]
    fn test_extract_empty_data_subtree() {
        let fields = extract(&json!({"profileId": "p1", "data": {}}));
        assert_eq!(fields.profile_id.as_deref(), Some("p1"));
        assert_eq!(fields.resolution, None);
        assert_eq!(fields.total_items, None);
        assert_eq!(fields.trend_r2_mean, None);
        assert_eq!(fields.high_zero_items_count, None);
    }

    #[test]
    fn test_first_matching_check_wins() {
        let profile = json!({
            "data": { "data_quality": { "target_time_series": { "coverage": {
                "checks": [
                    { "check": "history_length", "details": { "items_analyzed": 10 } },
                    { "check": "history_length", "details": { "items_analyzed": 99 } }
                ]
            }}}}
        });
        assert_eq!(extract(&profile).items_analyzed, Some(10));
    }

    #[test]
    fn test_empty_findings_yield_none() {
        let profile = json!({
            "data": { "data_quality": { "target_time_series": { "plausibility": {
                "checks": [
                    {
                        "check": "zero_target_values",
                        "details": { "overall_zero_ratio": 0.5 },
                        "findings": []
                    }
                ]
            }}}}
        });
        let fields = extract(&profile);
        assert_eq!(fields.overall_zero_ratio, Some(0.5));
        assert_eq!(fields.high_zero_items_count, None);
    }

    #[test]
    fn test_trend_statistics_not_read_from_shallow_path() {
        // Statistics placed at data.trend (where item_distribution lives) must
        // not be picked up — they belong one level deeper, at data.data.trend.
        let profile = json!({
            "data": {
                "trend": {
                    "statistical_metrics": {
                        "r_squared": { "mean": 0.9, "strong_trends_count": 5 }
                    },
                    "item_distribution": { "total_items": 40 }
                }
            }
        });
        let fields = extract(&profile);
        assert_eq!(fields.trend_r2_mean, None);
        assert_eq!(fields.strong_trends_count, None);
        assert_eq!(fields.total_items, Some(40));
    }

    #[test]
    fn test_unknown_check_names_are_ignored() {
        let profile = json!({
            "data": { "data_quality": { "target_time_series": { "coverage": {
                "checks": [
                    { "check": "somewhere_else", "details": { "items_analyzed": 3 } }
                ]
            }}}}
        });
        assert_eq!(extract(&profile).items_analyzed, None);
    }
}
