#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation output shapes.
//!
//! These types are what the aggregation pipeline hands to the
//! presentation layer, and they serialize directly into the chart
//! payloads of the JSON API. They are deliberately free of source
//! concerns — no `FieldValue`, no raw column names.

use serde::{Deserialize, Serialize};

/// Count of records in one bucket of a banded distribution.
///
/// A distribution is a `Vec<BucketCount>` in the band's canonical
/// order, with every band present (zero counts included) so charts are
/// stable run-to-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCount {
    /// Bucket display label.
    pub label: String,
    /// Number of records in the bucket.
    pub count: u64,
}

/// Percentage of records satisfying a predicate within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRate {
    /// Group key (typically a city).
    pub group: String,
    /// Percentage in `[0, 100]`.
    pub percentage: f64,
    /// Total records in the group (the rate denominator).
    pub total: u64,
}

/// Independent fast/slow percentages for one group.
///
/// The two percentages are not mutually exclusive categories — a
/// record can satisfy neither threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSplit {
    /// Group key (typically a city).
    pub group: String,
    /// Percentage of records at or below the fast threshold.
    pub pct_fast: f64,
    /// Percentage of records at or above the slow threshold.
    pub pct_slow: f64,
    /// Total records in the group.
    pub total: u64,
}

/// Count of one exploded tag across all records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    /// Tag value.
    pub tag: String,
    /// Number of occurrences (a record with the tag twice counts twice).
    pub count: u64,
}

/// One cell of the band × tag cross-tabulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandTagCount {
    /// Band display label (e.g. an age band).
    pub band: String,
    /// Tag value.
    pub tag: String,
    /// Number of occurrences in this cell.
    pub count: u64,
}

/// A city ready for map display: count plus derived radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary {
    /// City name.
    pub city: String,
    /// Intervention count.
    pub count: u64,
    /// Display radius in meters, scaled linearly with count.
    pub radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_count_serializes_camel_case() {
        let bucket = BucketCount {
            label: "≤10 min".to_string(),
            count: 4,
        };
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["label"], "≤10 min");
        assert_eq!(json["count"], 4);
    }

    #[test]
    fn group_split_serializes_camel_case() {
        let split = GroupSplit {
            group: "Roma".to_string(),
            pct_fast: 40.0,
            pct_slow: 10.0,
            total: 120,
        };
        let json = serde_json::to_value(&split).unwrap();
        assert_eq!(json["pctFast"], 40.0);
        assert_eq!(json["pctSlow"], 10.0);
    }
}
