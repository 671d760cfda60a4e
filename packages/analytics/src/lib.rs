#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Descriptive-statistics aggregation pipeline.
//!
//! Pure single-pass aggregations over already-coerced records: banded
//! distributions, percentages, per-group rates, the fast/slow extreme
//! split, and the exploded symptom counts. No I/O — record reading
//! lives in `soccorso_map_source`, and callers filter out invalid
//! field values before anything here runs.

pub mod map;
pub mod stats;
pub mod tags;

/// Minimum records a group needs before its rate is reported.
///
/// Groups below this threshold are dropped to avoid small-sample
/// noise dominating the per-city charts.
pub const MIN_GROUP_SAMPLE: u64 = 10;

/// Default fast threshold for the extreme split, in minutes.
///
/// Matches the upstream aggregation that produces the pre-computed
/// extremes extract (`percentuale_rapidi` = share ≤ 10 min).
pub const FAST_THRESHOLD_MINUTES: f64 = 10.0;

/// Default slow threshold for the extreme split, in minutes.
///
/// Matches the upstream aggregation (`percentuale_lenti` = share
/// ≥ 30 min).
pub const SLOW_THRESHOLD_MINUTES: f64 = 30.0;

/// Number of top symptoms kept in the symptom × age cross-tabulation.
pub const TOP_SYMPTOM_COUNT: usize = 10;
