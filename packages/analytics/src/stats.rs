//! Core rate, mean, distribution, and per-group aggregations.

use std::collections::BTreeMap;

use soccorso_map_analytics_models::{BucketCount, GroupRate, GroupSplit};
use soccorso_map_intervention_models::Band;

/// Percentage of `part` over `whole`.
///
/// Defined as `0.0` when `whole` is zero — a section with no valid
/// records renders as 0, it does not divide by zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rate(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Arithmetic mean. Returns `0.0` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Buckets every value and counts occurrences per band.
///
/// The output is re-ordered into the band's canonical sequence — not
/// frequency order — with zero-count bands included, so charts are
/// stable and comparable run-to-run. Values must already be validated;
/// there is no "unknown" bucket.
pub fn band_distribution<T, B: Band>(
    values: impl IntoIterator<Item = T>,
    bucketize: impl Fn(&T) -> B,
) -> Vec<BucketCount> {
    let mut counts: BTreeMap<B, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(bucketize(&value)).or_insert(0) += 1;
    }

    B::all()
        .iter()
        .map(|band| BucketCount {
            label: band.label().to_string(),
            count: counts.get(band).copied().unwrap_or(0),
        })
        .collect()
}

/// Per-group percentage of records whose flag is set.
///
/// Groups with fewer than `min_samples` records are dropped entirely.
/// Survivors are sorted by percentage descending, then by group name
/// for a deterministic tie order.
pub fn group_rates<'a>(
    records: impl IntoIterator<Item = (&'a str, bool)>,
    min_samples: u64,
) -> Vec<GroupRate> {
    let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for (group, flag) in records {
        let entry = totals.entry(group).or_insert((0, 0));
        entry.0 += 1;
        if flag {
            entry.1 += 1;
        }
    }

    let mut rates: Vec<GroupRate> = totals
        .into_iter()
        .filter(|(_, (total, _))| *total >= min_samples)
        .map(|(group, (total, hits))| GroupRate {
            group: group.to_string(),
            percentage: rate(hits, total),
            total,
        })
        .collect();

    rates.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.group.cmp(&b.group))
    });
    rates
}

/// Per-group percentages of fast (`duration <= fast_max`) and slow
/// (`duration >= slow_min`) records, computed independently.
///
/// The two shares can overlap conceptually or sum below 100 — a record
/// between the thresholds satisfies neither. Groups below
/// `min_samples` are dropped; survivors are sorted by fast percentage
/// descending, then by group name.
pub fn extreme_split<'a>(
    records: impl IntoIterator<Item = (&'a str, f64)>,
    fast_max: f64,
    slow_min: f64,
    min_samples: u64,
) -> Vec<GroupSplit> {
    let mut totals: BTreeMap<&str, (u64, u64, u64)> = BTreeMap::new();
    for (group, duration) in records {
        let entry = totals.entry(group).or_insert((0, 0, 0));
        entry.0 += 1;
        if duration <= fast_max {
            entry.1 += 1;
        }
        if duration >= slow_min {
            entry.2 += 1;
        }
    }

    let mut splits: Vec<GroupSplit> = totals
        .into_iter()
        .filter(|(_, (total, _, _))| *total >= min_samples)
        .map(|(group, (total, fast, slow))| GroupSplit {
            group: group.to_string(),
            pct_fast: rate(fast, total),
            pct_slow: rate(slow, total),
            total,
        })
        .collect();

    splits.sort_by(|a, b| {
        b.pct_fast
            .total_cmp(&a.pct_fast)
            .then_with(|| a.group.cmp(&b.group))
    });
    splits
}

#[cfg(test)]
mod tests {
    use super::*;
    use soccorso_map_intervention_models::{DurationBand, TimeOfDayBand};

    #[test]
    fn rate_zero_denominator_is_zero() {
        assert!((rate(0, 0) - 0.0).abs() < f64::EPSILON);
        assert!((rate(3, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_half_is_fifty() {
        assert!((rate(5, 10) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_empty_is_zero() {
        assert!((mean(&[]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_of_valid_scenario_durations() {
        // Raw input [5, 15, 25, 35, -1, "bad"] coerces to this valid set.
        let valid = [5.0, 15.0, 25.0, 35.0];
        assert!((mean(&valid) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn distribution_of_scenario_durations() {
        let valid = [5.0, 15.0, 25.0, 35.0];
        let dist = band_distribution(valid, |m| DurationBand::of_minutes(*m));
        let expected = [("≤10 min", 1), ("11–20 min", 1), ("21–30 min", 1), (">30 min", 1)];
        assert_eq!(dist.len(), expected.len());
        for (bucket, (label, count)) in dist.iter().zip(expected) {
            assert_eq!(bucket.label, label);
            assert_eq!(bucket.count, count);
        }
    }

    #[test]
    fn distribution_order_independent_of_input_order() {
        let forward = band_distribution([35.0, 5.0, 25.0, 15.0], |m| DurationBand::of_minutes(*m));
        let reverse = band_distribution([15.0, 25.0, 5.0, 35.0], |m| DurationBand::of_minutes(*m));
        assert_eq!(forward, reverse);
        let labels: Vec<&str> = forward.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["≤10 min", "11–20 min", "21–30 min", ">30 min"]);
    }

    #[test]
    fn distribution_includes_empty_buckets() {
        let dist = band_distribution([23u32, 1, 23], |h| TimeOfDayBand::of_hour(*h));
        assert_eq!(dist.len(), 6);
        assert_eq!(dist.last().unwrap().count, 3);
        assert!(dist.iter().take(5).all(|b| b.count == 0));
    }

    #[test]
    fn group_rates_drops_small_groups() {
        // X: 2/5 deaths (excluded, under the threshold); Y: 3/20 (15%).
        let mut records = Vec::new();
        for i in 0..5 {
            records.push(("X", i < 2));
        }
        for i in 0..20 {
            records.push(("Y", i < 3));
        }

        let rates = group_rates(records, 10);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].group, "Y");
        assert!((rates[0].percentage - 15.0).abs() < f64::EPSILON);
        assert_eq!(rates[0].total, 20);
    }

    #[test]
    fn group_rates_sorted_descending() {
        let mut records = Vec::new();
        for i in 0..10 {
            records.push(("Low", i < 1));
        }
        for i in 0..10 {
            records.push(("High", i < 9));
        }

        let rates = group_rates(records, 10);
        assert_eq!(rates[0].group, "High");
        assert_eq!(rates[1].group, "Low");
    }

    #[test]
    fn extreme_split_categories_are_independent() {
        // 10 records: 4 fast (<=10), 2 slow (>=30), 4 in between.
        let records: Vec<(&str, f64)> = [5.0, 8.0, 10.0, 9.0, 15.0, 20.0, 25.0, 29.0, 30.0, 45.0]
            .into_iter()
            .map(|d| ("A", d))
            .collect();

        let splits = extreme_split(records, 10.0, 30.0, 10);
        assert_eq!(splits.len(), 1);
        assert!((splits[0].pct_fast - 40.0).abs() < f64::EPSILON);
        assert!((splits[0].pct_slow - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn extreme_split_drops_small_groups() {
        let records = vec![("A", 5.0), ("A", 35.0), ("B", 5.0)];
        let splits = extreme_split(records, 10.0, 30.0, 2);
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].group, "A");
    }
}
