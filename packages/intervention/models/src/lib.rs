#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Intervention record types and bucket taxonomies.
//!
//! This crate defines the canonical record shapes read from the CSV
//! extracts and the document-store collection, plus the fixed bucket
//! partitions (duration, time of day, age) that every chart in the
//! dashboard is built from. All coercion from raw strings/JSON into
//! these types happens in `soccorso_map_source`; by the time a value
//! reaches a bucket constructor it has already been validated.

use chrono::{NaiveTime, Timelike as _};
use serde::{Deserialize, Serialize};

/// Result of coercing a raw field into a typed value.
///
/// `Missing` means the field was absent or empty in the source record;
/// `Invalid` means it was present but unparsable (or out of domain,
/// e.g. a negative duration). Aggregations consume only `Valid` values
/// — invalid values are dropped, never bucketed as "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<T> {
    /// Field absent or empty in the source record.
    Missing,
    /// Field present but unparsable or outside the valid domain.
    Invalid,
    /// Field parsed and validated.
    Valid(T),
}

impl<T> FieldValue<T> {
    /// Returns the contained value if valid.
    pub const fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Missing | Self::Invalid => None,
        }
    }

    /// Consumes the marker, returning the contained value if valid.
    pub fn into_valid(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Missing | Self::Invalid => None,
        }
    }

    /// Returns `true` if the field holds a validated value.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Coerces a raw string field.
    ///
    /// `None` or a blank string maps to `Missing`; a parse failure maps
    /// to `Invalid`.
    pub fn from_raw(raw: Option<&str>, parse: impl FnOnce(&str) -> Option<T>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Missing,
            Some(s) => parse(s).map_or(Self::Invalid, Self::Valid),
        }
    }
}

/// A fixed, ordered, exhaustive partition of a value domain.
///
/// `all()` defines the canonical chart order; aggregation output is
/// always re-ordered into it regardless of input order.
pub trait Band: Copy + Ord + 'static {
    /// All bands in canonical display order.
    fn all() -> &'static [Self];

    /// Display label for this band.
    fn label(self) -> &'static str;
}

/// Duration bands for intervention occupation time, in minutes.
///
/// Closed-upper boundaries: a 10-minute intervention is `UpTo10`, an
/// 11-minute one is `From11To20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DurationBand {
    /// 0–10 minutes inclusive.
    UpTo10,
    /// 11–20 minutes.
    From11To20,
    /// 21–30 minutes.
    From21To30,
    /// More than 30 minutes.
    Over30,
}

impl DurationBand {
    /// Buckets a validated, non-negative duration in minutes.
    #[must_use]
    pub fn of_minutes(minutes: f64) -> Self {
        if minutes <= 10.0 {
            Self::UpTo10
        } else if minutes <= 20.0 {
            Self::From11To20
        } else if minutes <= 30.0 {
            Self::From21To30
        } else {
            Self::Over30
        }
    }
}

impl Band for DurationBand {
    fn all() -> &'static [Self] {
        &[
            Self::UpTo10,
            Self::From11To20,
            Self::From21To30,
            Self::Over30,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::UpTo10 => "≤10 min",
            Self::From11To20 => "11–20 min",
            Self::From21To30 => "21–30 min",
            Self::Over30 => ">30 min",
        }
    }
}

/// Time-of-day bands for ambulance departure times. Six four-hour
/// bands; the night band spans midnight (22:00–01:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeOfDayBand {
    /// 02:00–05:59.
    EarlyMorning,
    /// 06:00–09:59.
    Morning,
    /// 10:00–13:59.
    Midday,
    /// 14:00–17:59.
    Afternoon,
    /// 18:00–21:59.
    Evening,
    /// 22:00–01:59 — wraps around midnight.
    Night,
}

impl TimeOfDayBand {
    /// Buckets an hour of day in `[0, 24)`.
    ///
    /// The night band wraps midnight, so membership is the modular
    /// check `hour >= 22 || hour < 2` — a plain range compare would
    /// misplace 01:00.
    #[must_use]
    pub const fn of_hour(hour: u32) -> Self {
        if hour >= 22 || hour < 2 {
            Self::Night
        } else if hour < 6 {
            Self::EarlyMorning
        } else if hour < 10 {
            Self::Morning
        } else if hour < 14 {
            Self::Midday
        } else if hour < 18 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    /// Buckets a validated departure time.
    #[must_use]
    pub fn of_time(time: NaiveTime) -> Self {
        Self::of_hour(time.hour())
    }
}

impl Band for TimeOfDayBand {
    fn all() -> &'static [Self] {
        &[
            Self::EarlyMorning,
            Self::Morning,
            Self::Midday,
            Self::Afternoon,
            Self::Evening,
            Self::Night,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::EarlyMorning => "02:00–05:59",
            Self::Morning => "06:00–09:59",
            Self::Midday => "10:00–13:59",
            Self::Afternoon => "14:00–17:59",
            Self::Evening => "18:00–21:59",
            Self::Night => "22:00–01:59",
        }
    }
}

/// Patient age bands for the symptom cross-tabulation.
///
/// Closed-upper boundaries, like [`DurationBand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeBand {
    /// 0–17 years.
    Minor,
    /// 18–40 years.
    YoungAdult,
    /// 41–65 years.
    MiddleAge,
    /// Over 65 years.
    Senior,
}

impl AgeBand {
    /// Buckets a validated, non-negative age in years.
    #[must_use]
    pub fn of_years(years: f64) -> Self {
        if years <= 17.0 {
            Self::Minor
        } else if years <= 40.0 {
            Self::YoungAdult
        } else if years <= 65.0 {
            Self::MiddleAge
        } else {
            Self::Senior
        }
    }
}

impl Band for AgeBand {
    fn all() -> &'static [Self] {
        &[
            Self::Minor,
            Self::YoungAdult,
            Self::MiddleAge,
            Self::Senior,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Minor => "0–17",
            Self::YoungAdult => "18–40",
            Self::MiddleAge => "41–65",
            Self::Senior => ">65",
        }
    }
}

/// One row of the per-intervention timing extract.
///
/// Both dimension fields carry their coercion outcome so each
/// aggregation can filter on exactly the fields it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    /// Ambulance occupation time in minutes.
    pub duration_minutes: FieldValue<f64>,
    /// Ambulance departure time of day.
    pub departure_time: FieldValue<NaiveTime>,
    /// City, when the extract carries the column.
    pub city: Option<String>,
}

/// One intervention document from the document-store collection.
///
/// Every field is optional; coercion never fails, it only leaves
/// fields absent (or the symptom list empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterventionDocument {
    /// City where the intervention took place.
    pub city: Option<String>,
    /// Whether the patient died on scene.
    pub death_on_scene: Option<bool>,
    /// Reported symptom tags; zero or more, duplicates preserved.
    pub symptoms: Vec<String>,
    /// Patient age in years.
    pub age: Option<f64>,
}

/// A city with its intervention count, from the top-cities extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityCount {
    /// City name, unique within the extract.
    pub city: String,
    /// Number of interventions.
    pub count: u64,
}

/// Pre-aggregated fast/slow percentages for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityExtremes {
    /// City name.
    pub city: String,
    /// Percentage of interventions at or below the fast threshold.
    pub pct_fast: f64,
    /// Percentage of interventions at or above the slow threshold.
    pub pct_slow: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_bands_closed_upper() {
        assert_eq!(DurationBand::of_minutes(0.0), DurationBand::UpTo10);
        assert_eq!(DurationBand::of_minutes(10.0), DurationBand::UpTo10);
        assert_eq!(DurationBand::of_minutes(11.0), DurationBand::From11To20);
        assert_eq!(DurationBand::of_minutes(20.0), DurationBand::From11To20);
        assert_eq!(DurationBand::of_minutes(21.0), DurationBand::From21To30);
        assert_eq!(DurationBand::of_minutes(30.0), DurationBand::From21To30);
        assert_eq!(DurationBand::of_minutes(30.5), DurationBand::Over30);
    }

    #[test]
    fn duration_band_monotonic() {
        let mut last = DurationBand::of_minutes(0.0);
        for tenths in 0..=500 {
            let band = DurationBand::of_minutes(f64::from(tenths) / 10.0);
            assert!(band >= last, "band regressed at {tenths} tenths");
            last = band;
        }
    }

    #[test]
    fn every_hour_has_exactly_one_band() {
        for hour in 0..24 {
            let band = TimeOfDayBand::of_hour(hour);
            let matching = TimeOfDayBand::all()
                .iter()
                .filter(|b| **b == band)
                .count();
            assert_eq!(matching, 1, "hour {hour}");
        }
    }

    #[test]
    fn night_band_wraps_midnight() {
        assert_eq!(TimeOfDayBand::of_hour(23), TimeOfDayBand::Night);
        assert_eq!(TimeOfDayBand::of_hour(1), TimeOfDayBand::Night);
        assert_ne!(TimeOfDayBand::of_hour(2), TimeOfDayBand::Night);
        assert_ne!(TimeOfDayBand::of_hour(21), TimeOfDayBand::Night);
    }

    #[test]
    fn two_am_is_early_morning() {
        assert_eq!(TimeOfDayBand::of_hour(2), TimeOfDayBand::EarlyMorning);
    }

    #[test]
    fn time_band_from_naive_time() {
        let t = NaiveTime::from_hms_opt(22, 15, 0).unwrap();
        assert_eq!(TimeOfDayBand::of_time(t), TimeOfDayBand::Night);
    }

    #[test]
    fn age_bands_closed_upper() {
        assert_eq!(AgeBand::of_years(17.0), AgeBand::Minor);
        assert_eq!(AgeBand::of_years(18.0), AgeBand::YoungAdult);
        assert_eq!(AgeBand::of_years(40.0), AgeBand::YoungAdult);
        assert_eq!(AgeBand::of_years(41.0), AgeBand::MiddleAge);
        assert_eq!(AgeBand::of_years(65.0), AgeBand::MiddleAge);
        assert_eq!(AgeBand::of_years(66.0), AgeBand::Senior);
    }

    #[test]
    fn band_labels_unique() {
        fn assert_unique<B: Band + std::fmt::Debug>() {
            let mut seen = std::collections::BTreeSet::new();
            for band in B::all() {
                assert!(seen.insert(band.label()), "duplicate label {band:?}");
            }
        }
        assert_unique::<DurationBand>();
        assert_unique::<TimeOfDayBand>();
        assert_unique::<AgeBand>();
    }

    #[test]
    fn field_value_from_raw() {
        let parse = |s: &str| s.parse::<f64>().ok();
        assert_eq!(FieldValue::from_raw(None, parse), FieldValue::Missing);
        assert_eq!(FieldValue::from_raw(Some("  "), parse), FieldValue::Missing);
        assert_eq!(FieldValue::from_raw(Some("bad"), parse), FieldValue::Invalid);
        assert_eq!(
            FieldValue::from_raw(Some("12.5"), parse),
            FieldValue::Valid(12.5)
        );
    }

    #[test]
    fn field_value_accessors() {
        let valid: FieldValue<u32> = FieldValue::Valid(3);
        assert_eq!(valid.valid(), Some(&3));
        assert!(valid.is_valid());
        assert_eq!(valid.into_valid(), Some(3));

        let invalid: FieldValue<u32> = FieldValue::Invalid;
        assert_eq!(invalid.valid(), None);
        assert_eq!(invalid.into_valid(), None);
    }
}
