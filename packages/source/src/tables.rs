//! Readers for the three pre-aggregated CSV extracts.
//!
//! Each reader is factored over `impl Read` with a path-based wrapper,
//! looks columns up by header name, and never fails on a malformed
//! row — bad rows are skipped (or carry an invalid field marker),
//! only a missing column or an unreadable file is an error.

use std::io::Read;
use std::path::Path;

use chrono::NaiveTime;
use soccorso_map_intervention_models::{CityCount, CityExtremes, FieldValue, TimingRecord};

use crate::SourceError;
use crate::parsing;

/// `citta` column shared by the city-keyed extracts.
pub const COL_CITY: &str = "citta";
/// Intervention count column of the top-cities extract.
pub const COL_COUNT: &str = "count";
/// Duration column of the timing extract.
pub const COL_DURATION: &str = "durata_minuti";
/// Departure-time column of the timing extract.
pub const COL_DEPARTURE: &str = "ora_partenza_ambulanza";
/// Fast-percentage column of the extremes extract.
pub const COL_PCT_FAST: &str = "percentuale_rapidi";
/// Slow-percentage column of the extremes extract.
pub const COL_PCT_SLOW: &str = "percentuale_lenti";

const CITY_COUNTS_TABLE: &str = "the city counts extract";
const TIMING_TABLE: &str = "the intervention timing extract";
const EXTREMES_TABLE: &str = "the extreme distribution extract";

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn require_column(
    headers: &csv::StringRecord,
    name: &'static str,
    table: &'static str,
) -> Result<usize, SourceError> {
    column_index(headers, name).ok_or(SourceError::MissingColumn {
        column: name,
        table,
    })
}

/// Reads the city→intervention-count extract.
///
/// Rows with an empty city or unparsable count are skipped.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or a required
/// column is missing.
pub fn read_city_counts(path: &Path) -> Result<Vec<CityCount>, SourceError> {
    city_counts_from_reader(std::fs::File::open(path)?)
}

/// Reader-based form of [`read_city_counts`].
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV cannot be read or a required
/// column is missing.
pub fn city_counts_from_reader(reader: impl Read) -> Result<Vec<CityCount>, SourceError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let city_idx = require_column(&headers, COL_CITY, CITY_COUNTS_TABLE)?;
    let count_idx = require_column(&headers, COL_COUNT, CITY_COUNTS_TABLE)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let city = record.get(city_idx).map(str::trim).unwrap_or_default();
        let count = record.get(count_idx).and_then(parsing::parse_count);
        match (city, count) {
            ("", _) | (_, None) => {
                log::warn!("skipping malformed city count row: {record:?}");
            }
            (city, Some(count)) => rows.push(CityCount {
                city: city.to_string(),
                count,
            }),
        }
    }
    Ok(rows)
}

/// The per-intervention timing extract with per-dimension column
/// availability.
///
/// A dimension column absent from the header leaves every record's
/// field `Missing` and the corresponding accessor returns
/// [`SourceError::MissingColumn`], so the dashboard can mark just that
/// section unavailable.
#[derive(Debug, Clone)]
pub struct TimingTable {
    records: Vec<TimingRecord>,
    has_duration: bool,
    has_departure: bool,
    has_city: bool,
}

impl TimingTable {
    /// All records, with their per-field coercion outcomes.
    #[must_use]
    pub fn records(&self) -> &[TimingRecord] {
        &self.records
    }

    /// Validated durations in minutes, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if the extract has no
    /// duration column.
    pub fn valid_durations(&self) -> Result<Vec<f64>, SourceError> {
        if !self.has_duration {
            return Err(SourceError::MissingColumn {
                column: COL_DURATION,
                table: TIMING_TABLE,
            });
        }
        Ok(self
            .records
            .iter()
            .filter_map(|r| r.duration_minutes.into_valid())
            .collect())
    }

    /// Validated departure times, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if the extract has no
    /// departure-time column.
    pub fn valid_departures(&self) -> Result<Vec<NaiveTime>, SourceError> {
        if !self.has_departure {
            return Err(SourceError::MissingColumn {
                column: COL_DEPARTURE,
                table: TIMING_TABLE,
            });
        }
        Ok(self
            .records
            .iter()
            .filter_map(|r| r.departure_time.into_valid())
            .collect())
    }

    /// `(city, duration)` pairs for the per-city extreme split, from
    /// rows carrying both a city and a valid duration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if the extract has no
    /// city or no duration column.
    pub fn city_durations(&self) -> Result<Vec<(&str, f64)>, SourceError> {
        if !self.has_city {
            return Err(SourceError::MissingColumn {
                column: COL_CITY,
                table: TIMING_TABLE,
            });
        }
        if !self.has_duration {
            return Err(SourceError::MissingColumn {
                column: COL_DURATION,
                table: TIMING_TABLE,
            });
        }
        Ok(self
            .records
            .iter()
            .filter_map(|r| {
                let city = r.city.as_deref()?;
                let duration = r.duration_minutes.into_valid()?;
                Some((city, duration))
            })
            .collect())
    }
}

/// Reads the per-intervention timing extract.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read.
pub fn read_timing_table(path: &Path) -> Result<TimingTable, SourceError> {
    timing_table_from_reader(std::fs::File::open(path)?)
}

/// Reader-based form of [`read_timing_table`].
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV cannot be read.
pub fn timing_table_from_reader(reader: impl Read) -> Result<TimingTable, SourceError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let duration_idx = column_index(&headers, COL_DURATION);
    let departure_idx = column_index(&headers, COL_DEPARTURE);
    let city_idx = column_index(&headers, COL_CITY);

    let mut records = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let duration_minutes = duration_idx.map_or(FieldValue::Missing, |i| {
            FieldValue::from_raw(record.get(i), parsing::parse_minutes)
        });
        let departure_time = departure_idx.map_or(FieldValue::Missing, |i| {
            FieldValue::from_raw(record.get(i), parsing::parse_time_of_day)
        });
        let city = city_idx
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        records.push(TimingRecord {
            duration_minutes,
            departure_time,
            city,
        });
    }

    Ok(TimingTable {
        records,
        has_duration: duration_idx.is_some(),
        has_departure: departure_idx.is_some(),
        has_city: city_idx.is_some(),
    })
}

/// Reads the pre-aggregated per-city extreme distribution extract.
///
/// Rows with an empty city or unparsable percentage are skipped.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or a required
/// column is missing.
pub fn read_extremes_table(path: &Path) -> Result<Vec<CityExtremes>, SourceError> {
    extremes_from_reader(std::fs::File::open(path)?)
}

/// Reader-based form of [`read_extremes_table`].
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV cannot be read or a required
/// column is missing.
pub fn extremes_from_reader(reader: impl Read) -> Result<Vec<CityExtremes>, SourceError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let city_idx = require_column(&headers, COL_CITY, EXTREMES_TABLE)?;
    let fast_idx = require_column(&headers, COL_PCT_FAST, EXTREMES_TABLE)?;
    let slow_idx = require_column(&headers, COL_PCT_SLOW, EXTREMES_TABLE)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let city = record.get(city_idx).map(str::trim).unwrap_or_default();
        let pct_fast = record.get(fast_idx).and_then(parsing::parse_percentage);
        let pct_slow = record.get(slow_idx).and_then(parsing::parse_percentage);
        match (city, pct_fast, pct_slow) {
            (city, Some(pct_fast), Some(pct_slow)) if !city.is_empty() => rows.push(CityExtremes {
                city: city.to_string(),
                pct_fast,
                pct_slow,
            }),
            _ => log::warn!("skipping malformed extremes row: {record:?}"),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_city_counts_and_skips_bad_rows() {
        let csv = "citta,count\nRoma,120\nMilano,bad\n,50\nNapoli,80\n";
        let rows = city_counts_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].city, "Roma");
        assert_eq!(rows[0].count, 120);
        assert_eq!(rows[1].city, "Napoli");
    }

    #[test]
    fn city_counts_missing_column_is_an_error() {
        let csv = "citta,interventi\nRoma,120\n";
        let err = city_counts_from_reader(csv.as_bytes()).unwrap_err();
        match err {
            SourceError::MissingColumn { column, .. } => assert_eq!(column, COL_COUNT),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn timing_rows_carry_field_markers() {
        let csv = "durata_minuti,ora_partenza_ambulanza\n12,08:30\n-1,22:10\nbad,\n,25:99\n";
        let table = timing_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.records().len(), 4);

        assert_eq!(table.records()[0].duration_minutes, FieldValue::Valid(12.0));
        assert_eq!(table.records()[1].duration_minutes, FieldValue::Invalid);
        assert_eq!(table.records()[2].duration_minutes, FieldValue::Invalid);
        assert_eq!(table.records()[3].duration_minutes, FieldValue::Missing);

        assert!(table.records()[0].departure_time.is_valid());
        assert_eq!(table.records()[2].departure_time, FieldValue::Missing);
        assert_eq!(table.records()[3].departure_time, FieldValue::Invalid);

        let durations = table.valid_durations().unwrap();
        assert_eq!(durations, vec![12.0]);
        let departures = table.valid_departures().unwrap();
        assert_eq!(departures.len(), 2);
    }

    #[test]
    fn timing_without_departure_column_degrades_only_departures() {
        let csv = "durata_minuti\n5\n35\n";
        let table = timing_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.valid_durations().unwrap(), vec![5.0, 35.0]);
        assert!(matches!(
            table.valid_departures(),
            Err(SourceError::MissingColumn {
                column: COL_DEPARTURE,
                ..
            })
        ));
    }

    #[test]
    fn timing_city_durations_pairs() {
        let csv = "citta,durata_minuti\nRoma,5\nRoma,bad\n,12\nMilano,40\n";
        let table = timing_table_from_reader(csv.as_bytes()).unwrap();
        let pairs = table.city_durations().unwrap();
        assert_eq!(pairs, vec![("Roma", 5.0), ("Milano", 40.0)]);
    }

    #[test]
    fn reads_extremes_table() {
        let csv = "citta,percentuale_rapidi,percentuale_lenti\nRoma,41.5,9.2\nMilano,abc,1\n";
        let rows = extremes_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, "Roma");
        assert!((rows[0].pct_fast - 41.5).abs() < f64::EPSILON);
        assert!((rows[0].pct_slow - 9.2).abs() < f64::EPSILON);
    }

    #[test]
    fn extremes_missing_column_is_an_error() {
        let csv = "citta,percentuale_rapidi\nRoma,41.5\n";
        assert!(matches!(
            extremes_from_reader(csv.as_bytes()),
            Err(SourceError::MissingColumn {
                column: COL_PCT_SLOW,
                ..
            })
        ));
    }
}
