//! Server configuration from environment variables.

use std::path::PathBuf;

use soccorso_map_analytics::{
    FAST_THRESHOLD_MINUTES, MIN_GROUP_SAMPLE, SLOW_THRESHOLD_MINUTES, TOP_SYMPTOM_COUNT,
    map::{BASE_RADIUS_METERS, RADIUS_INCREMENT_METERS},
};
use soccorso_map_source::documents::DocumentStore;

/// City→count extract filename under the data directory.
pub const CITY_COUNTS_FILE: &str = "top_citta_interventi.csv";
/// Per-intervention timing extract filename.
pub const TIMING_FILE: &str = "tempi_occupazione_ambulanza.csv";
/// Pre-aggregated extreme distribution extract filename.
pub const EXTREMES_FILE: &str = "distribuzione_ambulanze_estreme.csv";
/// Default collection export filename.
pub const DOCUMENTS_FILE: &str = "interventi.ndjson";

/// Runtime configuration for the dashboard server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the CSV extracts.
    pub data_dir: PathBuf,
    /// Where the intervention document collection lives.
    pub documents: DocumentStore,
    /// Fast threshold for the extreme split, in minutes.
    pub fast_threshold_minutes: f64,
    /// Slow threshold for the extreme split, in minutes.
    pub slow_threshold_minutes: f64,
    /// Minimum per-group sample size for rate charts.
    pub min_group_sample: u64,
    /// Top-N symptoms kept in the cross-tabulation.
    pub top_symptom_count: usize,
    /// Minimum map marker radius in meters.
    pub base_radius_meters: f64,
    /// Maximum marker radius increment in meters.
    pub radius_increment_meters: f64,
}

impl AppConfig {
    /// Builds the configuration from the environment.
    ///
    /// `DATA_DIR` defaults to `data`; the document collection comes
    /// from `DOCUMENTS_URL` (HTTP) when set, otherwise from
    /// `DOCUMENTS_PATH` (local export, default
    /// `<data_dir>/interventi.ndjson`).
    #[must_use]
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        let documents = std::env::var("DOCUMENTS_URL").ok().map_or_else(
            || {
                let path = std::env::var("DOCUMENTS_PATH")
                    .map_or_else(|_| data_dir.join(DOCUMENTS_FILE), PathBuf::from);
                DocumentStore::File(path)
            },
            DocumentStore::Http,
        );

        Self {
            data_dir,
            documents,
            fast_threshold_minutes: FAST_THRESHOLD_MINUTES,
            slow_threshold_minutes: SLOW_THRESHOLD_MINUTES,
            min_group_sample: MIN_GROUP_SAMPLE,
            top_symptom_count: TOP_SYMPTOM_COUNT,
            base_radius_meters: BASE_RADIUS_METERS,
            radius_increment_meters: RADIUS_INCREMENT_METERS,
        }
    }

    /// Path of the city counts extract.
    #[must_use]
    pub fn city_counts_path(&self) -> PathBuf {
        self.data_dir.join(CITY_COUNTS_FILE)
    }

    /// Path of the timing extract.
    #[must_use]
    pub fn timing_path(&self) -> PathBuf {
        self.data_dir.join(TIMING_FILE)
    }

    /// Path of the extreme distribution extract.
    #[must_use]
    pub fn extremes_path(&self) -> PathBuf {
        self.data_dir.join(EXTREMES_FILE)
    }
}
