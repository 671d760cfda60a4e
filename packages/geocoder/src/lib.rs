#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City geocoding for the intervention map.
//!
//! Resolves city names to coordinates through Nominatim /
//! `OpenStreetMap`, configured via the TOML file in `services/`.
//! Nominatim has strict rate limits: **1 request per second** maximum
//! on the public instance, so every outbound call goes through the
//! pacing built into [`cache::GeocodeCache`], and every result —
//! match or no-match — is memoized for the life of the process so a
//! city is looked up at most once.

pub mod cache;
pub mod nominatim;

use serde::Deserialize;
use thiserror::Error;

/// A resolved map position (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Search endpoint URL.
    pub base_url: String,
    /// Country appended to every query (`"<city>, <country>"`).
    pub country: String,
    /// Minimum delay between requests in milliseconds.
    pub rate_limit_ms: u64,
}

const NOMINATIM_TOML: &str = include_str!("../services/nominatim.toml");

/// Returns the embedded Nominatim service configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (a compile-time guarantee
/// since the config ships with the crate).
#[must_use]
pub fn nominatim_service() -> GeocodingService {
    toml::de::from_str(NOMINATIM_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse geocoding service 'nominatim': {e}"))
}
