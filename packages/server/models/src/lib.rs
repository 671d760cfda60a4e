#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the intervention dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are
//! separate from the aggregation output types to allow independent
//! evolution of the API contract; chart payloads embed the shapes from
//! `soccorso_map_analytics_models` directly.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Envelope for one dashboard section.
///
/// Every failure mode of a section — unreadable extract, missing
/// column, unreachable collection — degrades to `Unavailable` with a
/// human-readable reason; the rest of the page keeps rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ApiSection<T> {
    /// Section computed successfully.
    Ready {
        /// The section payload.
        data: T,
    },
    /// Section could not be computed this render.
    Unavailable {
        /// Why the section is unavailable.
        reason: String,
    },
}

impl<T> ApiSection<T> {
    /// Wraps a computed payload.
    pub const fn ready(data: T) -> Self {
        Self::Ready { data }
    }

    /// Marks the section unavailable with a reason.
    pub fn unavailable(reason: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            reason: reason.to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// A map coordinate (WGS84).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPoint {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// One geocoded city marker for the map layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapCity {
    /// City name.
    pub city: String,
    /// Intervention count.
    pub count: u64,
    /// Marker position.
    pub position: ApiPoint,
    /// Marker radius in meters.
    pub radius: f64,
}

/// Marker fill color: dark red, semi-transparent RGBA.
pub const MARKER_FILL_RGBA: [u8; 4] = [178, 34, 34, 140];

/// The full map layer: resolved city markers plus the initial view
/// center (mean of the resolved positions).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapLayer {
    /// Initial view center; absent when no city resolved.
    pub center: Option<ApiPoint>,
    /// Marker fill color shared by every city, RGBA.
    pub fill_color: [u8; 4],
    /// Geocoded city markers. Cities that could not be resolved are
    /// excluded.
    pub cities: Vec<ApiMapCity>,
}

/// Assessment of the mean intervention duration against the national
/// response-time guidance: ≤ 8 minutes for urban areas, ≤ 20 minutes
/// for extra-urban areas.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseAssessment {
    /// Mean within the urban 8-minute target.
    Good,
    /// Mean acceptable extra-urban, above the urban target.
    Warning,
    /// Mean above the 20-minute extra-urban threshold.
    Critical,
}

impl ResponseAssessment {
    /// Classifies a mean duration in minutes. Boundaries are
    /// closed-upper: exactly 8 minutes is still `Good`, exactly 20
    /// still `Warning`.
    #[must_use]
    pub fn of_minutes(minutes: f64) -> Self {
        if minutes <= 8.0 {
            Self::Good
        } else if minutes <= 20.0 {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

/// Mean intervention duration metric.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeanDuration {
    /// Mean duration in minutes (0 when no valid records).
    pub minutes: f64,
    /// Assessment against the response-time guidance.
    pub assessment: ResponseAssessment,
    /// Number of valid records behind the mean.
    pub sample_size: u64,
}

/// National death-on-scene metric.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeathRate {
    /// Percentage of interventions with death on scene.
    pub percentage: f64,
    /// Death-on-scene count.
    pub deaths: u64,
    /// Evaluated intervention count (the denominator).
    pub total: u64,
}

/// The scalar metrics section. Each metric degrades independently —
/// a missing extract takes down one number, not the whole readout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    /// Mean intervention duration.
    pub mean_duration: ApiSection<ApiMeanDuration>,
    /// National death-on-scene percentage.
    pub death_rate: ApiSection<ApiDeathRate>,
    /// Total interventions in the document collection.
    pub total_interventions: ApiSection<u64>,
}
