//! Map-layer derivations: display radii and the initial view center.

use soccorso_map_analytics_models::CitySummary;
use soccorso_map_intervention_models::CityCount;

/// Minimum display radius in meters for a city marker.
pub const BASE_RADIUS_METERS: f64 = 3000.0;

/// Maximum radius increment in meters, reached by the busiest city.
pub const RADIUS_INCREMENT_METERS: f64 = 15000.0;

/// Scales a marker radius linearly with the city's share of the
/// maximum count: `base + count / max_count × increment`.
///
/// With no data (`max_count == 0`) every marker gets the base radius.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scale_radius(count: u64, max_count: u64, base: f64, increment: f64) -> f64 {
    if max_count == 0 {
        return base;
    }
    base + count as f64 / max_count as f64 * increment
}

/// Derives display radii for every city, scaled against the busiest
/// city in the extract. Input order is preserved.
#[must_use]
pub fn city_summaries(counts: &[CityCount], base: f64, increment: f64) -> Vec<CitySummary> {
    let max_count = counts.iter().map(|c| c.count).max().unwrap_or(0);
    counts
        .iter()
        .map(|c| CitySummary {
            city: c.city.clone(),
            count: c.count,
            radius: scale_radius(c.count, max_count, base, increment),
        })
        .collect()
}

/// Mean coordinate of the resolved city positions, used as the map's
/// initial view center. `None` when nothing resolved.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn map_center(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(la, lo), (lat, lon)| (la + lat, lo + lon));
    Some((lat_sum / n, lon_sum / n))
}
