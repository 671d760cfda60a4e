//! Nominatim / OpenStreetMap geocoder client.
//!
//! Resolves a city by free-form search (`"<city>, <country>"`). The
//! caller is responsible for rate limiting (typically 1 request per
//! second for the public instance; see `rate_limit_ms` in the service
//! TOML configuration) — [`crate::cache::GeocodeCache`] handles both
//! the pacing and the memoization.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use crate::{Coordinates, GeocodeError};

/// Geocodes a single city using the Nominatim free-form search
/// endpoint. Returns `None` when the city has no match.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request or response parsing
/// fails.
pub async fn geocode_city(
    client: &reqwest::Client,
    base_url: &str,
    city: &str,
    country: &str,
) -> Result<Option<Coordinates>, GeocodeError> {
    let query = format!("{city}, {country}");
    let resp = client
        .get(base_url)
        .query(&[("q", query.as_str()), ("format", "jsonv2"), ("limit", "1")])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body)
}

/// Parses a Nominatim jsonv2 response.
fn parse_response(body: &serde_json::Value) -> Result<Option<Coordinates>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let latitude = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let longitude = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "41.8933",
            "lon": "12.4829",
            "display_name": "Roma, Lazio, Italia"
        }]);
        let result = parse_response(&body).unwrap().unwrap();
        assert!((result.latitude - 41.8933).abs() < 1e-4);
        assert!((result.longitude - 12.4829).abs() < 1e-4);
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn rejects_non_array_response() {
        let body = serde_json::json!({"error": "boom"});
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        let body = serde_json::json!([{"lat": "north", "lon": "12.4829"}]);
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }
}
