//! Memoized, request-paced city→coordinates cache.
//!
//! Caches both successful geocodes and no-match lookups so a city is
//! queried against the provider at most once per process lifetime — a
//! failed lookup is not retried. Keys are the exact input strings:
//! no case folding, no whitespace normalization. Transport errors are
//! not cached; the affected city is simply skipped for that render.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::{Coordinates, GeocodeError, GeocodingService, nominatim};

/// Process-lifetime geocode memoization with minimum-interval pacing.
///
/// Owned by the caller and passed into each render; there is no
/// eviction. Entries are append-only and keyed by immutable city-name
/// strings.
#[derive(Debug)]
pub struct GeocodeCache {
    entries: BTreeMap<String, Option<Coordinates>>,
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl GeocodeCache {
    /// Creates an empty cache enforcing `min_interval` between
    /// outbound provider calls.
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            entries: BTreeMap::new(),
            last_request: None,
            min_interval,
        }
    }

    /// Creates a cache paced according to the service configuration.
    #[must_use]
    pub const fn for_service(service: &GeocodingService) -> Self {
        Self::new(Duration::from_millis(service.rate_limit_ms))
    }

    /// Returns the memoized outcome for a city, if any: `Some(None)`
    /// is a cached no-match, distinct from "never looked up".
    #[must_use]
    pub fn cached(&self, city: &str) -> Option<Option<Coordinates>> {
        self.entries.get(city).copied()
    }

    /// Seeds a memoized outcome without touching the provider.
    pub fn prime(&mut self, city: impl Into<String>, outcome: Option<Coordinates>) {
        self.entries.insert(city.into(), outcome);
    }

    /// Number of memoized cities (matches and no-matches).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a city, consulting the memo first and calling the
    /// provider at most once per distinct name.
    ///
    /// Both outcomes are memoized; `Ok(None)` means the provider had
    /// no match and the city should be excluded from the map.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] on transport or parse failure. The
    /// error is not memoized, so a later render may try again.
    pub async fn resolve(
        &mut self,
        client: &reqwest::Client,
        service: &GeocodingService,
        city: &str,
    ) -> Result<Option<Coordinates>, GeocodeError> {
        if let Some(outcome) = self.entries.get(city) {
            return Ok(*outcome);
        }

        self.pace().await;
        let outcome =
            nominatim::geocode_city(client, &service.base_url, city, &service.country).await?;
        if outcome.is_none() {
            log::warn!("no geocoding match for city '{city}'");
        }
        self.entries.insert(city.to_string(), outcome);
        Ok(outcome)
    }

    /// Sleeps out the remainder of the minimum interval since the
    /// previous provider call.
    async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROMA: Coordinates = Coordinates {
        latitude: 41.8933,
        longitude: 12.4829,
    };

    #[test]
    fn memoizes_matches_and_no_matches() {
        let mut cache = GeocodeCache::new(Duration::from_millis(0));
        cache.prime("Roma", Some(ROMA));
        cache.prime("Atlantide", None);

        assert_eq!(cache.cached("Roma"), Some(Some(ROMA)));
        assert_eq!(cache.cached("Atlantide"), Some(None));
        assert_eq!(cache.cached("Milano"), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn keys_are_exact_no_normalization() {
        let mut cache = GeocodeCache::new(Duration::from_millis(0));
        cache.prime("Roma", Some(ROMA));

        assert_eq!(cache.cached("roma"), None);
        assert_eq!(cache.cached(" Roma"), None);
        assert_eq!(cache.cached("Roma "), None);
    }

    #[tokio::test]
    async fn resolve_returns_memoized_outcome_without_provider_call() {
        let mut cache = GeocodeCache::new(Duration::from_secs(3600));
        cache.prime("Roma", Some(ROMA));

        // An unreachable base_url proves the provider is never hit:
        // a cache hit also skips the hour-long pacing sleep.
        let service = GeocodingService {
            id: "nominatim".to_string(),
            name: "test".to_string(),
            base_url: "http://127.0.0.1:1/search".to_string(),
            country: "Italy".to_string(),
            rate_limit_ms: 3_600_000,
        };
        let client = reqwest::Client::new();
        let outcome = cache.resolve(&client, &service, "Roma").await.unwrap();
        assert_eq!(outcome, Some(ROMA));
    }
}
