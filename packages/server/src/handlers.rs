//! HTTP handler functions for the dashboard API.
//!
//! Every section handler re-reads its sources on each request and
//! returns an [`ApiSection`] envelope: any failure — unreadable
//! extract, missing column, unreachable collection, geocoding outage —
//! degrades that one section to `unavailable` while the rest of the
//! dashboard keeps rendering.

use actix_web::{HttpResponse, web};
use soccorso_map_analytics::{map, stats, tags};
use soccorso_map_intervention_models::{
    AgeBand, CityExtremes, DurationBand, InterventionDocument, TimeOfDayBand,
};
use soccorso_map_server_models::{
    ApiDeathRate, ApiHealth, ApiMapCity, ApiMapLayer, ApiMeanDuration, ApiMetrics, ApiPoint,
    ApiSection, MARKER_FILL_RGBA, ResponseAssessment,
};
use soccorso_map_source::{SourceError, tables};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/map/cities`
///
/// Geocoded city markers with count-scaled radii. Cities the geocoder
/// cannot resolve are excluded; a per-city transport failure skips
/// that city without failing the section.
pub async fn map_cities(state: web::Data<AppState>) -> HttpResponse {
    let counts = match tables::read_city_counts(&state.config.city_counts_path()) {
        Ok(counts) => counts,
        Err(e) => {
            log::error!("Failed to read city counts: {e}");
            return HttpResponse::Ok().json(ApiSection::<ApiMapLayer>::unavailable(e));
        }
    };

    let summaries = map::city_summaries(
        &counts,
        state.config.base_radius_meters,
        state.config.radius_increment_meters,
    );

    let mut geocoder = state.geocoder.lock().await;
    let mut cities = Vec::new();
    let mut points = Vec::new();
    for summary in summaries {
        match geocoder
            .resolve(&state.client, &state.geocoder_service, &summary.city)
            .await
        {
            Ok(Some(coords)) => {
                points.push((coords.latitude, coords.longitude));
                cities.push(ApiMapCity {
                    city: summary.city,
                    count: summary.count,
                    position: ApiPoint {
                        latitude: coords.latitude,
                        longitude: coords.longitude,
                    },
                    radius: summary.radius,
                });
            }
            Ok(None) => {} // no match; excluded from the map
            Err(e) => {
                log::error!("Geocoding failed for '{}': {e}", summary.city);
            }
        }
    }

    let center = map::map_center(&points).map(|(latitude, longitude)| ApiPoint {
        latitude,
        longitude,
    });

    HttpResponse::Ok().json(ApiSection::ready(ApiMapLayer {
        center,
        fill_color: MARKER_FILL_RGBA,
        cities,
    }))
}

/// `GET /api/charts/durations`
///
/// Distribution of intervention durations over the four duration
/// bands.
pub async fn duration_chart(state: web::Data<AppState>) -> HttpResponse {
    let durations = match tables::read_timing_table(&state.config.timing_path())
        .and_then(|table| table.valid_durations())
    {
        Ok(durations) => durations,
        Err(e) => {
            log::error!("Duration distribution unavailable: {e}");
            return HttpResponse::Ok().json(ApiSection::<()>::unavailable(e));
        }
    };

    let distribution = stats::band_distribution(durations, |m| DurationBand::of_minutes(*m));
    HttpResponse::Ok().json(ApiSection::ready(distribution))
}

/// `GET /api/charts/departures`
///
/// Distribution of ambulance departure times over the six time-of-day
/// bands.
pub async fn departure_chart(state: web::Data<AppState>) -> HttpResponse {
    let departures = match tables::read_timing_table(&state.config.timing_path())
        .and_then(|table| table.valid_departures())
    {
        Ok(departures) => departures,
        Err(e) => {
            log::error!("Departure distribution unavailable: {e}");
            return HttpResponse::Ok().json(ApiSection::<()>::unavailable(e));
        }
    };

    let distribution = stats::band_distribution(departures, |t| TimeOfDayBand::of_time(*t));
    HttpResponse::Ok().json(ApiSection::ready(distribution))
}

/// `GET /api/charts/extremes`
///
/// Per-city fast/slow percentages. Prefers the pre-aggregated extract
/// (the authoritative product of the upstream aggregation); if that is
/// unavailable, recomputes from the raw timing table when it carries a
/// city column.
pub async fn extremes_chart(state: web::Data<AppState>) -> HttpResponse {
    let primary = tables::read_extremes_table(&state.config.extremes_path());
    let rows = match primary {
        Ok(rows) => rows,
        Err(primary_err) => {
            log::warn!("Extremes extract unavailable ({primary_err}); recomputing from timing table");
            match recompute_extremes(&state) {
                Ok(rows) => rows,
                Err(fallback_err) => {
                    log::error!("Extremes fallback unavailable: {fallback_err}");
                    return HttpResponse::Ok().json(ApiSection::<()>::unavailable(primary_err));
                }
            }
        }
    };

    HttpResponse::Ok().json(ApiSection::ready(rows))
}

fn recompute_extremes(state: &AppState) -> Result<Vec<CityExtremes>, SourceError> {
    let table = tables::read_timing_table(&state.config.timing_path())?;
    let pairs = table.city_durations()?;
    let splits = stats::extreme_split(
        pairs,
        state.config.fast_threshold_minutes,
        state.config.slow_threshold_minutes,
        state.config.min_group_sample,
    );
    Ok(splits
        .into_iter()
        .map(|split| CityExtremes {
            city: split.group,
            pct_fast: split.pct_fast,
            pct_slow: split.pct_slow,
        })
        .collect())
}

/// `GET /api/charts/city-death-rates`
///
/// Per-city death-on-scene percentage over the document collection.
/// Cities with fewer than the minimum sample of evaluable documents
/// are dropped.
pub async fn city_death_rates(state: web::Data<AppState>) -> HttpResponse {
    let docs = match fetch_documents(&state).await {
        Ok(docs) => docs,
        Err(response) => return response,
    };

    let pairs = docs.iter().filter_map(|doc| {
        let city = doc.city.as_deref()?;
        let death = doc.death_on_scene?;
        Some((city, death))
    });
    let rates = stats::group_rates(pairs, state.config.min_group_sample);
    HttpResponse::Ok().json(ApiSection::ready(rates))
}

/// `GET /api/charts/symptoms`
///
/// Exploded symptom tag frequencies across the whole collection.
pub async fn symptom_chart(state: web::Data<AppState>) -> HttpResponse {
    let docs = match fetch_documents(&state).await {
        Ok(docs) => docs,
        Err(response) => return response,
    };

    let counts = tags::tag_counts(docs.iter().map(|doc| doc.symptoms.as_slice()));
    HttpResponse::Ok().json(ApiSection::ready(counts))
}

/// `GET /api/charts/symptoms-by-age`
///
/// Symptom × age-band cross-tabulation, reduced to the top symptoms by
/// overall frequency. Documents without a valid age are excluded.
pub async fn symptoms_by_age(state: web::Data<AppState>) -> HttpResponse {
    let docs = match fetch_documents(&state).await {
        Ok(docs) => docs,
        Err(response) => return response,
    };

    let records = docs.iter().filter_map(|doc| {
        let age = doc.age?;
        Some((AgeBand::of_years(age), doc.symptoms.as_slice()))
    });
    let cells = tags::tags_by_band(records, state.config.top_symptom_count);
    HttpResponse::Ok().json(ApiSection::ready(cells))
}

/// `GET /api/metrics`
///
/// Scalar metrics. Each metric degrades independently: a missing
/// timing extract takes down the mean, a collection outage takes down
/// the death rate and the total, never the whole readout.
pub async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    let mean_duration = match tables::read_timing_table(&state.config.timing_path())
        .and_then(|table| table.valid_durations())
    {
        Ok(durations) => {
            let minutes = stats::mean(&durations);
            ApiSection::ready(ApiMeanDuration {
                minutes,
                assessment: ResponseAssessment::of_minutes(minutes),
                sample_size: durations.len() as u64,
            })
        }
        Err(e) => {
            log::error!("Mean duration unavailable: {e}");
            ApiSection::unavailable(e)
        }
    };

    let (death_rate, total_interventions) =
        match state.config.documents.fetch(&state.client).await {
            Ok(docs) => {
                let evaluated: Vec<bool> =
                    docs.iter().filter_map(|doc| doc.death_on_scene).collect();
                let deaths = evaluated.iter().filter(|died| **died).count() as u64;
                let total = evaluated.len() as u64;
                (
                    ApiSection::ready(ApiDeathRate {
                        percentage: stats::rate(deaths, total),
                        deaths,
                        total,
                    }),
                    ApiSection::ready(docs.len() as u64),
                )
            }
            Err(e) => {
                log::error!("Document collection unavailable: {e}");
                (
                    ApiSection::unavailable(&e),
                    ApiSection::unavailable(&e),
                )
            }
        };

    HttpResponse::Ok().json(ApiMetrics {
        mean_duration,
        death_rate,
        total_interventions,
    })
}

/// Fetches the document collection, mapping failure straight to an
/// `unavailable` section response.
async fn fetch_documents(state: &AppState) -> Result<Vec<InterventionDocument>, HttpResponse> {
    state
        .config
        .documents
        .fetch(&state.client)
        .await
        .map_err(|e| {
            log::error!("Document collection unavailable: {e}");
            HttpResponse::Ok().json(ApiSection::<()>::unavailable(e))
        })
}
