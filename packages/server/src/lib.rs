#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the intervention dashboard.
//!
//! Serves the JSON sections the dashboard frontend renders: the
//! geocoded city map layer, the distribution and per-city charts, and
//! the scalar metrics. Every request re-reads the CSV extracts and the
//! document collection and recomputes its aggregations from scratch;
//! the only state carried across requests is the memoized geocode
//! cache, which is append-only and paced to the provider's rate limit.

mod handlers;

pub mod config;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use soccorso_map_geocoder::{GeocodingService, cache::GeocodeCache, nominatim_service};
use tokio::sync::Mutex;

use crate::config::AppConfig;

/// Shared application state.
pub struct AppState {
    /// Runtime configuration (extract paths, thresholds).
    pub config: AppConfig,
    /// HTTP client shared by the geocoder and the document collection.
    pub client: reqwest::Client,
    /// Geocoding service definition (endpoint, country, pacing).
    pub geocoder_service: GeocodingService,
    /// Process-lifetime geocode memoization. Behind an async mutex —
    /// the cache paces outbound calls, so lookups serialize anyway.
    pub geocoder: Mutex<GeocodeCache>,
}

/// Starts the dashboard API server.
///
/// Builds the configuration from the environment, sets up the shared
/// HTTP client and geocode cache, and starts the Actix-Web server.
/// This is a regular async function — the caller provides the async
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the shared HTTP client cannot be constructed.
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = AppConfig::from_env();
    log::info!("Serving extracts from {}", config.data_dir.display());

    let geocoder_service = nominatim_service();
    let geocoder = Mutex::new(GeocodeCache::for_service(&geocoder_service));

    let client = reqwest::Client::builder()
        .user_agent(concat!("soccorso-map/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client");

    let state = web::Data::new(AppState {
        config,
        client,
        geocoder_service,
        geocoder,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/map/cities", web::get().to(handlers::map_cities))
                    .route("/charts/durations", web::get().to(handlers::duration_chart))
                    .route(
                        "/charts/departures",
                        web::get().to(handlers::departure_chart),
                    )
                    .route("/charts/extremes", web::get().to(handlers::extremes_chart))
                    .route(
                        "/charts/city-death-rates",
                        web::get().to(handlers::city_death_rates),
                    )
                    .route("/charts/symptoms", web::get().to(handlers::symptom_chart))
                    .route(
                        "/charts/symptoms-by-age",
                        web::get().to(handlers::symptoms_by_age),
                    )
                    .route("/metrics", web::get().to(handlers::metrics)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
