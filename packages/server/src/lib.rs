#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the danger zone pipeline.
//!
//! Serves `GET /danger-zones`, `GET /alerts` and `GET /dashboard`, each
//! taking `lat`/`lon` query parameters, plus `GET /api/health`. All
//! origins are allowed so the mobile and web clients can call it directly.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use danger_zone_ai::AiError;
use danger_zone_geocoder::GeocodeError;
use danger_zone_geocoder::nominatim::NominatimGeocoder;
use danger_zone_news::NewsError;
use danger_zone_news::google_news::GoogleNewsSource;
use danger_zone_pipeline::{Pipeline, PipelineConfig};
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;

/// Shared application state.
pub struct AppState {
    /// Service handles for the pipeline, shared by every worker.
    pub pipeline: Arc<Pipeline>,
}

/// Errors that prevent the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// No geocoding service is enabled in the embedded configuration.
    #[error("No enabled geocoding service configured")]
    NoGeocoder,
    /// The geocoder client could not be built.
    #[error(transparent)]
    Geocoder(#[from] GeocodeError),
    /// The news client could not be built.
    #[error(transparent)]
    News(#[from] NewsError),
    /// No usable language model credentials.
    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Builds the pipeline from the embedded service configs and the
/// environment.
///
/// # Errors
///
/// Returns [`StartupError`] if any service client cannot be created,
/// most commonly because no LLM API key is set.
pub fn pipeline_from_env() -> Result<Pipeline, StartupError> {
    let geocoding_service =
        danger_zone_geocoder::service_registry::primary_service().ok_or(StartupError::NoGeocoder)?;
    let geocoder = NominatimGeocoder::from_service(&geocoding_service)?;

    let news_service = danger_zone_news::service_registry::google_news();
    let news = GoogleNewsSource::from_service(&news_service)?;

    let llm = danger_zone_ai::providers::create_provider_from_env()?;

    let config = PipelineConfig::from_env();
    log::info!(
        "Pipeline ready: geocoder '{}', news '{}', {}s deadline",
        geocoding_service.id,
        news_service.id,
        config.deadline.as_secs()
    );

    Ok(Pipeline::new(
        Arc::new(geocoder),
        Arc::new(news),
        Arc::from(llm),
        config,
    ))
}

/// Registers every route. Shared by [`run_server`] and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/danger-zones", web::get().to(handlers::danger_zones))
        .route("/alerts", web::get().to(handlers::alerts))
        .route("/dashboard", web::get().to(handlers::dashboard))
        .service(web::scope("/api").route("/health", web::get().to(handlers::health)));
}

/// Starts the HTTP server on `BIND_ADDR`:`PORT` (default
/// `127.0.0.1:5000`).
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(pipeline: Pipeline) -> std::io::Result<()> {
    let state = web::Data::new(AppState {
        pipeline: Arc::new(pipeline),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
