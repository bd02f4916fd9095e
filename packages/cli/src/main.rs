#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the danger zone service.
//!
//! ```text
//! danger_zones serve
//! danger_zones zones --lat 19.0760 --lon 72.8777
//! danger_zones alerts --lat 19.0760 --lon 72.8777
//! danger_zones dashboard --lat 19.0760 --lon 72.8777
//! danger_zones city --lat 19.0760 --lon 72.8777
//! ```
//!
//! The view commands run the same pipeline as the HTTP endpoints and print
//! the response body as pretty JSON.

use clap::{Args, Parser, Subcommand};
use danger_zone_geocoder::nominatim::NominatimGeocoder;
use danger_zone_models::Coordinate;
use danger_zone_pipeline::views;

#[derive(Parser)]
#[command(
    name = "danger_zones",
    about = "Find news-reported danger zones near a location"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Location {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
}

impl Location {
    fn coordinate(&self) -> Result<Coordinate, danger_zone_models::CoordinateError> {
        Coordinate::new(self.lat, self.lon)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (BIND_ADDR, PORT)
    Serve,
    /// Print ranked danger zones near a location
    Zones(Location),
    /// Print the alert feed for a location
    Alerts(Location),
    /// Print the dashboard summary for a location
    Dashboard(Location),
    /// Print the city resolved for a location
    City(Location),
}

fn print_json(value: &impl serde::Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let pipeline = danger_zone_server::pipeline_from_env()?;
            // The server uses actix-web's runtime, so it runs on a blocking
            // thread to avoid nesting runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(danger_zone_server::run_server(pipeline))
            })
            .await??;
        }
        Commands::Zones(location) => {
            let coordinate = location.coordinate()?;
            let pipeline = danger_zone_server::pipeline_from_env()?;
            let ranked = pipeline.locate_zones(coordinate).await;
            print_json(&views::zone_view(coordinate, ranked))?;
        }
        Commands::Alerts(location) => {
            let coordinate = location.coordinate()?;
            let pipeline = danger_zone_server::pipeline_from_env()?;
            let ranked = pipeline.locate_zones(coordinate).await;
            print_json(&views::alert_view(&ranked.city, &ranked.zones))?;
        }
        Commands::Dashboard(location) => {
            let coordinate = location.coordinate()?;
            let pipeline = danger_zone_server::pipeline_from_env()?;
            let assessment = pipeline.assess(coordinate).await;
            let now = chrono::Local::now().time();
            print_json(&views::dashboard_view(
                &assessment.city,
                &assessment.zones,
                now,
            ))?;
        }
        Commands::City(location) => {
            let coordinate = location.coordinate()?;
            let service = danger_zone_geocoder::service_registry::primary_service()
                .ok_or("No enabled geocoding service configured")?;
            let geocoder = NominatimGeocoder::from_service(&service)?;
            let city = danger_zone_geocoder::resolver::resolve_city(&geocoder, coordinate).await;
            log::debug!("Resolved ({}, {}) to {city}", coordinate.latitude, coordinate.longitude);
            println!("{city}");
        }
    }

    Ok(())
}
