//! HTTP handler functions for the danger zone API.

use actix_web::{HttpResponse, web};
use danger_zone_models::Coordinate;
use danger_zone_pipeline::views;
use danger_zone_server_models::{
    AlertErrorBody, ApiHealth, CoordinateParams, DashboardErrorBody, InvalidCoordinates,
    ZoneErrorBody,
};

use crate::AppState;

type CoordinateQuery = Result<web::Query<CoordinateParams>, actix_web::Error>;

fn parse_coordinate(
    endpoint: &str,
    query: CoordinateQuery,
) -> Result<Coordinate, InvalidCoordinates> {
    query
        .map_err(|e| InvalidCoordinates::Query(e.to_string()))
        .and_then(|params| params.coordinate())
        .inspect_err(|e| {
            log::warn!("Rejected {endpoint} request: {e}");
        })
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /danger-zones?lat=..&lon=..`
///
/// Runs the full pipeline and returns the ranked zones.
pub async fn danger_zones(state: web::Data<AppState>, params: CoordinateQuery) -> HttpResponse {
    let coordinate = match parse_coordinate("/danger-zones", params) {
        Ok(c) => c,
        Err(e) => return HttpResponse::BadRequest().json(ZoneErrorBody::new(e.to_string())),
    };

    let ranked = state.pipeline.locate_zones(coordinate).await;
    log::info!(
        "Returning {} danger zones for {}",
        ranked.zones.len(),
        ranked.city
    );
    HttpResponse::Ok().json(views::zone_view(coordinate, ranked))
}

/// `GET /alerts?lat=..&lon=..`
///
/// Runs the full pipeline and returns the zones as an alert feed.
pub async fn alerts(state: web::Data<AppState>, params: CoordinateQuery) -> HttpResponse {
    let coordinate = match parse_coordinate("/alerts", params) {
        Ok(c) => c,
        Err(e) => return HttpResponse::BadRequest().json(AlertErrorBody::new(e.to_string())),
    };

    let ranked = state.pipeline.locate_zones(coordinate).await;
    HttpResponse::Ok().json(views::alert_view(&ranked.city, &ranked.zones))
}

/// `GET /dashboard?lat=..&lon=..`
///
/// Scores the extracted zones without geocoding them.
pub async fn dashboard(state: web::Data<AppState>, params: CoordinateQuery) -> HttpResponse {
    let coordinate = match parse_coordinate("/dashboard", params) {
        Ok(c) => c,
        Err(e) => {
            return HttpResponse::BadRequest().json(DashboardErrorBody::new(e.to_string()));
        }
    };

    let assessment = state.pipeline.assess(coordinate).await;
    let now = chrono::Local::now().time();
    HttpResponse::Ok().json(views::dashboard_view(
        &assessment.city,
        &assessment.zones,
        now,
    ))
}
