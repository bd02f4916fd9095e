//! Distance annotation of geocoded zones.

use danger_zone_models::{Coordinate, GeocodedZone, LocatedZone, ZONE_RADIUS_M};
use geo::{Distance, Geodesic, Point};

/// Geodesic (WGS84 ellipsoid) distance between two coordinates in
/// kilometers, rounded to two decimals.
#[must_use]
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let meters = Geodesic.distance(
        Point::new(from.longitude, from.latitude),
        Point::new(to.longitude, to.latitude),
    );
    round_2dp(meters / 1000.0)
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Attaches the distance from `user` and the map radius to each zone.
///
/// Zones keep their input order; nothing is sorted or filtered.
#[must_use]
pub fn rank(user: Coordinate, zones: Vec<LocatedZone>) -> Vec<GeocodedZone> {
    zones
        .into_iter()
        .map(|located| {
            let distance_km = distance_km(user, located.coordinate());
            GeocodedZone {
                zone: located.zone,
                latitude: located.latitude,
                longitude: located.longitude,
                distance_km,
                radius_m: ZONE_RADIUS_M,
            }
        })
        .collect()
}
