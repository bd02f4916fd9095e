//! Reverse geocoding of the caller's coordinate to a city label.

use danger_zone_models::{Coordinate, UNKNOWN_CITY};

use crate::Geocoder;

/// Resolves `coordinate` to a city name with a single reverse lookup.
///
/// Uses the first of city, town, village, or state that the service
/// reports. Any failure (network error, no match, malformed response, no
/// usable component) yields [`UNKNOWN_CITY`] instead of an error.
pub async fn resolve_city(geocoder: &dyn Geocoder, coordinate: Coordinate) -> String {
    match geocoder.reverse(coordinate).await {
        Ok(Some(address)) => {
            if let Some(label) = address.place_label() {
                return label.to_string();
            }
            log::info!(
                "Reverse geocode for ({}, {}) had no city, town, village, or state",
                coordinate.latitude,
                coordinate.longitude
            );
        }
        Ok(None) => {
            log::info!(
                "Reverse geocode for ({}, {}) found no match",
                coordinate.latitude,
                coordinate.longitude
            );
        }
        Err(e) => {
            log::warn!("Reverse geocoding error: {e}");
        }
    }
    UNKNOWN_CITY.to_string()
}
