#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding for the danger zone pipeline.
//!
//! Two pipeline stages live here, both written against the [`Geocoder`]
//! trait so tests can substitute an in-memory fake:
//!
//! 1. **Location resolution** ([`resolver::resolve_city`]): one reverse
//!    lookup turning the caller's coordinate into a city label, falling
//!    back to [`UNKNOWN_CITY`](danger_zone_models::UNKNOWN_CITY).
//! 2. **Zone geocoding** ([`zones::geocode_zones`]): one forward lookup per
//!    extracted zone, dropping zones that do not resolve.
//!
//! The production implementation is [`nominatim::NominatimGeocoder`],
//! configured from the TOML files embedded by [`service_registry`].
//! Nominatim allows one request per second; the client paces itself.

pub mod nominatim;
pub mod resolver;
pub mod service_registry;
pub mod zones;

use danger_zone_models::Coordinate;
use serde::Deserialize;
use thiserror::Error;

/// A forward geocoding result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// The matched/canonical address returned by the geocoder.
    pub matched_address: Option<String>,
}

/// Administrative components of a reverse geocoding result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReverseAddress {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl ReverseAddress {
    /// Best place label: city, then town, then village, then state.
    ///
    /// Blank components are skipped.
    #[must_use]
    pub fn place_label(&self) -> Option<&str> {
        [&self.city, &self.town, &self.village, &self.state]
            .into_iter()
            .filter_map(Option::as_deref)
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// A reverse and forward geocoding backend.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up the address components at `coordinate`.
    ///
    /// Returns `Ok(None)` when the service has no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response parsing fails.
    async fn reverse(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<ReverseAddress>, GeocodeError>;

    /// Resolves a free-text place name to a coordinate.
    ///
    /// Returns `Ok(None)` when the service has no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response parsing fails.
    async fn search(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory geocoder. Unknown queries are "no match"; queries listed
    /// in `failing` return an error.
    #[derive(Default)]
    pub struct FakeGeocoder {
        pub reverse_result: Option<Result<Option<ReverseAddress>, String>>,
        pub places: BTreeMap<String, (f64, f64)>,
        pub failing: Vec<String>,
        pub searched: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Geocoder for FakeGeocoder {
        async fn reverse(
            &self,
            _coordinate: Coordinate,
        ) -> Result<Option<ReverseAddress>, GeocodeError> {
            match &self.reverse_result {
                Some(Ok(address)) => Ok(address.clone()),
                Some(Err(message)) => Err(GeocodeError::Parse {
                    message: message.clone(),
                }),
                None => Ok(None),
            }
        }

        async fn search(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
            self.searched.lock().unwrap().push(query.to_string());
            if self.failing.iter().any(|f| f == query) {
                return Err(GeocodeError::RateLimited);
            }
            Ok(self
                .places
                .get(query)
                .map(|&(latitude, longitude)| GeocodedAddress {
                    latitude,
                    longitude,
                    matched_address: Some(query.to_string()),
                }))
        }
    }
}
