#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the danger zone server.
//!
//! Successful responses reuse the view types from
//! [`danger_zone_models::view`] directly. This crate adds the query
//! parameters and the error bodies, which keep each endpoint's normal
//! shape so clients can render them without special-casing.

use danger_zone_models::view::{Alert, AlertCounts, CrowdLevel, DashboardSummary};
use danger_zone_models::{Coordinate, CoordinateError, GeocodedZone, UNKNOWN_CITY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query parameters shared by the three view endpoints.
///
/// Both values are taken as raw strings so that malformed numbers produce
/// the endpoint's own error body instead of a generic extractor error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoordinateParams {
    /// Latitude in decimal degrees.
    pub lat: Option<String>,
    /// Longitude in decimal degrees.
    pub lon: Option<String>,
}

/// Why a request's coordinates were rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidCoordinates {
    /// A parameter was absent or blank.
    #[error("Missing required query parameter '{0}'")]
    Missing(&'static str),
    /// A parameter was not a decimal number.
    #[error("Query parameter '{name}' is not a number: {value:?}")]
    NotANumber {
        /// Parameter name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
    /// The query string itself could not be decoded (e.g. `lat` given
    /// twice).
    #[error("Malformed query string: {0}")]
    Query(String),
    /// The numbers do not describe a point on the globe.
    #[error(transparent)]
    OutOfRange(#[from] CoordinateError),
}

fn parse_param(name: &'static str, raw: Option<&str>) -> Result<f64, InvalidCoordinates> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(InvalidCoordinates::Missing(name))?;
    raw.parse().map_err(|_| InvalidCoordinates::NotANumber {
        name,
        value: raw.to_string(),
    })
}

impl CoordinateParams {
    /// Parses and validates the coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinates`] if either parameter is missing, not a
    /// number, or out of range.
    pub fn coordinate(&self) -> Result<Coordinate, InvalidCoordinates> {
        let latitude = parse_param("lat", self.lat.as_deref())?;
        let longitude = parse_param("lon", self.lon.as_deref())?;
        Ok(Coordinate::new(latitude, longitude)?)
    }
}

/// Error body for `GET /danger-zones`.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneErrorBody {
    pub error: String,
    /// Always empty.
    pub danger_zones: Vec<GeocodedZone>,
}

impl ZoneErrorBody {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            danger_zones: Vec::new(),
        }
    }
}

/// Error body for `GET /alerts`.
#[derive(Debug, Clone, Serialize)]
pub struct AlertErrorBody {
    pub error: String,
    /// Always empty.
    pub alerts: Vec<Alert>,
    /// Always zero.
    pub alert_counts: AlertCounts,
}

impl AlertErrorBody {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            alerts: Vec::new(),
            alert_counts: AlertCounts::default(),
        }
    }
}

/// Error body for `GET /dashboard`: the error plus a neutral summary.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardErrorBody {
    pub error: String,
    #[serde(flatten)]
    pub summary: DashboardSummary,
}

impl DashboardErrorBody {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            summary: DashboardSummary {
                city: UNKNOWN_CITY.to_string(),
                safety_score: 85,
                crowd_level: CrowdLevel::Moderate,
                nearby_alerts: 0,
                danger_zones_count: 0,
                urgent_alerts: 0,
                warning_alerts: 0,
                last_updated: "00:00".to_string(),
            },
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: Option<&str>, lon: Option<&str>) -> CoordinateParams {
        CoordinateParams {
            lat: lat.map(String::from),
            lon: lon.map(String::from),
        }
    }

    #[test]
    fn parses_valid_coordinate() {
        let coordinate = params(Some("19.0760"), Some(" 72.8777 ")).coordinate().unwrap();
        assert!((coordinate.latitude - 19.076).abs() < f64::EPSILON);
        assert!((coordinate.longitude - 72.8777).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_or_blank_parameter() {
        assert_eq!(
            params(None, Some("1")).coordinate(),
            Err(InvalidCoordinates::Missing("lat"))
        );
        assert_eq!(
            params(Some("1"), Some("  ")).coordinate(),
            Err(InvalidCoordinates::Missing("lon"))
        );
    }

    #[test]
    fn non_numeric_parameter() {
        assert_eq!(
            params(Some("north"), Some("1")).coordinate(),
            Err(InvalidCoordinates::NotANumber {
                name: "lat",
                value: "north".to_string()
            })
        );
    }

    #[test]
    fn out_of_range_and_non_finite() {
        assert!(matches!(
            params(Some("91"), Some("0")).coordinate(),
            Err(InvalidCoordinates::OutOfRange(CoordinateError::Latitude(_)))
        ));
        assert!(matches!(
            params(Some("0"), Some("inf")).coordinate(),
            Err(InvalidCoordinates::OutOfRange(CoordinateError::Longitude(_)))
        ));
        assert!(params(Some("NaN"), Some("0")).coordinate().is_err());
    }

    #[test]
    fn error_bodies_keep_view_shape() {
        assert_eq!(
            serde_json::to_value(ZoneErrorBody::new("bad")).unwrap(),
            serde_json::json!({"error": "bad", "danger_zones": []})
        );
        assert_eq!(
            serde_json::to_value(AlertErrorBody::new("bad")).unwrap(),
            serde_json::json!({
                "error": "bad",
                "alerts": [],
                "alert_counts": {"urgent": 0, "warning": 0, "info": 0}
            })
        );
        assert_eq!(
            serde_json::to_value(DashboardErrorBody::new("bad")).unwrap(),
            serde_json::json!({
                "error": "bad",
                "city": "Unknown",
                "safety_score": 85,
                "crowd_level": "Moderate Crowd",
                "nearby_alerts": 0,
                "danger_zones_count": 0,
                "urgent_alerts": 0,
                "warning_alerts": 0,
                "last_updated": "00:00"
            })
        );
    }
}
