#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value types for the coordinate-to-danger-zone pipeline.
//!
//! Every type here is an immutable value object built once per request:
//! news [`Headline`]s, model-extracted [`DangerZone`]s, and the geocoded
//! and distance-annotated forms that the views consume. The view
//! projections themselves live in [`view`].

pub mod view;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// City label returned when reverse geocoding cannot name a place.
///
/// Callers treat this as "skip news retrieval", not as an error.
pub const UNKNOWN_CITY: &str = "Unknown";

/// Map visualization radius attached to every ranked zone, in meters.
pub const ZONE_RADIUS_M: u32 = 500;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, within `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, within `[-180, 180]`.
    pub longitude: f64,
}

/// Error returned when a [`Coordinate`] would fall outside the globe.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude is not finite or not in `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    /// Longitude is not finite or not in `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

impl Coordinate {
    /// Creates a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if either component is NaN, infinite,
    /// or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A news headline collected from the feed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    /// Headline text with the trailing source attribution removed.
    pub title: String,
    /// Link to the article.
    pub link: String,
    /// Publication date as reported by the feed; empty when absent.
    pub published: String,
}

impl Headline {
    /// Case-folded title used for deduplication.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.title.to_lowercase()
    }
}

/// Kind of hazard a danger zone represents.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum RiskType {
    /// Flooding or waterlogging
    Flood,
    /// Fire or explosion
    Fire,
    /// Criminal activity
    Crime,
    /// Road, rail, or industrial accident
    Accident,
    /// Protest, strike, or civil unrest
    Protest,
    /// Severe weather
    Weather,
}

/// Severity reported for a danger zone.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Severity {
    /// Immediate danger
    High,
    /// Elevated risk
    Medium,
    /// Informational
    Low,
}

/// A hazard extracted from headlines, before geocoding.
///
/// Language models routinely omit or misspell fields, so everything except
/// `location` is optional. `location` is the only field geocoding needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DangerZone {
    /// Free-text place name, e.g. `"Andheri East, Mumbai"`.
    pub location: String,
    /// Hazard kind, if the model named a recognized one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_type: Option<RiskType>,
    /// Severity, if the model named a recognized one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Short summary written by the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Titles of the headlines the model cited, in citation order.
    #[serde(default)]
    pub related_headlines: Vec<String>,
}

impl DangerZone {
    /// Whether this zone counts toward nearby alerts (High or Medium).
    #[must_use]
    pub const fn is_alerting(&self) -> bool {
        matches!(self.severity, Some(Severity::High | Severity::Medium))
    }
}

/// A [`DangerZone`] whose location resolved to a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedZone {
    /// The extracted zone.
    #[serde(flatten)]
    pub zone: DangerZone,
    /// Latitude of the resolved location.
    pub latitude: f64,
    /// Longitude of the resolved location.
    pub longitude: f64,
}

impl LocatedZone {
    /// The resolved point.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A located zone annotated with its distance from the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedZone {
    /// The extracted zone.
    #[serde(flatten)]
    pub zone: DangerZone,
    /// Latitude of the resolved location.
    pub latitude: f64,
    /// Longitude of the resolved location.
    pub longitude: f64,
    /// Geodesic distance from the user in kilometers, 2 decimal places.
    pub distance_km: f64,
    /// Map visualization radius in meters. Not used for filtering.
    #[serde(rename = "radius")]
    pub radius_m: u32,
}
