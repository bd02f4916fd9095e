//! Response shapes for the three pipeline views.
//!
//! These are plain data; the projections that build them live in the
//! pipeline crate.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{GeocodedZone, Severity};

/// Raw zone list for the map screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneView {
    /// Pipeline ran to completion.
    Found {
        /// Resolved city.
        city: String,
        /// Caller latitude.
        user_lat: f64,
        /// Caller longitude.
        user_lon: f64,
        /// Ranked zones in extraction order.
        danger_zones: Vec<GeocodedZone>,
        /// Number of zones.
        total_zones: usize,
    },
    /// News aggregation produced nothing, so extraction never ran.
    NoNews {
        /// Resolved city.
        city: String,
        /// Always empty.
        danger_zones: Vec<GeocodedZone>,
        /// Always `"No news found"`.
        message: String,
    },
}

/// Alert classification derived from zone severity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertType {
    /// High severity
    Urgent,
    /// Medium severity
    Warning,
    /// Anything else, including unknown severity
    Info,
}

impl AlertType {
    /// Maps a zone severity to an alert type. Missing severity is `Info`.
    #[must_use]
    pub const fn from_severity(severity: Option<Severity>) -> Self {
        match severity {
            Some(Severity::High) => Self::Urgent,
            Some(Severity::Medium) => Self::Warning,
            Some(Severity::Low) | None => Self::Info,
        }
    }
}

/// A single entry in the alert feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Sequential id starting at 1.
    pub id: u32,
    /// Classification.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// e.g. `"Flood - High Risk"`.
    pub title: String,
    /// Place name.
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Display time, e.g. `"Just now"`.
    pub time: String,
    /// Body text.
    pub message: String,
    /// Display severity.
    pub severity: Severity,
    /// Hazard label, `"General"` when unknown.
    pub risk_type: String,
    /// Always `false` when created.
    pub dismissed: bool,
}

/// Tally of alerts per [`AlertType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCounts {
    pub urgent: usize,
    pub warning: usize,
    pub info: usize,
}

impl AlertCounts {
    /// Counts alerts by type.
    #[must_use]
    pub fn tally(alerts: &[Alert]) -> Self {
        alerts.iter().fold(Self::default(), |mut counts, alert| {
            match alert.alert_type {
                AlertType::Urgent => counts.urgent += 1,
                AlertType::Warning => counts.warning += 1,
                AlertType::Info => counts.info += 1,
            }
            counts
        })
    }
}

/// Severity-classified alert feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertView {
    pub city: String,
    pub alerts: Vec<Alert>,
    pub alert_counts: AlertCounts,
    pub total_alerts: usize,
}

/// Coarse crowd estimate shown on the dashboard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum CrowdLevel {
    #[serde(rename = "Light Crowd")]
    #[strum(serialize = "Light Crowd")]
    Light,
    #[serde(rename = "Moderate Crowd")]
    #[strum(serialize = "Moderate Crowd")]
    Moderate,
    #[serde(rename = "Heavy Crowd")]
    #[strum(serialize = "Heavy Crowd")]
    Heavy,
}

/// Home screen summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub city: String,
    /// Always within `[20, 100]`.
    pub safety_score: u8,
    pub crowd_level: CrowdLevel,
    /// Zones with High or Medium severity.
    pub nearby_alerts: usize,
    pub danger_zones_count: usize,
    pub urgent_alerts: usize,
    pub warning_alerts: usize,
    /// Local time of day, `HH:MM`.
    pub last_updated: String,
}
