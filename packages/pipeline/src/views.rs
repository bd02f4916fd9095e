//! Projections of a pipeline run into the three response shapes.
//!
//! All functions here are pure. The dashboard heuristics (score weights
//! and the hour-of-day crowd table) are product placeholders carried over
//! unchanged from the first release of the app.

use chrono::{NaiveTime, Timelike as _};
use danger_zone_models::view::{
    Alert, AlertCounts, AlertType, AlertView, CrowdLevel, DashboardSummary, ZoneView,
};
use danger_zone_models::{Coordinate, DangerZone, GeocodedZone, Severity};

use crate::RankedZones;

/// Message of the zone view when no headlines were found.
pub const NO_NEWS_MESSAGE: &str = "No news found";

const ALERT_TIME: &str = "Just now";
const DEFAULT_ALERT_MESSAGE: &str = "Stay alert in this area.";
const DEFAULT_ALERT_TITLE: &str = "Safety Alert";
const GENERAL_RISK: &str = "General";

const BASE_SAFETY_SCORE: u8 = 95;
const HIGH_PENALTY: u8 = 7;
const MEDIUM_PENALTY: u8 = 3;
const MIN_SAFETY_SCORE: u8 = 20;
const MAX_SAFETY_SCORE: u8 = 100;

/// Builds the map screen's zone list.
#[must_use]
pub fn zone_view(user: Coordinate, ranked: RankedZones) -> ZoneView {
    if ranked.headline_count == 0 {
        return ZoneView::NoNews {
            city: ranked.city,
            danger_zones: Vec::new(),
            message: NO_NEWS_MESSAGE.to_string(),
        };
    }

    ZoneView::Found {
        city: ranked.city,
        user_lat: user.latitude,
        user_lon: user.longitude,
        total_zones: ranked.zones.len(),
        danger_zones: ranked.zones,
    }
}

fn to_alert(id: u32, zone: &GeocodedZone) -> Alert {
    let zone_fields = &zone.zone;
    let risk_label = zone_fields.risk_type.map(|r| r.to_string());
    let severity = zone_fields.severity.unwrap_or(Severity::Medium);

    Alert {
        id,
        alert_type: AlertType::from_severity(zone_fields.severity),
        title: format!(
            "{} - {severity} Risk",
            risk_label.as_deref().unwrap_or(DEFAULT_ALERT_TITLE)
        ),
        location: zone_fields.location.clone(),
        latitude: Some(zone.latitude),
        longitude: Some(zone.longitude),
        time: ALERT_TIME.to_string(),
        message: zone_fields
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_ALERT_MESSAGE.to_string()),
        severity,
        risk_type: risk_label.unwrap_or_else(|| GENERAL_RISK.to_string()),
        dismissed: false,
    }
}

fn all_clear(city: &str) -> Alert {
    Alert {
        id: 1,
        alert_type: AlertType::Info,
        title: "All Clear".to_string(),
        location: city.to_string(),
        latitude: None,
        longitude: None,
        time: ALERT_TIME.to_string(),
        message: format!(
            "No immediate safety concerns detected in {city}. Stay vigilant and enjoy your visit!"
        ),
        severity: Severity::Low,
        risk_type: GENERAL_RISK.to_string(),
        dismissed: false,
    }
}

/// Builds the alert feed. An empty zone list yields a single "All Clear"
/// alert so the feed is never empty.
#[must_use]
pub fn alert_view(city: &str, zones: &[GeocodedZone]) -> AlertView {
    let mut alerts: Vec<Alert> = (1..)
        .zip(zones)
        .map(|(id, zone)| to_alert(id, zone))
        .collect();

    if alerts.is_empty() {
        alerts.push(all_clear(city));
    }

    AlertView {
        city: city.to_string(),
        alert_counts: AlertCounts::tally(&alerts),
        total_alerts: alerts.len(),
        alerts,
    }
}

fn count_severity(zones: &[DangerZone], severity: Severity) -> usize {
    zones
        .iter()
        .filter(|z| z.severity == Some(severity))
        .count()
}

/// `95 - 7*high - 3*medium`, clamped to `[20, 100]`.
#[must_use]
pub fn safety_score(high: usize, medium: usize) -> u8 {
    let penalty = |count: usize, weight: u8| {
        u8::try_from(count)
            .unwrap_or(u8::MAX)
            .saturating_mul(weight)
    };

    BASE_SAFETY_SCORE
        .saturating_sub(penalty(high, HIGH_PENALTY))
        .saturating_sub(penalty(medium, MEDIUM_PENALTY))
        .clamp(MIN_SAFETY_SCORE, MAX_SAFETY_SCORE)
}

/// Crowd estimate from the local hour alone.
#[must_use]
pub const fn crowd_level(hour: u32) -> CrowdLevel {
    match hour {
        9..=11 | 17..=20 => CrowdLevel::Heavy,
        12..=16 => CrowdLevel::Moderate,
        _ => CrowdLevel::Light,
    }
}

/// Builds the home screen summary from extracted (not geocoded) zones.
#[must_use]
pub fn dashboard_view(city: &str, zones: &[DangerZone], now: NaiveTime) -> DashboardSummary {
    let urgent = count_severity(zones, Severity::High);
    let warning = count_severity(zones, Severity::Medium);

    DashboardSummary {
        city: city.to_string(),
        safety_score: safety_score(urgent, warning),
        crowd_level: crowd_level(now.hour()),
        nearby_alerts: zones.iter().filter(|z| z.is_alerting()).count(),
        danger_zones_count: zones.len(),
        urgent_alerts: urgent,
        warning_alerts: warning,
        last_updated: now.format("%H:%M").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use danger_zone_models::{RiskType, ZONE_RADIUS_M};

    use super::*;

    fn zone(location: &str, risk_type: Option<RiskType>, severity: Option<Severity>) -> DangerZone {
        DangerZone {
            location: location.to_string(),
            risk_type,
            severity,
            description: None,
            related_headlines: Vec::new(),
        }
    }

    fn geocoded(zone: DangerZone) -> GeocodedZone {
        GeocodedZone {
            zone,
            latitude: 19.1,
            longitude: 72.9,
            distance_km: 1.5,
            radius_m: ZONE_RADIUS_M,
        }
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn zone_view_without_news() {
        let view = zone_view(
            Coordinate::new(10.0, 20.0).unwrap(),
            RankedZones {
                city: "Metropolis".to_string(),
                headline_count: 0,
                zones: Vec::new(),
            },
        );
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({
                "city": "Metropolis",
                "danger_zones": [],
                "message": "No news found"
            })
        );
    }

    #[test]
    fn zone_view_with_news_but_no_zones() {
        let view = zone_view(
            Coordinate::new(10.0, 20.0).unwrap(),
            RankedZones {
                city: "Pune".to_string(),
                headline_count: 4,
                zones: Vec::new(),
            },
        );
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({
                "city": "Pune",
                "user_lat": 10.0,
                "user_lon": 20.0,
                "danger_zones": [],
                "total_zones": 0
            })
        );
    }

    #[test]
    fn empty_alert_view_is_all_clear() {
        let view = alert_view("Goa", &[]);
        assert_eq!(view.total_alerts, 1);
        assert_eq!(
            view.alert_counts,
            AlertCounts {
                urgent: 0,
                warning: 0,
                info: 1
            }
        );
        let alert = &view.alerts[0];
        assert_eq!(alert.id, 1);
        assert_eq!(alert.title, "All Clear");
        assert_eq!(alert.location, "Goa");
        assert_eq!(alert.severity, Severity::Low);
        assert_eq!(alert.risk_type, "General");
        assert_eq!(
            alert.message,
            "No immediate safety concerns detected in Goa. Stay vigilant and enjoy your visit!"
        );
        assert!(alert.latitude.is_none());
    }

    #[test]
    fn alerts_are_numbered_and_classified() {
        let zones = vec![
            geocoded(zone("A", Some(RiskType::Flood), Some(Severity::High))),
            geocoded(zone("B", Some(RiskType::Crime), Some(Severity::Medium))),
            geocoded(zone("C", None, None)),
        ];
        let view = alert_view("Mumbai", &zones);

        let ids: Vec<u32> = view.alerts.iter().map(|a| a.id).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(view.alerts[0].alert_type, AlertType::Urgent);
        assert_eq!(view.alerts[0].title, "Flood - High Risk");
        assert_eq!(view.alerts[1].alert_type, AlertType::Warning);
        assert_eq!(
            view.alert_counts,
            AlertCounts {
                urgent: 1,
                warning: 1,
                info: 1
            }
        );
        assert_eq!(view.total_alerts, 3);
    }

    #[test]
    fn alert_defaults_for_missing_fields() {
        let view = alert_view("Mumbai", &[geocoded(zone("Kurla", None, None))]);
        let alert = &view.alerts[0];
        assert_eq!(alert.alert_type, AlertType::Info);
        assert_eq!(alert.title, "Safety Alert - Medium Risk");
        assert_eq!(alert.message, "Stay alert in this area.");
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.risk_type, "General");
        assert_eq!(alert.latitude, Some(19.1));
        assert!(!alert.dismissed);
    }

    #[test]
    fn alert_serializes_type_key() {
        let view = alert_view("Mumbai", &[geocoded(zone("Kurla", None, Some(Severity::High)))]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["alerts"][0]["type"], "urgent");
        assert_eq!(json["alerts"][0]["severity"], "High");
        assert_eq!(json["alert_counts"]["urgent"], 1);
    }

    #[test]
    fn safety_score_weights() {
        assert_eq!(safety_score(0, 0), 95);
        assert_eq!(safety_score(1, 0), 88);
        assert_eq!(safety_score(0, 1), 92);
        assert_eq!(safety_score(2, 3), 72);
    }

    #[test]
    fn safety_score_floors_at_twenty() {
        assert_eq!(safety_score(11, 0), 20);
        assert_eq!(safety_score(usize::MAX, usize::MAX), 20);
    }

    #[test]
    fn safety_score_is_monotonic() {
        for high in 0..20 {
            for medium in 0..20 {
                let score = safety_score(high, medium);
                assert!((20..=100).contains(&score));
                assert!(safety_score(high + 1, medium) <= score);
                assert!(safety_score(high, medium + 1) <= score);
            }
        }
    }

    #[test]
    fn crowd_levels_by_hour() {
        assert_eq!(crowd_level(8), CrowdLevel::Light);
        assert_eq!(crowd_level(9), CrowdLevel::Heavy);
        assert_eq!(crowd_level(11), CrowdLevel::Heavy);
        assert_eq!(crowd_level(12), CrowdLevel::Moderate);
        assert_eq!(crowd_level(16), CrowdLevel::Moderate);
        assert_eq!(crowd_level(17), CrowdLevel::Heavy);
        assert_eq!(crowd_level(20), CrowdLevel::Heavy);
        assert_eq!(crowd_level(21), CrowdLevel::Light);
        assert_eq!(crowd_level(0), CrowdLevel::Light);
    }

    #[test]
    fn dashboard_counts_pre_geocode_zones() {
        let zones = vec![
            zone("A", Some(RiskType::Fire), Some(Severity::High)),
            zone("B", None, Some(Severity::Medium)),
            zone("C", None, Some(Severity::Low)),
            zone("D", None, None),
        ];
        let summary = dashboard_view("Delhi", &zones, at(14, 5));
        assert_eq!(
            summary,
            DashboardSummary {
                city: "Delhi".to_string(),
                safety_score: 85,
                crowd_level: CrowdLevel::Moderate,
                nearby_alerts: 2,
                danger_zones_count: 4,
                urgent_alerts: 1,
                warning_alerts: 1,
                last_updated: "14:05".to_string(),
            }
        );
    }

    #[test]
    fn dashboard_without_zones() {
        let summary = dashboard_view("Unknown", &[], at(23, 59));
        assert_eq!(summary.safety_score, 95);
        assert_eq!(summary.crowd_level, CrowdLevel::Light);
        assert_eq!(summary.last_updated, "23:59");
    }
}
