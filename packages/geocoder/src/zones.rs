//! Forward geocoding of extracted danger zones.

use danger_zone_models::{DangerZone, LocatedZone};
use danger_zone_pacing::Deadline;

use crate::Geocoder;

/// Geocodes each zone's `location`, keeping only zones that resolve.
///
/// Output order matches input order minus dropped zones. Lookups that fail
/// or find nothing drop the zone without retrying. Once `deadline` passes,
/// the remaining zones are dropped without being looked up.
pub async fn geocode_zones(
    geocoder: &dyn Geocoder,
    zones: Vec<DangerZone>,
    deadline: &Deadline,
) -> Vec<LocatedZone> {
    let total = zones.len();
    let mut located = Vec::with_capacity(total);

    for (idx, zone) in zones.into_iter().enumerate() {
        let Some(result) = deadline.run(geocoder.search(&zone.location)).await else {
            log::warn!(
                "Deadline reached while geocoding; dropping {} remaining zone(s)",
                total - idx
            );
            break;
        };

        match result {
            Ok(Some(address)) => {
                log::debug!(
                    "Geocoded '{}' -> ({}, {}) as '{}'",
                    zone.location,
                    address.latitude,
                    address.longitude,
                    address.matched_address.as_deref().unwrap_or("?")
                );
                located.push(LocatedZone {
                    zone,
                    latitude: address.latitude,
                    longitude: address.longitude,
                });
            }
            Ok(None) => {
                log::info!("No geocode match for '{}', dropping zone", zone.location);
            }
            Err(e) => {
                log::warn!("Failed to geocode '{}': {e}", zone.location);
            }
        }
    }

    log::info!("Geocoded {}/{total} danger zones", located.len());
    located
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::FakeGeocoder;

    fn zone(location: &str) -> DangerZone {
        DangerZone {
            location: location.to_string(),
            risk_type: None,
            severity: None,
            description: None,
            related_headlines: Vec::new(),
        }
    }

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn keeps_resolved_zones_in_order() {
        let geocoder = FakeGeocoder {
            places: [
                ("Bandra, Mumbai".to_string(), (19.06, 72.84)),
                ("Dadar, Mumbai".to_string(), (19.02, 72.84)),
            ]
            .into_iter()
            .collect(),
            failing: vec!["Worli, Mumbai".to_string()],
            ..FakeGeocoder::default()
        };
        let zones = vec![
            zone("Dadar, Mumbai"),
            zone("Nowhere, Mumbai"),
            zone("Worli, Mumbai"),
            zone("Bandra, Mumbai"),
        ];

        let located = geocode_zones(&geocoder, zones, &deadline()).await;

        let names: Vec<&str> = located.iter().map(|z| z.zone.location.as_str()).collect();
        assert_eq!(names, ["Dadar, Mumbai", "Bandra, Mumbai"]);
        assert!((located[0].latitude - 19.02).abs() < 1e-9);
        assert!((located[1].longitude - 72.84).abs() < 1e-9);
    }

    #[tokio::test]
    async fn looks_up_each_zone_once() {
        let geocoder = FakeGeocoder::default();
        let zones = vec![zone("A"), zone("B")];
        let located = geocode_zones(&geocoder, zones, &deadline()).await;
        assert!(located.is_empty());
        assert_eq!(*geocoder.searched.lock().unwrap(), ["A", "B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_stops_lookups() {
        let geocoder = FakeGeocoder {
            places: [("A".to_string(), (1.0, 1.0))].into_iter().collect(),
            ..FakeGeocoder::default()
        };
        let deadline = Deadline::after(Duration::from_secs(1));
        tokio::time::sleep(Duration::from_secs(2)).await;

        let located = geocode_zones(&geocoder, vec![zone("A")], &deadline).await;
        assert!(located.is_empty());
    }
}
