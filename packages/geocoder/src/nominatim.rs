//! Nominatim / OpenStreetMap geocoder client.
//!
//! Nominatim has strict rate limits: **1 request per second** maximum on
//! the public instance, and requests without an identifying `User-Agent`
//! are rejected. The client owns a [`Pacer`] so every call made through a
//! shared instance honors the limit.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/> and
//! <https://nominatim.org/release-docs/develop/api/Reverse/>

use std::time::Duration;

use danger_zone_models::Coordinate;
use danger_zone_pacing::Pacer;

use crate::service_registry::{GeocodingService, ProviderConfig};
use crate::{GeocodeError, GeocodedAddress, Geocoder, ReverseAddress};

/// Paced Nominatim client.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    pacer: Pacer,
}

impl NominatimGeocoder {
    /// Creates a client against `base_url` (no trailing endpoint path).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        rate_limit: Duration,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            pacer: Pacer::new(rate_limit),
        })
    }

    /// Creates a client from an embedded service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn from_service(service: &GeocodingService) -> Result<Self, GeocodeError> {
        let ProviderConfig::Nominatim {
            base_url,
            user_agent,
            rate_limit_ms,
            timeout_secs,
        } = &service.provider;
        log::debug!(
            "Configuring geocoder '{}' at {base_url} ({rate_limit_ms}ms spacing)",
            service.id
        );
        Self::new(
            base_url,
            user_agent,
            Duration::from_millis(*rate_limit_ms),
            Duration::from_secs(*timeout_secs),
        )
    }

    async fn get_json(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, GeocodeError> {
        self.pacer.wait().await;

        let resp = self
            .client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(params)
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }

        Ok(resp.error_for_status()?.json().await?)
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<ReverseAddress>, GeocodeError> {
        let body = self
            .get_json(
                "reverse",
                &[
                    ("lat", coordinate.latitude.to_string()),
                    ("lon", coordinate.longitude.to_string()),
                    ("format", "jsonv2".to_string()),
                    ("addressdetails", "1".to_string()),
                ],
            )
            .await?;
        parse_reverse_response(&body)
    }

    async fn search(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        let body = self
            .get_json(
                "search",
                &[
                    ("q", query.to_string()),
                    ("format", "jsonv2".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        parse_search_response(&body)
    }
}

/// Parses a Nominatim `/search` response.
fn parse_search_response(
    body: &serde_json::Value,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    let display_name = first["display_name"].as_str().map(String::from);

    Ok(Some(GeocodedAddress {
        latitude: lat,
        longitude: lon,
        matched_address: display_name,
    }))
}

/// Parses a Nominatim `/reverse` response.
///
/// Nominatim reports "nothing here" (open ocean, for example) as an object
/// with an `error` field rather than an HTTP error.
fn parse_reverse_response(
    body: &serde_json::Value,
) -> Result<Option<ReverseAddress>, GeocodeError> {
    let obj = body.as_object().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim reverse response is not an object".to_string(),
    })?;

    if let Some(error) = obj.get("error") {
        log::debug!("Nominatim reverse returned no match: {error}");
        return Ok(None);
    }

    let Some(address) = obj.get("address") else {
        return Ok(None);
    };

    serde_json::from_value(address.clone())
        .map(Some)
        .map_err(|e| GeocodeError::Parse {
            message: format!("Malformed address in Nominatim reverse response: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "19.1136",
            "lon": "72.8697",
            "display_name": "Andheri East, Mumbai, Maharashtra, India"
        }]);
        let result = parse_search_response(&body).unwrap().unwrap();
        assert!((result.latitude - 19.1136).abs() < 1e-4);
        assert!((result.longitude - 72.8697).abs() < 1e-4);
        assert_eq!(
            result.matched_address.as_deref(),
            Some("Andheri East, Mumbai, Maharashtra, India")
        );
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_search_response(&body).unwrap().is_none());
    }

    #[test]
    fn rejects_search_result_without_coordinates() {
        let body = serde_json::json!([{ "display_name": "Somewhere" }]);
        assert!(parse_search_response(&body).is_err());
    }

    #[test]
    fn parses_reverse_address() {
        let body = serde_json::json!({
            "lat": "19.0760",
            "lon": "72.8777",
            "display_name": "Fort, Mumbai",
            "address": {
                "suburb": "Fort",
                "city": "Mumbai",
                "state": "Maharashtra",
                "country": "India"
            }
        });
        let address = parse_reverse_response(&body).unwrap().unwrap();
        assert_eq!(address.city.as_deref(), Some("Mumbai"));
        assert_eq!(address.state.as_deref(), Some("Maharashtra"));
        assert_eq!(address.place_label(), Some("Mumbai"));
    }

    #[test]
    fn reverse_error_object_is_no_match() {
        let body = serde_json::json!({ "error": "Unable to geocode" });
        assert!(parse_reverse_response(&body).unwrap().is_none());
    }

    #[test]
    fn reverse_non_object_is_parse_error() {
        let body = serde_json::json!(["unexpected"]);
        assert!(matches!(
            parse_reverse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn builds_from_embedded_service() {
        let service = crate::service_registry::primary_service().unwrap();
        let geocoder = NominatimGeocoder::from_service(&service).unwrap();
        assert!(!geocoder.base_url.ends_with('/'));
        assert!(geocoder.pacer.interval() >= Duration::from_secs(1));
    }
}
