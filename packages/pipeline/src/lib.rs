#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The coordinate-to-danger-zone pipeline.
//!
//! A run is strictly linear: resolve the city, aggregate headlines, extract
//! zones with the model, geocode them, and rank them by distance. Each
//! stage degrades to an empty result instead of failing, so a run always
//! produces a view. [`Pipeline`] holds the long-lived service handles;
//! [`views`] turns a run's output into the three response shapes.

pub mod ranking;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use danger_zone_ai::providers::LlmProvider;
use danger_zone_geocoder::Geocoder;
use danger_zone_models::{Coordinate, DangerZone, GeocodedZone, UNKNOWN_CITY};
use danger_zone_news::NewsSource;
use danger_zone_pacing::Deadline;

/// Default wall-clock budget for one run.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// Tunables for a [`Pipeline`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Budget for all upstream calls of one run.
    pub deadline: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
        }
    }
}

impl PipelineConfig {
    /// Reads `PIPELINE_DEADLINE_SECS`, falling back to
    /// [`DEFAULT_DEADLINE`] when unset or not a positive integer.
    #[must_use]
    pub fn from_env() -> Self {
        let deadline = std::env::var("PIPELINE_DEADLINE_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map_or(DEFAULT_DEADLINE, Duration::from_secs);
        Self { deadline }
    }
}

/// Output of the stages up to extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// Resolved city, possibly [`UNKNOWN_CITY`].
    pub city: String,
    /// Number of unique headlines that fed extraction.
    pub headline_count: usize,
    /// Extracted zones, not yet geocoded.
    pub zones: Vec<DangerZone>,
}

/// Output of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedZones {
    /// Resolved city, possibly [`UNKNOWN_CITY`].
    pub city: String,
    /// Number of unique headlines that fed extraction.
    pub headline_count: usize,
    /// Geocoded zones with distances, in extraction order.
    pub zones: Vec<GeocodedZone>,
}

/// Long-lived service handles shared by every request.
pub struct Pipeline {
    geocoder: Arc<dyn Geocoder>,
    news: Arc<dyn NewsSource>,
    llm: Arc<dyn LlmProvider>,
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub const fn new(
        geocoder: Arc<dyn Geocoder>,
        news: Arc<dyn NewsSource>,
        llm: Arc<dyn LlmProvider>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            geocoder,
            news,
            llm,
            config,
        }
    }

    /// Runs resolution, aggregation, and extraction.
    ///
    /// An unknown city or an empty headline set ends the run early without
    /// calling the model.
    pub async fn assess(&self, coordinate: Coordinate) -> Assessment {
        let deadline = Deadline::after(self.config.deadline);
        self.assess_within(coordinate, &deadline).await
    }

    /// Runs every stage and ranks the resulting zones by distance from
    /// `coordinate`.
    pub async fn locate_zones(&self, coordinate: Coordinate) -> RankedZones {
        let deadline = Deadline::after(self.config.deadline);
        let Assessment {
            city,
            headline_count,
            zones,
        } = self.assess_within(coordinate, &deadline).await;

        let zones = if zones.is_empty() {
            Vec::new()
        } else {
            let located =
                danger_zone_geocoder::zones::geocode_zones(self.geocoder.as_ref(), zones, &deadline)
                    .await;
            ranking::rank(coordinate, located)
        };

        RankedZones {
            city,
            headline_count,
            zones,
        }
    }

    async fn resolve(&self, coordinate: Coordinate, deadline: &Deadline) -> String {
        let resolve =
            danger_zone_geocoder::resolver::resolve_city(self.geocoder.as_ref(), coordinate);
        deadline.run(resolve).await.unwrap_or_else(|| {
            log::warn!("Deadline reached while resolving city");
            UNKNOWN_CITY.to_string()
        })
    }

    async fn assess_within(&self, coordinate: Coordinate, deadline: &Deadline) -> Assessment {
        let city = self.resolve(coordinate, deadline).await;
        log::info!(
            "Resolved ({}, {}) to {city}",
            coordinate.latitude,
            coordinate.longitude
        );

        if city == UNKNOWN_CITY {
            return Assessment {
                city,
                headline_count: 0,
                zones: Vec::new(),
            };
        }

        let headlines =
            danger_zone_news::aggregator::aggregate_headlines(self.news.as_ref(), &city, deadline)
                .await;
        if headlines.is_empty() {
            return Assessment {
                city,
                headline_count: 0,
                zones: Vec::new(),
            };
        }

        let extract =
            danger_zone_ai::extractor::extract_zones(self.llm.as_ref(), &headlines, &city);
        let zones = deadline.run(extract).await.unwrap_or_else(|| {
            log::warn!("Deadline reached during zone extraction for {city}");
            Vec::new()
        });

        Assessment {
            city,
            headline_count: headlines.len(),
            zones,
        }
    }
}
