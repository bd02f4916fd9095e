//! In-memory service fakes shared by the pipeline tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use danger_zone_ai::AiError;
use danger_zone_ai::providers::{CompletionRequest, LlmProvider};
use danger_zone_geocoder::{GeocodeError, GeocodedAddress, Geocoder, ReverseAddress};
use danger_zone_models::Coordinate;
use danger_zone_news::{FeedEntry, NewsError, NewsSource};

use crate::{Pipeline, PipelineConfig};

#[derive(Default)]
pub struct FakeGeocoder {
    pub city: Option<String>,
    pub places: BTreeMap<String, (f64, f64)>,
    pub searched: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn in_city(city: &str) -> Self {
        Self {
            city: Some(city.to_string()),
            ..Self::default()
        }
    }

    pub fn with_place(mut self, name: &str, latitude: f64, longitude: f64) -> Self {
        self.places.insert(name.to_string(), (latitude, longitude));
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searched.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Geocoder for FakeGeocoder {
    async fn reverse(
        &self,
        _coordinate: Coordinate,
    ) -> Result<Option<ReverseAddress>, GeocodeError> {
        Ok(self.city.clone().map(|city| ReverseAddress {
            city: Some(city),
            ..ReverseAddress::default()
        }))
    }

    async fn search(&self, query: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
        self.searched.lock().unwrap().push(query.to_string());
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

/// Returns the same titles for every query.
#[derive(Default)]
pub struct FakeNews {
    pub titles: Vec<String>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeNews {
    pub fn with_titles(titles: &[&str]) -> Self {
        Self {
            titles: titles.iter().map(ToString::to_string).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl NewsSource for FakeNews {
    async fn search(&self, query: &str) -> Result<Vec<FeedEntry>, NewsError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self
            .titles
            .iter()
            .map(|title| FeedEntry {
                title: format!("{title} - Daily Courier"),
                link: "https://news.example.com/a".to_string(),
                published: String::new(),
            })
            .collect())
    }
}

pub struct FakeLlm {
    pub answer: String,
    pub delay: Option<Duration>,
    pub calls: Mutex<usize>,
}

impl FakeLlm {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            delay: None,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl LlmProvider for FakeLlm {
    async fn complete(&self, _request: &CompletionRequest<'_>) -> Result<String, AiError> {
        *self.calls.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.answer.clone())
    }
}

pub fn pipeline(
    geocoder: &Arc<FakeGeocoder>,
    news: &Arc<FakeNews>,
    llm: &Arc<FakeLlm>,
    deadline: Duration,
) -> Pipeline {
    Pipeline::new(
        geocoder.clone(),
        news.clone(),
        llm.clone(),
        PipelineConfig { deadline },
    )
}
