//! Embedded news feed configuration.
//!
//! The feed endpoint, locale, and pacing live in `services/google_news.toml`
//! and are compiled into the binary.

use serde::Deserialize;

/// A news feed service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsFeedService {
    /// Unique identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Search endpoint, queried with `q` plus the locale parameters.
    pub base_url: String,
    /// `User-Agent` header.
    pub user_agent: String,
    /// Minimum delay between requests in milliseconds.
    pub rate_limit_ms: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Edition the search is scoped to.
    pub locale: FeedLocale,
}

/// Google News edition parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedLocale {
    /// Interface language, e.g. `en-IN`.
    pub hl: String,
    /// Country, e.g. `IN`.
    pub gl: String,
    /// Edition id, e.g. `IN:en`.
    pub ceid: String,
}

const GOOGLE_NEWS_TOML: &str = include_str!("../services/google_news.toml");

/// Returns the embedded Google News configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (this is a compile-time
/// guarantee since the config is embedded).
#[must_use]
pub fn google_news() -> NewsFeedService {
    toml::de::from_str(GOOGLE_NEWS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse news feed service 'google_news': {e}"))
}
