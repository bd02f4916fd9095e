#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! News retrieval for the danger zone pipeline.
//!
//! The [`aggregator`] issues a fixed set of topic-qualified searches for a
//! city against a [`NewsSource`], trims each result list, strips source
//! attributions from titles, and deduplicates the combined headlines.
//!
//! The production source is [`google_news::GoogleNewsSource`], an RSS
//! search client configured by [`service_registry`]. All of its HTTP
//! traffic goes through [`retry`].

pub mod aggregator;
pub mod google_news;
pub mod retry;
pub mod service_registry;

use thiserror::Error;

/// Errors from news retrieval.
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status that will not succeed on retry,
    /// or kept failing until retries ran out.
    #[error("Unexpected status: {message}")]
    Status {
        /// Status line and retry context.
        message: String,
    },

    /// The response body was not a readable RSS/Atom feed.
    #[error("Feed parse error: {message}")]
    Feed {
        /// Description of the parsing failure.
        message: String,
    },
}

/// One raw entry from a news feed, before title cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Title as published, usually ending in `" - <Source>"`.
    pub title: String,
    /// Article link.
    pub link: String,
    /// Publication date (RFC 2822), empty when the feed omits it.
    pub published: String,
}

/// A searchable news feed.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Runs one search and returns the feed entries in feed order.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError`] if the request fails or the feed cannot be
    /// parsed.
    async fn search(&self, query: &str) -> Result<Vec<FeedEntry>, NewsError>;
}
