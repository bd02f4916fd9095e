//! Google News RSS search client.
//!
//! Searches `news.google.com/rss/search` scoped to a single edition
//! (`hl`/`gl`/`ceid`) and parses the RSS response with `feed-rs`. Google
//! throttles bursts from a single client, so requests are paced.

use std::time::Duration;

use danger_zone_pacing::Pacer;

use crate::service_registry::{FeedLocale, NewsFeedService};
use crate::{FeedEntry, NewsError, NewsSource, retry};

/// Paced Google News RSS client.
pub struct GoogleNewsSource {
    client: reqwest::Client,
    base_url: String,
    locale: FeedLocale,
    pacer: Pacer,
}

impl GoogleNewsSource {
    /// Creates a client from a feed service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the HTTP client cannot be built.
    pub fn from_service(service: &NewsFeedService) -> Result<Self, NewsError> {
        let client = reqwest::Client::builder()
            .user_agent(&service.user_agent)
            .timeout(Duration::from_secs(service.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: service.base_url.clone(),
            locale: service.locale.clone(),
            pacer: Pacer::from_millis(service.rate_limit_ms),
        })
    }
}

#[async_trait::async_trait]
impl NewsSource for GoogleNewsSource {
    async fn search(&self, query: &str) -> Result<Vec<FeedEntry>, NewsError> {
        self.pacer.wait().await;

        let params = [
            ("q", query),
            ("hl", self.locale.hl.as_str()),
            ("gl", self.locale.gl.as_str()),
            ("ceid", self.locale.ceid.as_str()),
        ];
        let body = retry::send_text(|| self.client.get(&self.base_url).query(&params)).await?;

        parse_feed(&body)
    }
}

/// Parses an RSS/Atom document into entries, in feed order.
///
/// Entries without a title are skipped since there is nothing to analyze.
fn parse_feed(body: &str) -> Result<Vec<FeedEntry>, NewsError> {
    let feed = feed_rs::parser::parse(body.as_bytes()).map_err(|e| NewsError::Feed {
        message: e.to_string(),
    })?;

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title.map(|t| t.content)?;
            if title.trim().is_empty() {
                return None;
            }
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();
            let published = entry
                .published
                .map(|dt| dt.to_rfc2822())
                .unwrap_or_default();
            Some(FeedEntry {
                title,
                link,
                published,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"Mumbai flood" - Google News</title>
    <link>https://news.google.com</link>
    <description>Google News</description>
    <item>
      <title>Heavy rain floods Andheri subway - Times of India</title>
      <link>https://news.example.com/andheri</link>
      <pubDate>Mon, 07 Jul 2025 06:30:00 GMT</pubDate>
    </item>
    <item>
      <title>Local trains delayed after waterlogging - Hindustan Times</title>
      <link>https://news.example.com/trains</link>
    </item>
    <item>
      <title></title>
      <link>https://news.example.com/empty</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_rss_entries_in_order() {
        let entries = parse_feed(SAMPLE_RSS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].title,
            "Heavy rain floods Andheri subway - Times of India"
        );
        assert_eq!(entries[0].link, "https://news.example.com/andheri");
        assert!(entries[0].published.contains("Jul 2025"));
        assert_eq!(entries[1].published, "");
    }

    #[test]
    fn rejects_non_feed_body() {
        assert!(matches!(
            parse_feed("<html><body>captcha</body></html>"),
            Err(NewsError::Feed { .. })
        ));
    }

    #[test]
    fn builds_from_embedded_service() {
        let source =
            GoogleNewsSource::from_service(&crate::service_registry::google_news()).unwrap();
        assert_eq!(source.locale.gl, "IN");
        assert!(source.pacer.interval() > Duration::ZERO);
    }
}
