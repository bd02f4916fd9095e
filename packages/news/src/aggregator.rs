//! Topic-qualified headline aggregation for a city.

use std::collections::BTreeSet;

use danger_zone_models::Headline;
use danger_zone_pacing::Deadline;

use crate::{FeedEntry, NewsSource};

/// Topics appended to the city name, one search per topic.
pub const TOPICS: [&str; 8] = [
    "accident",
    "fire",
    "flood",
    "crime",
    "protest",
    "emergency",
    "weather alert",
    "disaster",
];

/// Entries kept from the top of each search result.
pub const MAX_ENTRIES_PER_QUERY: usize = 5;

/// Separator between a headline and its source attribution.
const ATTRIBUTION_SEPARATOR: &str = " - ";

/// Builds the `"{city} {topic}"` queries in [`TOPICS`] order.
#[must_use]
pub fn build_queries(city: &str) -> Vec<String> {
    TOPICS.iter().map(|topic| format!("{city} {topic}")).collect()
}

/// Strips the source attribution: everything from the first `" - "` on.
#[must_use]
pub fn clean_title(title: &str) -> &str {
    title
        .split_once(ATTRIBUTION_SEPARATOR)
        .map_or(title, |(headline, _)| headline)
}

/// Keeps the first headline for each case-folded title, preserving order
/// and the first occurrence's casing.
#[must_use]
pub fn dedup_headlines(headlines: Vec<Headline>) -> Vec<Headline> {
    let mut seen = BTreeSet::new();
    headlines
        .into_iter()
        .filter(|h| seen.insert(h.dedup_key()))
        .collect()
}

fn to_headline(entry: FeedEntry) -> Headline {
    Headline {
        title: clean_title(&entry.title).to_string(),
        link: entry.link,
        published: entry.published,
    }
}

/// Collects deduplicated headlines about hazards in `city`.
///
/// Runs one search per topic, in order, keeping at most
/// [`MAX_ENTRIES_PER_QUERY`] entries from each. A failed search is logged
/// and skipped, so partial results are normal. Once `deadline` passes, no
/// further searches are issued.
///
/// Callers must not invoke this for
/// [`UNKNOWN_CITY`](danger_zone_models::UNKNOWN_CITY).
pub async fn aggregate_headlines(
    source: &dyn NewsSource,
    city: &str,
    deadline: &Deadline,
) -> Vec<Headline> {
    let mut headlines = Vec::new();

    for query in build_queries(city) {
        let Some(result) = deadline.run(source.search(&query)).await else {
            log::warn!("Deadline reached during news search, stopping before '{query}'");
            break;
        };

        match result {
            Ok(entries) => {
                log::debug!("'{query}': {} entries", entries.len());
                headlines.extend(
                    entries
                        .into_iter()
                        .take(MAX_ENTRIES_PER_QUERY)
                        .map(to_headline),
                );
            }
            Err(e) => {
                log::warn!("Error fetching '{query}': {e}");
            }
        }
    }

    let collected = headlines.len();
    let unique = dedup_headlines(headlines);
    log::info!(
        "Found {} unique headlines for {city} ({collected} before dedup)",
        unique.len()
    );
    unique
}
