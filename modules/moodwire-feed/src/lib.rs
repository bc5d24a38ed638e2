// RSS headline source.
// Fetches financial news feeds and returns recent entry titles as the raw
// text batch for one scoring cycle.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use moodwire_common::MoodwireError;

/// Seed list of CNBC RSS feeds polled each cycle.
const NEWS_FEEDS: &[(&str, &str)] = &[
    (
        "Technology",
        "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=19854910",
    ),
    (
        "World News",
        "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=100727362",
    ),
    (
        "Top News",
        "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=100003114",
    ),
    (
        "Economy",
        "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=20910258",
    ),
    (
        "Finance",
        "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=10000664",
    ),
];

const FETCH_TIMEOUT_SECS: u64 = 15;

/// Source of raw headline text for one scoring cycle.
///
/// May return an empty batch; the caller must treat that as a no-op cycle.
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<String>, MoodwireError>;
}

/// RSS/Atom-backed headline source with a recency window.
pub struct RssHeadlineSource {
    client: reqwest::Client,
    max_age_days: i64,
}

impl RssHeadlineSource {
    pub fn new(max_age_days: i64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to build RSS HTTP client");
        Self {
            client,
            max_age_days,
        }
    }

    /// Fetch and parse one feed, returning recent entry titles.
    async fn fetch_feed(&self, feed_url: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(feed_url)
            .header("User-Agent", "moodwire/0.1")
            .send()
            .await
            .context("RSS feed fetch failed")?;

        let bytes = resp.bytes().await.context("Failed to read RSS feed body")?;
        let feed = feed_rs::parser::parse(&bytes[..]).context("Failed to parse RSS/Atom feed")?;

        let cutoff = Utc::now() - chrono::Duration::days(self.max_age_days);
        Ok(recent_titles(feed, cutoff))
    }
}

#[async_trait]
impl HeadlineSource for RssHeadlineSource {
    /// Fetch all seed feeds. One failing feed is logged and skipped; the
    /// fetch as a whole fails only when every feed does.
    async fn fetch(&self) -> Result<Vec<String>, MoodwireError> {
        let mut titles = Vec::new();
        let mut failed = 0usize;

        for (name, url) in NEWS_FEEDS {
            match self.fetch_feed(url).await {
                Ok(mut recent) => {
                    info!(feed = name, titles = recent.len(), "feed: parsed successfully");
                    titles.append(&mut recent);
                }
                Err(e) => {
                    failed += 1;
                    warn!(feed = name, error = %e, "Failed to fetch feed");
                }
            }
        }

        if failed == NEWS_FEEDS.len() {
            return Err(MoodwireError::Feed("all feeds failed".to_string()));
        }

        if titles.is_empty() {
            warn!("No recent headlines");
        }

        Ok(titles)
    }
}

/// Titles of entries published (or updated) at or after `cutoff`, in feed
/// order. Entries without a parseable date are skipped.
fn recent_titles(feed: feed_rs::model::Feed, cutoff: DateTime<Utc>) -> Vec<String> {
    feed.entries
        .into_iter()
        .filter_map(|entry| {
            let published = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc))?;
            if published < cutoff {
                return None;
            }
            entry.title.map(|t| t.content)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const FEED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>Fresh headline</title>
      <link>https://example.com/fresh</link>
      <pubDate>Wed, 02 Aug 2023 12:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Stale headline</title>
      <link>https://example.com/stale</link>
      <pubDate>Sat, 01 Jul 2023 12:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Undated headline</title>
      <link>https://example.com/undated</link>
    </item>
  </channel>
</rss>"#;

    fn cutoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 8, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn recent_titles_keeps_fresh_entries_only() {
        let feed = feed_rs::parser::parse(FEED_XML.as_bytes()).unwrap();
        let titles = recent_titles(feed, cutoff());
        assert_eq!(titles, vec!["Fresh headline".to_string()]);
    }

    #[test]
    fn recent_titles_skips_undated_entries() {
        let feed = feed_rs::parser::parse(FEED_XML.as_bytes()).unwrap();
        // Even with a cutoff in the distant past, the undated entry stays out.
        let titles = recent_titles(feed, Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            titles,
            vec!["Fresh headline".to_string(), "Stale headline".to_string()]
        );
    }

    #[test]
    fn recent_titles_of_empty_feed() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        let feed = feed_rs::parser::parse(xml.as_bytes()).unwrap();
        assert!(recent_titles(feed, cutoff()).is_empty());
    }
}
