// src/feed.rs
//
// Video syndication feed reader. The channel publishes an Atom document with
// entries in reverse-chronological order; only the first entry ever reaches
// the merge, but parsing yields them all so tests can assert ordering.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime, UtcOffset};

/// One feed entry, newest first in document order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub link: String,
    pub published_at: u64,
}

#[async_trait]
pub trait FeedReader: Send + Sync {
    async fn fetch_entries(&self, url: &str) -> Result<Vec<FeedEntry>>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct Atom {
    #[serde(rename = "entry", default)]
    entry: Vec<Entry>,
}
#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<String>,
    title: Option<String>,
    link: Option<Link>,
    published: Option<String>,
}
#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: Option<String>,
}

fn parse_rfc3339_to_unix(ts: &str) -> u64 {
    OffsetDateTime::parse(ts, &Rfc3339)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|x| u64::try_from(x).ok())
        .unwrap_or(0)
}

/// Decode HTML entities and collapse whitespace in feed-provided text.
fn clean_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an Atom document into entries. Entries without an id are skipped;
/// everything else defaults to empty strings.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);
    let atom: Atom = from_str(&xml_clean).context("parsing atom feed xml")?;

    let mut out = Vec::with_capacity(atom.entry.len());
    for it in atom.entry {
        let Some(id) = it.id else {
            continue;
        };
        out.push(FeedEntry {
            id,
            title: clean_text(it.title.as_deref().unwrap_or_default()),
            link: it
                .link
                .and_then(|l| l.href)
                .unwrap_or_default(),
            published_at: it
                .published
                .as_deref()
                .map(parse_rfc3339_to_unix)
                .unwrap_or(0),
        });
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("feed_parse_ms").record(ms);
    Ok(out)
}

pub struct HttpFeedReader {
    client: reqwest::Client,
}

impl HttpFeedReader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFeedReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedReader for HttpFeedReader {
    async fn fetch_entries(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let body = match self.client.get(url).send().await {
            Ok(resp) => resp.text().await.context("feed http .text()")?,
            Err(e) => {
                tracing::warn!(error = ?e, feed = self.name(), "feed http error");
                return Err(e).context("feed http get()");
            }
        };
        parse_feed(&body)
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

/// Most recent entry of the feed, or None. Feed failures never fail the
/// caller: they are logged, counted and flattened into absence.
pub async fn fetch_latest_entry(reader: &dyn FeedReader, url: &str) -> Option<FeedEntry> {
    match reader.fetch_entries(url).await {
        Ok(entries) => entries.into_iter().next(),
        Err(e) => {
            tracing::warn!(error = ?e, feed = reader.name(), "feed unavailable, continuing without latest entry");
            counter!("feed_errors_total").increment(1);
            None
        }
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
