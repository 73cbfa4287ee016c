// tests/aggregate_merge.rs
//
// End-to-end merge invariants through the public `aggregate` entry point,
// with fake source and reader injected the way the HTTP layer injects the
// real ones.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use podcast_atlas::aggregator::aggregate;
use podcast_atlas::config::Config;
use podcast_atlas::error::AggregateError;
use podcast_atlas::feed::{FeedEntry, FeedReader};
use podcast_atlas::store::types::QueryPage;
use podcast_atlas::store::RecordSource;

fn test_config(source_id: &str) -> Config {
    Config {
        store_token: String::new(),
        source_id: source_id.to_string(),
        store_base_url: "http://unused.invalid".to_string(),
        feed_channel_id: "UC_test".to_string(),
    }
}

struct FakeSource {
    pages: Vec<QueryPage>,
    calls: AtomicUsize,
}

impl FakeSource {
    fn single_page(results: serde_json::Value) -> Self {
        Self {
            pages: vec![QueryPage {
                results: serde_json::from_value(results).expect("records json"),
                has_more: false,
                next_cursor: None,
            }],
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecordSource for FakeSource {
    async fn query_page(
        &self,
        _source_id: &str,
        _cursor: Option<&str>,
    ) -> Result<QueryPage, podcast_atlas::error::StoreError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pages[idx].clone())
    }
}

struct FakeReader {
    entries: Option<Vec<FeedEntry>>, // None => fetch fails
    calls: AtomicUsize,
}

impl FakeReader {
    fn with_entries(entries: Vec<FeedEntry>) -> Self {
        Self {
            entries: Some(entries),
            calls: AtomicUsize::new(0),
        }
    }
    fn failing() -> Self {
        Self {
            entries: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FeedReader for FakeReader {
    async fn fetch_entries(&self, _url: &str) -> Result<Vec<FeedEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.entries {
            Some(v) => Ok(v.clone()),
            None => Err(anyhow::anyhow!("feed offline")),
        }
    }
    fn name(&self) -> &'static str {
        "fake"
    }
}

fn video(id: &str) -> FeedEntry {
    FeedEntry {
        id: id.to_string(),
        title: "T".to_string(),
        link: "https://x".to_string(),
        published_at: 0,
    }
}

fn two_cities() -> serde_json::Value {
    json!([
        {
            "id": "rec-taipei",
            "properties": {
                "Name": { "title": [{ "plain_text": "Taipei" }] },
                "Continent": { "select": { "name": "Asia" } },
                "Lat": { "number": 25.03 },
                "Lng": { "number": 121.56 }
            }
        },
        {
            "id": "rec-lima",
            "properties": {
                "Name": { "title": [{ "plain_text": "Lima" }] },
                "Lat": { "number": -12.05 },
                "Lng": { "number": -77.04 }
            }
        }
    ])
}

#[tokio::test]
async fn feed_entry_wins_the_latest_slot() {
    let source = FakeSource::single_page(two_cities());
    let reader = FakeReader::with_entries(vec![video("v1")]);

    let out = aggregate(&source, &reader, &test_config("src_1"))
        .await
        .expect("aggregate ok");

    let latest = out.latest.expect("latest present");
    assert_eq!(latest.id, "v1");
    assert_eq!(latest.continent, "Latest");
    assert!(latest.is_general);
    assert_eq!(latest.coordinates.lat, None);
    assert_eq!(out.locations.len(), 2);
    assert_eq!(out.locations[0].name, "Taipei");
    assert_eq!(out.locations[1].continent, "Other");
}

#[tokio::test]
async fn feed_failure_falls_back_to_first_location() {
    let source = FakeSource::single_page(two_cities());
    let reader = FakeReader::failing();

    let out = aggregate(&source, &reader, &test_config("src_1"))
        .await
        .expect("feed failure must not fail the request");

    let latest = out.latest.expect("latest present");
    assert_eq!(latest.id, "rec-taipei");
    assert!(!latest.is_general);
    assert_eq!(out.locations.len(), 2);
}

#[tokio::test]
async fn nothing_anywhere_means_null_latest() {
    let source = FakeSource::single_page(json!([]));
    let reader = FakeReader::with_entries(vec![]);

    let out = aggregate(&source, &reader, &test_config("src_1"))
        .await
        .expect("aggregate ok");
    assert!(out.latest.is_none());
    assert!(out.locations.is_empty());
}

#[tokio::test]
async fn malformed_records_drop_without_reordering() {
    let source = FakeSource::single_page(json!([
        { "id": "a", "properties": {} },
        { "id": "broken" },
        { "id": "b", "properties": {} }
    ]));
    let reader = FakeReader::with_entries(vec![]);

    let out = aggregate(&source, &reader, &test_config("src_1"))
        .await
        .expect("aggregate ok");
    let ids: Vec<&str> = out.locations.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn missing_source_id_aborts_before_any_io() {
    let source = FakeSource::single_page(json!([]));
    let reader = FakeReader::with_entries(vec![video("v1")]);

    let err = aggregate(&source, &reader, &test_config(""))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AggregateError::Configuration));
    assert!(err.to_string().contains("source id"));

    assert_eq!(source.calls.load(Ordering::SeqCst), 0, "no store call");
    assert_eq!(reader.calls.load(Ordering::SeqCst), 0, "no feed call");
}

#[tokio::test]
async fn upstream_error_surfaces_as_aggregate_error() {
    struct Failing;
    #[async_trait]
    impl RecordSource for Failing {
        async fn query_page(
            &self,
            _source_id: &str,
            _cursor: Option<&str>,
        ) -> Result<QueryPage, podcast_atlas::error::StoreError> {
            Err(podcast_atlas::error::StoreError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    let reader = FakeReader::with_entries(vec![video("v1")]);
    let err = aggregate(&Failing, &reader, &test_config("src_1"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AggregateError::Upstream(_)));
}
