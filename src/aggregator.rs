// src/aggregator.rs
//
// Orchestration entry point: one call drains the content store and asks the
// feed for its newest entry, concurrently, then merges both into the
// response payload. This is the only function the HTTP layer talks to.

use metrics::{counter, gauge};
use time::OffsetDateTime;

use crate::config::Config;
use crate::error::AggregateError;
use crate::feed::{self, FeedReader};
use crate::locations::{self, AggregateResult};
use crate::store::{self, RecordSource};

pub async fn aggregate(
    source: &dyn RecordSource,
    reader: &dyn FeedReader,
    config: &Config,
) -> Result<AggregateResult, AggregateError> {
    crate::metrics::ensure_metrics_described();

    // Guard before any I/O.
    let source_id = config.source_id.trim();
    if source_id.is_empty() {
        return Err(AggregateError::Configuration);
    }

    let feed_url = config.feed_url();
    let (records, latest_entry) = tokio::join!(
        store::fetch_all_records(source, source_id),
        feed::fetch_latest_entry(reader, &feed_url),
    );
    let records = records?;

    let locations = locations::normalize(&records);
    let dropped = records.len() - locations.len();
    if dropped > 0 {
        tracing::debug!(dropped, "records without a property bag dropped");
    }

    counter!("locations_kept_total").increment(locations.len() as u64);
    counter!("records_dropped_total").increment(dropped as u64);
    gauge!("aggregate_last_run_ts").set(OffsetDateTime::now_utc().unix_timestamp().max(0) as f64);

    let latest = locations::build_latest(latest_entry.as_ref(), &locations);
    tracing::info!(
        locations = locations.len(),
        has_feed_latest = latest_entry.is_some(),
        "aggregate complete"
    );

    Ok(AggregateResult { latest, locations })
}
