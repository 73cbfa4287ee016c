// src/store/mod.rs
pub mod http;
pub mod types;

use async_trait::async_trait;
use metrics::counter;

use crate::error::StoreError;
use types::{QueryPage, RawRecord};

/// Hard stop for the cursor loop. Deliberate deviation from an unbounded
/// follow-the-cursor walk: a misbehaving source that always reports more
/// pages would otherwise stall the request forever.
pub const MAX_PAGES: u32 = 100;

/// A paginated record source. Implemented over HTTP in production and by
/// in-memory fakes in tests.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn query_page(
        &self,
        source_id: &str,
        cursor: Option<&str>,
    ) -> Result<QueryPage, StoreError>;
}

/// Drain the source: request pages with the continuation cursor (initially
/// absent) until it stops reporting more. Page requests are sequential, each
/// cursor comes from the previous response. Errors propagate, no retries.
pub async fn fetch_all_records(
    source: &dyn RecordSource,
    source_id: &str,
) -> Result<Vec<RawRecord>, StoreError> {
    let mut all: Vec<RawRecord> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0u32;

    loop {
        if pages >= MAX_PAGES {
            return Err(StoreError::PageCap {
                source_id: source_id.to_string(),
                max_pages: MAX_PAGES,
            });
        }

        let page = source.query_page(source_id, cursor.as_deref()).await?;
        pages += 1;
        counter!("store_pages_fetched_total").increment(1);

        all.extend(page.results);
        if !page.has_more {
            break;
        }
        cursor = page.next_cursor;
    }

    tracing::debug!(source_id, pages, records = all.len(), "content store drained");
    Ok(all)
}
