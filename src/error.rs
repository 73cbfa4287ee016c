// src/error.rs
use thiserror::Error;

/// Failure while talking to the content store. Fatal to the request,
/// never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content store returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The cursor loop hit its hard page cap. The upstream contract promises
    /// termination via `has_more`, but nothing enforces it.
    #[error("pagination exceeded {max_pages} pages for source '{source_id}'")]
    PageCap { source_id: String, max_pages: u32 },
}

/// Request-level error taxonomy surfaced by the aggregation entry point.
/// Feed failures are deliberately absent: they are swallowed and logged,
/// never fatal.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("content-store source id is not configured")]
    Configuration,

    #[error("content store query failed: {0}")]
    Upstream(#[from] StoreError),
}
