// src/store/http.rs
//
// Reqwest-backed record source. The query endpoint is a bearer-authenticated
// POST taking the source id in the path and an optional `start_cursor` in the
// JSON body; it answers with a page of records, a more-flag and the next
// cursor.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::types::QueryPage;
use super::RecordSource;
use crate::error::StoreError;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

pub struct HttpRecordSource {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpRecordSource {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn query_page(
        &self,
        source_id: &str,
        cursor: Option<&str>,
    ) -> Result<QueryPage, StoreError> {
        let url = format!("{}/data_sources/{}/query", self.base_url, source_id);

        let mut body = Map::new();
        if let Some(c) = cursor {
            body.insert("start_cursor".to_string(), Value::String(c.to_string()));
        }

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let page: QueryPage = resp.json().await?;
        tracing::debug!(
            source_id,
            results = page.results.len(),
            has_more = page.has_more,
            "content store page fetched"
        );
        Ok(page)
    }
}
