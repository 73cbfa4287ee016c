// src/config.rs
//
// Environment-provided settings. Nothing here fails: a missing source id is
// only rejected at aggregation time, before any I/O, so the service still
// boots and answers /health.

use std::env;

pub const ENV_STORE_TOKEN: &str = "CONTENT_STORE_TOKEN";
pub const ENV_SOURCE_ID: &str = "CONTENT_STORE_SOURCE_ID";
pub const ENV_STORE_BASE_URL: &str = "CONTENT_STORE_BASE_URL";
pub const ENV_FEED_CHANNEL_ID: &str = "FEED_CHANNEL_ID";

/// The channel whose uploads feed the "latest" marker.
pub const DEFAULT_FEED_CHANNEL_ID: &str = "UCK3UVOXNDeMOKpQcc8ix82w";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_token: String,
    pub source_id: String,
    pub store_base_url: String,
    pub feed_channel_id: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            store_token: env::var(ENV_STORE_TOKEN).unwrap_or_default(),
            source_id: env::var(ENV_SOURCE_ID).unwrap_or_default(),
            store_base_url: env::var(ENV_STORE_BASE_URL)
                .unwrap_or_else(|_| crate::store::http::DEFAULT_BASE_URL.to_string()),
            feed_channel_id: env::var(ENV_FEED_CHANNEL_ID)
                .unwrap_or_else(|_| DEFAULT_FEED_CHANNEL_ID.to_string()),
        }
    }

    /// The feed URL is a fixed template over the channel id.
    pub fn feed_url(&self) -> String {
        format!(
            "https://www.youtube.com/feeds/videos.xml?channel_id={}",
            self.feed_channel_id
        )
    }
}
