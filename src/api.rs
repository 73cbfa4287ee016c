// src/api.rs
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::aggregator;
use crate::config::Config;
use crate::feed::{FeedReader, HttpFeedReader};
use crate::store::{http::HttpRecordSource, RecordSource};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
    pub reader: Arc<dyn FeedReader>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Production wiring: HTTP source and reader built from env config.
    pub fn from_env() -> Self {
        let config = Config::from_env();
        let source = HttpRecordSource::new(&config.store_base_url, &config.store_token);
        Self {
            source: Arc::new(source),
            reader: Arc::new(HttpFeedReader::new()),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/locations", get(locations))
        // The map client lives on another origin; the CORS layer also
        // answers OPTIONS preflights with 200 and an empty body.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

async fn locations(State(state): State<AppState>) -> Response {
    match aggregator::aggregate(state.source.as_ref(), state.reader.as_ref(), &state.config).await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "aggregation failed");
            let body = ErrorBody {
                error: "Internal Server Error".to_string(),
                details: Some(err.to_string()),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
