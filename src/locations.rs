// src/locations.rs
//
// Canonical map-ready location schema plus the normalize/merge step that
// turns raw store records and the newest feed entry into one payload.

use serde::{Deserialize, Serialize};

use crate::feed::FeedEntry;
use crate::store::types::RawRecord;

pub const DEFAULT_NAME: &str = "Unnamed";
pub const DEFAULT_CONTINENT: &str = "Other";
pub const DEFAULT_PODCAST_URL: &str = "#";
/// Continent label marking the feed-derived pseudo-location.
pub const LATEST_CONTINENT: &str = "Latest";
pub const LATEST_LABEL: &str = "Latest Upload";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub continent: String,
    /// True only for the feed-derived pseudo-location, which has no
    /// coordinates and must not be pinned on the map.
    #[serde(rename = "isGeneral")]
    pub is_general: bool,
    pub coordinates: Coordinates,
    pub podcast: PodcastRef,
}

/// Null on the pseudo-location, numeric everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastRef {
    pub title: String,
    pub url: String,
}

/// The `GET /api/locations` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub latest: Option<Location>,
    pub locations: Vec<Location>,
}

/// Map raw records to canonical locations, preserving input order. Records
/// without a property bag are dropped, not defaulted. Pure: same input,
/// same output, no side effects.
pub fn normalize(records: &[RawRecord]) -> Vec<Location> {
    records.iter().filter_map(location_from_record).collect()
}

fn location_from_record(record: &RawRecord) -> Option<Location> {
    let props = record.properties.as_ref()?;
    Some(Location {
        id: record.id.clone(),
        name: props.display_name().unwrap_or(DEFAULT_NAME).to_string(),
        continent: props
            .continent()
            .unwrap_or(DEFAULT_CONTINENT)
            .to_string(),
        is_general: false,
        coordinates: Coordinates {
            lat: Some(props.lat().unwrap_or(0.0)),
            lng: Some(props.lng().unwrap_or(0.0)),
        },
        podcast: PodcastRef {
            title: props.podcast_title().unwrap_or_default().to_string(),
            url: props
                .podcast_url()
                .unwrap_or(DEFAULT_PODCAST_URL)
                .to_string(),
        },
    })
}

/// The highlighted entry: the feed entry when there is one, else the first
/// geographic location, else nothing.
pub fn build_latest(feed_entry: Option<&FeedEntry>, locations: &[Location]) -> Option<Location> {
    if let Some(entry) = feed_entry {
        return Some(Location {
            id: entry.id.clone(),
            name: LATEST_LABEL.to_string(),
            continent: LATEST_CONTINENT.to_string(),
            is_general: true,
            coordinates: Coordinates {
                lat: None,
                lng: None,
            },
            podcast: PodcastRef {
                title: entry.title.clone(),
                url: entry.link.clone(),
            },
        });
    }
    locations.first().cloned()
}
