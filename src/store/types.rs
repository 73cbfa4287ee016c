// src/store/types.rs
//
// Wire shapes for the content-store query API. Records carry a bag of named
// property values; each property wraps its payload in a type-specific shape,
// so every field is read through an explicit accessor returning an Option
// and the caller decides the default.

use serde::Deserialize;

/// One page of a paginated query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryPage {
    pub results: Vec<RawRecord>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A raw content-store record. A record without a property bag is malformed
/// and gets dropped during normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub properties: Option<PropertyBag>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyBag {
    #[serde(rename = "Name")]
    pub name: Option<TitleProperty>,
    #[serde(rename = "Continent")]
    pub continent: Option<SelectProperty>,
    #[serde(rename = "Lat")]
    pub lat: Option<NumberProperty>,
    #[serde(rename = "Lng")]
    pub lng: Option<NumberProperty>,
    #[serde(rename = "PodcastTitle")]
    pub podcast_title: Option<RichTextProperty>,
    #[serde(rename = "PodcastUrl")]
    pub podcast_url: Option<UrlProperty>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleProperty {
    #[serde(default)]
    pub title: Vec<TextSpan>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichTextProperty {
    #[serde(default)]
    pub rich_text: Vec<TextSpan>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextSpan {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectProperty {
    pub select: Option<SelectValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectValue {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NumberProperty {
    pub number: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlProperty {
    pub url: Option<String>,
}

impl PropertyBag {
    /// First plain-text span of the `Name` title, empty spans treated as
    /// absent.
    pub fn display_name(&self) -> Option<&str> {
        first_span(&self.name.as_ref()?.title)
    }

    pub fn continent(&self) -> Option<&str> {
        let value = self.continent.as_ref()?.select.as_ref()?;
        non_empty(&value.name)
    }

    /// Present-or-absent only: an explicit 0.0 is a real coordinate.
    pub fn lat(&self) -> Option<f64> {
        self.lat.as_ref()?.number
    }

    pub fn lng(&self) -> Option<f64> {
        self.lng.as_ref()?.number
    }

    pub fn podcast_title(&self) -> Option<&str> {
        first_span(&self.podcast_title.as_ref()?.rich_text)
    }

    pub fn podcast_url(&self) -> Option<&str> {
        non_empty(self.podcast_url.as_ref()?.url.as_deref()?)
    }
}

fn first_span(spans: &[TextSpan]) -> Option<&str> {
    non_empty(&spans.first()?.plain_text)
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
