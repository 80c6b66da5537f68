use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Media {
    pub source_url: Option<String>,
    pub alt_text: Option<String>,
    pub media_details: Option<MediaDetails>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaDetails {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Media {
    pub fn width(&self) -> Option<u32> {
        self.media_details.and_then(|d| d.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.media_details.and_then(|d| d.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub url: Option<String>,
    pub title: Option<String>,
    pub target: Option<String>,
}

/// WPGraphQL wraps a post's featured image in an edge:
/// `featuredImage { node { ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturedImage {
    pub node: Option<Media>,
}
