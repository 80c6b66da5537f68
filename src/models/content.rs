use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::section::deserialize_sections;
use super::{FeaturedImage, Media, Section};

/// A post or page as returned by WPGraphQL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentNode {
    pub database_id: u64,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub uri: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<FeaturedImage>,
}

impl ContentNode {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn featured_media(&self) -> Option<&Media> {
        self.featured_image.as_ref().and_then(|f| f.node.as_ref())
    }

    /// WPGraphQL dates are site-local and offset-less (`2024-05-01T10:00:00`).
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|d| d.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .map(|n| n.and_utc())
            })
    }

    pub fn display_date(&self) -> Option<String> {
        self.published_at().map(|d| d.format("%B %-d, %Y").to_string())
    }

    pub fn href(&self) -> String {
        match (&self.uri, &self.slug) {
            (Some(uri), _) => uri.clone(),
            (None, Some(slug)) => format!("/post/{slug}"),
            (None, None) => format!("/preview/{}", self.database_id),
        }
    }
}

/// A landing page: an ordered list of sections instead of flat HTML.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Landing {
    pub database_id: u64,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub uri: Option<String>,
    #[serde(deserialize_with = "deserialize_sections")]
    pub sections: Vec<Section>,
}

impl Landing {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn has_recent_posts(&self) -> bool {
        self.sections
            .iter()
            .any(|s| matches!(s, Section::RecentPosts(_)))
    }

    pub fn href(&self) -> String {
        match &self.slug {
            Some(slug) => format!("/landing/{slug}"),
            None => format!("/landing/{}", self.database_id),
        }
    }
}
