use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Page,
    Landing,
}

impl ContentKind {
    /// Lookup order of the public `/{slug}` route.
    pub const PUBLIC_FALLBACK: [ContentKind; 2] = [Self::Page, Self::Landing];

    /// Lookup order of the `/preview/{id}` route.
    pub const PREVIEW_FALLBACK: [ContentKind; 3] =
        [Self::Post, Self::Page, Self::Landing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
            Self::Landing => "landing",
        }
    }

    /// Identifier type used when a route segment is not numeric.
    /// WPGraphQL pages have no `SLUG` id type, so they are looked up by `URI`.
    pub fn text_id_type(&self) -> IdType {
        match self {
            Self::Post | Self::Landing => IdType::Slug,
            Self::Page => IdType::Uri,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "page" => Ok(Self::Page),
            "landing" => Ok(Self::Landing),
            _ => Err(format!("invalid content kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdType {
    DatabaseId,
    Slug,
    Uri,
}

impl IdType {
    pub fn as_graphql(&self) -> &'static str {
        match self {
            Self::DatabaseId => "DATABASE_ID",
            Self::Slug => "SLUG",
            Self::Uri => "URI",
        }
    }
}

/// A route segment resolved to the identifier sent to the content source.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RouteLookup {
    pub id: String,
    pub id_type: IdType,
}
