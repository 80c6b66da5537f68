use serde::Deserialize;

use super::{null_as_default, Link, Media};

/// One renderable block of a landing page, tagged by its `type` field.
///
/// `Unknown` absorbs discriminants this build does not know about, and payloads
/// that fail to decode, so a CMS schema change never breaks a whole page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Hero(HeroSection),
    Text(TextSection),
    Accordion(AccordionSection),
    CardGroup(CardGroupSection),
    Carousel(CarouselSection),
    Embed(EmbedSection),
    Gallery(GallerySection),
    LogoCollection(LogoCollectionSection),
    Media(MediaSection),
    Newsletter(NewsletterSection),
    Pricing(PricingSection),
    Quote(QuoteSection),
    SideBySide(SideBySideSection),
    RecentPosts(RecentPostsSection),
    #[serde(other)]
    Unknown,
}

impl Section {
    pub fn from_value(value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(section) => section,
            Err(e) => {
                log::warn!("Dropping undecodable section: {e}");
                Self::Unknown
            }
        }
    }

    pub fn kind(&self) -> Option<SectionKind> {
        Some(match self {
            Self::Hero(_) => SectionKind::Hero,
            Self::Text(_) => SectionKind::Text,
            Self::Accordion(_) => SectionKind::Accordion,
            Self::CardGroup(_) => SectionKind::CardGroup,
            Self::Carousel(_) => SectionKind::Carousel,
            Self::Embed(_) => SectionKind::Embed,
            Self::Gallery(_) => SectionKind::Gallery,
            Self::LogoCollection(_) => SectionKind::LogoCollection,
            Self::Media(_) => SectionKind::Media,
            Self::Newsletter(_) => SectionKind::Newsletter,
            Self::Pricing(_) => SectionKind::Pricing,
            Self::Quote(_) => SectionKind::Quote,
            Self::SideBySide(_) => SectionKind::SideBySide,
            Self::RecentPosts(_) => SectionKind::RecentPosts,
            Self::Unknown => return None,
        })
    }
}

/// Decodes a list one element at a time so a single bad entry degrades to
/// the element's `Unknown` variant instead of failing its parent.
fn decode_each<'de, D, T>(
    deserializer: D,
    decode: fn(serde_json::Value) -> T,
) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> =
        Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().map(decode).collect())
}

pub(crate) fn deserialize_sections<'de, D>(
    deserializer: D,
) -> Result<Vec<Section>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    decode_each(deserializer, Section::from_value)
}

fn deserialize_cards<'de, D>(deserializer: D) -> Result<Vec<Card>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    decode_each(deserializer, Card::from_value)
}

fn deserialize_features<'de, D>(
    deserializer: D,
) -> Result<Vec<Feature>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    decode_each(deserializer, Feature::from_value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    Text,
    Accordion,
    CardGroup,
    Carousel,
    Embed,
    Gallery,
    LogoCollection,
    Media,
    Newsletter,
    Pricing,
    Quote,
    SideBySide,
    RecentPosts,
}

impl SectionKind {
    pub const ALL: [SectionKind; 14] = [
        Self::Hero,
        Self::Text,
        Self::Accordion,
        Self::CardGroup,
        Self::Carousel,
        Self::Embed,
        Self::Gallery,
        Self::LogoCollection,
        Self::Media,
        Self::Newsletter,
        Self::Pricing,
        Self::Quote,
        Self::SideBySide,
        Self::RecentPosts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Text => "text",
            Self::Accordion => "accordion",
            Self::CardGroup => "card_group",
            Self::Carousel => "carousel",
            Self::Embed => "embed",
            Self::Gallery => "gallery",
            Self::LogoCollection => "logo_collection",
            Self::Media => "media",
            Self::Newsletter => "newsletter",
            Self::Pricing => "pricing",
            Self::Quote => "quote",
            Self::SideBySide => "side_by_side",
            Self::RecentPosts => "recent_posts",
        }
    }

    /// Name of the GraphQL fragment this kind contributes to `Sections`.
    pub fn fragment_name(&self) -> &'static str {
        match self {
            Self::Hero => "HeroSection",
            Self::Text => "TextSection",
            Self::Accordion => "AccordionSection",
            Self::CardGroup => "CardGroupSection",
            Self::Carousel => "CarouselSection",
            Self::Embed => "EmbedSection",
            Self::Gallery => "GallerySection",
            Self::LogoCollection => "LogoCollectionSection",
            Self::Media => "MediaSection",
            Self::Newsletter => "NewsletterSection",
            Self::Pricing => "PricingSection",
            Self::Quote => "QuoteSection",
            Self::SideBySide => "SideBySideSection",
            Self::RecentPosts => "RecentPostsSection",
        }
    }

    /// Fields selected for this kind, without the `fragment ... on` header.
    pub fn fragment_fields(&self) -> &'static str {
        match self {
            Self::Hero => {
                "heroLayout heading summary media { ...MediaFields } link { ...LinkFields } link2 { ...LinkFields }"
            }
            Self::Text => {
                "eyebrow title body textLayout link { ...LinkFields } link2 { ...LinkFields }"
            }
            Self::Accordion => {
                "title accordionItems { title body link { ...LinkFields } }"
            }
            Self::CardGroup => {
                "title cards { type heading body summary icon tags media { ...MediaFields } link { ...LinkFields } }"
            }
            Self::Carousel => {
                "title carouselItems { title summary media { ...MediaFields } }"
            }
            Self::Embed => "title script caption",
            Self::Gallery => "title summary mediaItems { ...MediaFields }",
            Self::LogoCollection => "title logos { ...MediaFields }",
            Self::Media => "title media { ...MediaFields }",
            Self::Newsletter => "title summary",
            Self::Pricing => {
                "eyebrow title summary includesLabel pricingCards { eyebrow title monthlyLabel features ctaText ctaLink }"
            }
            Self::Quote => {
                "quote author jobTitle logo { ...MediaFields } thumbnail { ...MediaFields }"
            }
            Self::SideBySide => {
                "eyebrow sideBySideLayout title summary media { ...MediaFields } link { ...LinkFields } features { type text title summary }"
            }
            Self::RecentPosts => "title subtitle",
        }
    }

    pub fn fragment(&self) -> String {
        format!(
            "fragment {} on LandingSection {{ {} }}",
            self.fragment_name(),
            self.fragment_fields()
        )
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("invalid section type: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSection {
    pub hero_layout: Option<String>,
    pub heading: Option<String>,
    pub summary: Option<String>,
    pub media: Option<Media>,
    pub link: Option<Link>,
    pub link2: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSection {
    pub eyebrow: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub text_layout: Option<String>,
    pub link: Option<Link>,
    pub link2: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccordionSection {
    pub title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub accordion_items: Vec<AccordionItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccordionItem {
    pub title: Option<String>,
    pub body: Option<String>,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardGroupSection {
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_cards")]
    pub cards: Vec<Card>,
}

/// Second-level tagged union inside `card_group`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Card {
    Stat(StatCard),
    Custom(CustomCard),
    #[serde(other)]
    Unknown,
}

impl Card {
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            log::debug!("Dropping undecodable card: {e}");
            Self::Unknown
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatCard {
    pub heading: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CustomCard {
    pub heading: Option<String>,
    pub body: Option<String>,
    pub summary: Option<String>,
    pub media: Option<Media>,
    pub link: Option<Link>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselSection {
    pub title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub carousel_items: Vec<CarouselItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselItem {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub media: Option<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmbedSection {
    pub title: Option<String>,
    pub script: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GallerySection {
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub media_items: Vec<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogoCollectionSection {
    pub title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub logos: Vec<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MediaSection {
    pub title: Option<String>,
    pub media: Option<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewsletterSection {
    pub title: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingSection {
    pub eyebrow: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub includes_label: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub pricing_cards: Vec<PricingCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingCard {
    pub eyebrow: Option<String>,
    pub title: Option<String>,
    pub monthly_label: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteSection {
    pub quote: Option<String>,
    pub author: Option<String>,
    pub job_title: Option<String>,
    pub logo: Option<Media>,
    pub thumbnail: Option<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SideBySideSection {
    pub eyebrow: Option<String>,
    pub side_by_side_layout: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub media: Option<Media>,
    pub link: Option<Link>,
    #[serde(deserialize_with = "deserialize_features")]
    pub features: Vec<Feature>,
}

/// Second-level tagged union inside `side_by_side`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Feature {
    Bullet(BulletFeature),
    Stat(StatFeature),
    #[serde(other)]
    Unknown,
}

impl Feature {
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            log::debug!("Dropping undecodable feature: {e}");
            Self::Unknown
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BulletFeature {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatFeature {
    pub title: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecentPostsSection {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}
