//! Section resolver: maps each landing `Section` to its renderer by
//! discriminant.

use askama::Template;

use super::components::{
    render_card, render_feature, ImageView, LinkView, PostCardView,
};
use crate::models::*;

const HERO_IMAGE_WIDTH: u32 = 1920;
const CONTENT_IMAGE_WIDTH: u32 = 1280;
const THUMB_WIDTH: u32 = 640;
const LOGO_WIDTH: u32 = 320;

/// Data some sections need beyond their own payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionContext {
    pub recent_posts: Vec<ContentNode>,
}

impl SectionContext {
    pub fn new(recent_posts: Vec<ContentNode>) -> Self {
        Self { recent_posts }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedSection {
    Node { key: String, html: String },
    Empty,
}

impl RenderedSection {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn html(&self) -> &str {
        match self {
            Self::Node { html, .. } => html,
            Self::Empty => "",
        }
    }
}

#[derive(Template)]
#[template(path = "sections/hero.html")]
pub struct HeroTemplate {
    pub key: String,
    pub layout: &'static str,
    pub heading: String,
    pub summary: Option<String>,
    pub image: Option<ImageView>,
    pub links: Vec<LinkView>,
}

#[derive(Template)]
#[template(path = "sections/text.html")]
pub struct TextTemplate {
    pub key: String,
    pub layout: &'static str,
    pub eyebrow: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub links: Vec<LinkView>,
}

pub struct AccordionItemView {
    pub title: String,
    pub body: Option<String>,
    pub link: Option<LinkView>,
}

#[derive(Template)]
#[template(path = "sections/accordion.html")]
pub struct AccordionTemplate {
    pub key: String,
    pub title: Option<String>,
    pub items: Vec<AccordionItemView>,
}

#[derive(Template)]
#[template(path = "sections/card_group.html")]
pub struct CardGroupTemplate {
    pub key: String,
    pub title: Option<String>,
    pub cards: Vec<String>,
}

pub struct SlideView {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub image: Option<ImageView>,
}

#[derive(Template)]
#[template(path = "sections/carousel.html")]
pub struct CarouselTemplate {
    pub key: String,
    pub title: Option<String>,
    pub slides: Vec<SlideView>,
}

#[derive(Template)]
#[template(path = "sections/embed.html")]
pub struct EmbedTemplate {
    pub key: String,
    pub title: Option<String>,
    pub script: String,
    pub caption: Option<String>,
}

#[derive(Template)]
#[template(path = "sections/gallery.html")]
pub struct GalleryTemplate {
    pub key: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub images: Vec<ImageView>,
}

#[derive(Template)]
#[template(path = "sections/logo_collection.html")]
pub struct LogoCollectionTemplate {
    pub key: String,
    pub title: Option<String>,
    pub logos: Vec<ImageView>,
}

#[derive(Template)]
#[template(path = "sections/media.html")]
pub struct MediaTemplate {
    pub key: String,
    pub title: Option<String>,
    pub image: Option<ImageView>,
}

#[derive(Template)]
#[template(path = "sections/newsletter.html")]
pub struct NewsletterTemplate {
    pub key: String,
    pub title: String,
    pub summary: Option<String>,
}

pub struct PlanView {
    pub eyebrow: Option<String>,
    pub title: String,
    pub monthly_label: Option<String>,
    pub features: Vec<String>,
    pub cta: Option<LinkView>,
}

#[derive(Template)]
#[template(path = "sections/pricing.html")]
pub struct PricingTemplate {
    pub key: String,
    pub eyebrow: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub includes_label: Option<String>,
    pub plans: Vec<PlanView>,
}

#[derive(Template)]
#[template(path = "sections/quote.html")]
pub struct QuoteTemplate {
    pub key: String,
    pub quote: String,
    pub author: Option<String>,
    pub job_title: Option<String>,
    pub logo: Option<ImageView>,
    pub thumbnail: Option<ImageView>,
}

#[derive(Template)]
#[template(path = "sections/side_by_side.html")]
pub struct SideBySideTemplate {
    pub key: String,
    pub image_first: bool,
    pub eyebrow: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub image: Option<ImageView>,
    pub link: Option<LinkView>,
    pub features: Vec<String>,
}

#[derive(Template)]
#[template(path = "sections/recent_posts.html")]
pub struct RecentPostsTemplate {
    pub key: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub posts: Vec<PostCardView>,
}

fn hero_layout(layout: Option<&str>) -> &'static str {
    match layout {
        Some("image_bottom") => "hero--image-bottom",
        Some("image_bottom_split") => "hero--split",
        _ => "hero--image-top",
    }
}

fn text_layout(layout: Option<&str>) -> &'static str {
    match layout {
        Some("centered") => "text--centered",
        Some("buttons-right") => "text--buttons-right",
        _ => "text--default",
    }
}

fn images(media: &[Media], width: u32) -> Vec<ImageView> {
    media
        .iter()
        .filter_map(|m| ImageView::from_media(m, width))
        .collect()
}

/// Renders one section. Unknown variants render as `RenderedSection::Empty`.
pub fn render_section(
    section: &Section,
    index: usize,
    ctx: &SectionContext,
) -> RenderedSection {
    let Some(kind) = section.kind() else {
        log::debug!("Skipping unknown section at position {index}");
        return RenderedSection::Empty;
    };
    let key = format!("section-{index}-{kind}");

    let rendered = match section {
        Section::Hero(hero) => HeroTemplate {
            key: key.clone(),
            layout: hero_layout(hero.hero_layout.as_deref()),
            heading: hero.heading.clone().unwrap_or_default(),
            summary: hero.summary.clone(),
            image: ImageView::from_option(
                hero.media.as_ref(),
                HERO_IMAGE_WIDTH,
            ),
            links: LinkView::collect([hero.link.as_ref(), hero.link2.as_ref()]),
        }
        .render(),
        Section::Text(text) => TextTemplate {
            key: key.clone(),
            layout: text_layout(text.text_layout.as_deref()),
            eyebrow: text.eyebrow.clone(),
            title: text.title.clone(),
            body: text.body.clone(),
            links: LinkView::collect([text.link.as_ref(), text.link2.as_ref()]),
        }
        .render(),
        Section::Accordion(accordion) => AccordionTemplate {
            key: key.clone(),
            title: accordion.title.clone(),
            items: accordion
                .accordion_items
                .iter()
                .map(|item| AccordionItemView {
                    title: item.title.clone().unwrap_or_default(),
                    body: item.body.clone(),
                    link: item.link.as_ref().and_then(LinkView::from_link),
                })
                .collect(),
        }
        .render(),
        Section::CardGroup(group) => CardGroupTemplate {
            key: key.clone(),
            title: group.title.clone(),
            cards: group.cards.iter().filter_map(render_card).collect(),
        }
        .render(),
        Section::Carousel(carousel) => CarouselTemplate {
            key: key.clone(),
            title: carousel.title.clone(),
            slides: carousel
                .carousel_items
                .iter()
                .map(|item| SlideView {
                    title: item.title.clone(),
                    summary: item.summary.clone(),
                    image: ImageView::from_option(
                        item.media.as_ref(),
                        CONTENT_IMAGE_WIDTH,
                    ),
                })
                .collect(),
        }
        .render(),
        Section::Embed(embed) => EmbedTemplate {
            key: key.clone(),
            title: embed.title.clone(),
            script: embed.script.clone().unwrap_or_default(),
            caption: embed.caption.clone(),
        }
        .render(),
        Section::Gallery(gallery) => GalleryTemplate {
            key: key.clone(),
            title: gallery.title.clone(),
            summary: gallery.summary.clone(),
            images: images(&gallery.media_items, THUMB_WIDTH),
        }
        .render(),
        Section::LogoCollection(logos) => LogoCollectionTemplate {
            key: key.clone(),
            title: logos.title.clone(),
            logos: images(&logos.logos, LOGO_WIDTH),
        }
        .render(),
        Section::Media(media) => MediaTemplate {
            key: key.clone(),
            title: media.title.clone(),
            image: ImageView::from_option(
                media.media.as_ref(),
                CONTENT_IMAGE_WIDTH,
            ),
        }
        .render(),
        Section::Newsletter(newsletter) => NewsletterTemplate {
            key: key.clone(),
            title: newsletter
                .title
                .clone()
                .unwrap_or_else(|| "Subscribe to our newsletter".to_string()),
            summary: newsletter.summary.clone(),
        }
        .render(),
        Section::Pricing(pricing) => PricingTemplate {
            key: key.clone(),
            eyebrow: pricing.eyebrow.clone(),
            title: pricing.title.clone(),
            summary: pricing.summary.clone(),
            includes_label: pricing.includes_label.clone(),
            plans: pricing
                .pricing_cards
                .iter()
                .map(|card| PlanView {
                    eyebrow: card.eyebrow.clone(),
                    title: card.title.clone().unwrap_or_default(),
                    monthly_label: card.monthly_label.clone(),
                    features: card.features.clone(),
                    cta: card.cta_link.as_ref().and_then(|url| {
                        LinkView::from_link(&Link {
                            url: Some(url.clone()),
                            title: card.cta_text.clone(),
                            target: None,
                        })
                    }),
                })
                .collect(),
        }
        .render(),
        Section::Quote(quote) => QuoteTemplate {
            key: key.clone(),
            quote: quote.quote.clone().unwrap_or_default(),
            author: quote.author.clone(),
            job_title: quote.job_title.clone(),
            logo: ImageView::from_option(quote.logo.as_ref(), LOGO_WIDTH),
            thumbnail: ImageView::from_option(quote.thumbnail.as_ref(), 160),
        }
        .render(),
        Section::SideBySide(side) => SideBySideTemplate {
            key: key.clone(),
            image_first: side.side_by_side_layout.as_deref() != Some("image_right"),
            eyebrow: side.eyebrow.clone(),
            title: side.title.clone(),
            summary: side.summary.clone(),
            image: ImageView::from_option(
                side.media.as_ref(),
                CONTENT_IMAGE_WIDTH,
            ),
            link: side.link.as_ref().and_then(LinkView::from_link),
            features: side.features.iter().filter_map(render_feature).collect(),
        }
        .render(),
        Section::RecentPosts(recent) => RecentPostsTemplate {
            key: key.clone(),
            title: recent
                .title
                .clone()
                .unwrap_or_else(|| "Recent posts".to_string()),
            subtitle: recent.subtitle.clone(),
            posts: ctx.recent_posts.iter().map(PostCardView::from).collect(),
        }
        .render(),
        Section::Unknown => return RenderedSection::Empty,
    };

    match rendered {
        Ok(html) => RenderedSection::Node { key, html },
        Err(e) => {
            log::error!("Failed to render {kind} section: {e}");
            RenderedSection::Empty
        }
    }
}

/// Renders sections in the order given, dropping the empty ones.
pub fn render_sections(
    sections: &[Section],
    ctx: &SectionContext,
) -> Vec<String> {
    sections
        .iter()
        .enumerate()
        .map(|(index, section)| render_section(section, index, ctx))
        .filter_map(|rendered| match rendered {
            RenderedSection::Node { html, .. } => Some(html),
            RenderedSection::Empty => None,
        })
        .collect()
}
