use askama::Template;

use super::{ImageView, LinkView};
use crate::models::{Card, ContentNode, Feature};

#[derive(Template)]
#[template(path = "components/stat_card.html")]
pub struct StatCardTemplate {
    pub heading: String,
    pub body: Option<String>,
    pub icon: Option<String>,
}

#[derive(Template)]
#[template(path = "components/custom_card.html")]
pub struct CustomCardTemplate {
    pub heading: String,
    pub body: Option<String>,
    pub summary: Option<String>,
    pub image: Option<ImageView>,
    pub link: Option<LinkView>,
    pub tags: Vec<String>,
}

#[derive(Template)]
#[template(path = "components/bullet_feature.html")]
pub struct BulletFeatureTemplate {
    pub text: String,
}

#[derive(Template)]
#[template(path = "components/stat_feature.html")]
pub struct StatFeatureTemplate {
    pub title: String,
    pub summary: Option<String>,
}

/// Second-level dispatch for `card_group`. Unknown card types yield `None`.
pub fn render_card(card: &Card) -> Option<String> {
    let rendered = match card {
        Card::Stat(stat) => StatCardTemplate {
            heading: stat.heading.clone().unwrap_or_default(),
            body: stat.body.clone(),
            icon: stat.icon.clone(),
        }
        .render(),
        Card::Custom(custom) => CustomCardTemplate {
            heading: custom.heading.clone().unwrap_or_default(),
            body: custom.body.clone(),
            summary: custom.summary.clone(),
            image: ImageView::from_option(custom.media.as_ref(), 640),
            link: custom.link.as_ref().and_then(LinkView::from_link),
            tags: custom.tags.clone(),
        }
        .render(),
        Card::Unknown => return None,
    };

    rendered
        .map_err(|e| log::error!("Failed to render card: {e}"))
        .ok()
}

/// Second-level dispatch for `side_by_side` features.
pub fn render_feature(feature: &Feature) -> Option<String> {
    let rendered = match feature {
        Feature::Bullet(bullet) => BulletFeatureTemplate {
            text: bullet.text.clone().unwrap_or_default(),
        }
        .render(),
        Feature::Stat(stat) => StatFeatureTemplate {
            title: stat.title.clone().unwrap_or_default(),
            summary: stat.summary.clone(),
        }
        .render(),
        Feature::Unknown => return None,
    };

    rendered
        .map_err(|e| log::error!("Failed to render feature: {e}"))
        .ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostCardView {
    pub title: String,
    pub href: String,
    pub excerpt: Option<String>,
    pub date: Option<String>,
    pub image: Option<ImageView>,
}

impl From<&ContentNode> for PostCardView {
    fn from(post: &ContentNode) -> Self {
        Self {
            title: post.title_or_default().to_string(),
            href: post.href(),
            excerpt: post.excerpt.clone(),
            date: post.display_date(),
            image: ImageView::from_option(post.featured_media(), 640),
        }
    }
}
