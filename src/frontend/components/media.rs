use crate::models::{Link, Media};

pub const IMAGE_ENDPOINT: &str = "/api/image";

/// Routes a CMS media URL through the local image-delivery endpoint.
pub fn image_url(source: &str, width: u32) -> String {
    let encoded: String =
        url::form_urlencoded::byte_serialize(source.as_bytes()).collect();
    format!("{IMAGE_ENDPOINT}?url={encoded}&width={width}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageView {
    /// `None` when the media item has no source URL.
    pub fn from_media(media: &Media, width: u32) -> Option<Self> {
        let source = media.source_url.as_deref().filter(|s| !s.is_empty())?;

        let (w, h) = match (media.width(), media.height()) {
            (Some(w), Some(h)) if w > 0 => {
                let w_out = w.min(width);
                let h_out = (h as u64 * w_out as u64) / w as u64;
                (Some(w_out), Some(h_out as u32))
            }
            _ => (None, None),
        };

        Some(Self {
            src: image_url(source, width),
            alt: media.alt_text.clone().unwrap_or_default(),
            width: w,
            height: h,
        })
    }

    pub fn from_option(media: Option<&Media>, width: u32) -> Option<Self> {
        media.and_then(|m| Self::from_media(m, width))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkView {
    pub href: String,
    pub label: String,
    pub new_tab: bool,
}

impl LinkView {
    pub fn from_link(link: &Link) -> Option<Self> {
        let href = link.url.as_deref().filter(|u| !u.is_empty())?;

        Some(Self {
            href: href.to_string(),
            label: link
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Learn more".to_string()),
            new_tab: link.target.as_deref() == Some("_blank"),
        })
    }

    pub fn collect<'a>(
        links: impl IntoIterator<Item = Option<&'a Link>>,
    ) -> Vec<Self> {
        links
            .into_iter()
            .flatten()
            .filter_map(Self::from_link)
            .collect()
    }
}
