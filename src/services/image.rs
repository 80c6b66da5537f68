use std::io::Cursor;
use std::time::Duration;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use reqwest::redirect::Policy;
use serde::Deserialize;
use url::Url;

use crate::common::ImageError;

pub const MAX_DIMENSION: u32 = 3840;
pub const DEFAULT_QUALITY: u8 = 75;
pub const MAX_SOURCE_BYTES: usize = 20 * 1024 * 1024;
pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Query string of `GET /api/image`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRequest {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageParams {
    pub url: Url,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: u8,
}

impl ImageRequest {
    /// Checks the source against the host allow-list and clamps the sizing
    /// knobs.
    pub fn validate(
        &self,
        allowed_hosts: &[String],
    ) -> Result<ImageParams, ImageError> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ImageError::InvalidUrl("missing url".into()))?;

        let url = Url::parse(raw)
            .map_err(|e| ImageError::InvalidUrl(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ImageError::InvalidUrl(format!(
                "unsupported scheme {}",
                url.scheme()
            )));
        }

        let host = url
            .host_str()
            .map(str::to_lowercase)
            .ok_or_else(|| ImageError::InvalidUrl("url has no host".into()))?;

        if !allowed_hosts.iter().any(|allowed| allowed == &host) {
            return Err(ImageError::HostNotAllowed(host));
        }

        let clamp = |d: Option<u32>| {
            d.filter(|v| *v > 0).map(|v| v.min(MAX_DIMENSION))
        };

        Ok(ImageParams {
            url,
            width: clamp(self.width),
            height: clamp(self.height),
            quality: self.quality.unwrap_or(DEFAULT_QUALITY).clamp(1, 100),
        })
    }
}

#[derive(Debug)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Fetches source images for the delivery endpoint.
///
/// Redirects are not followed: the allow-list is checked against the request
/// URL only, so a redirect could otherwise reach any host.
#[derive(Clone)]
pub struct ImageProxy {
    http: reqwest::Client,
    allowed_hosts: Vec<String>,
    max_bytes: usize,
}

impl ImageProxy {
    pub fn new(
        timeout: Duration,
        allowed_hosts: Vec<String>,
    ) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            http,
            allowed_hosts,
            max_bytes: MAX_SOURCE_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn allowed_hosts(&self) -> &[String] {
        &self.allowed_hosts
    }

    pub async fn fetch(
        &self,
        params: &ImageParams,
    ) -> Result<Vec<u8>, ImageError> {
        let mut response = self
            .http
            .get(params.url.clone())
            .send()
            .await
            .map_err(|e| ImageError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageError::UpstreamStatus(response.status().as_u16()));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                return Err(ImageError::TooLarge(self.max_bytes));
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ImageError::Fetch(e.to_string()))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(ImageError::TooLarge(self.max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}

/// Target size that fits inside the requested box, keeping the aspect ratio
/// and never upscaling.
pub fn target_dimensions(
    (src_w, src_h): (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (src_w, src_h);
    }

    let max_w = width.unwrap_or(src_w).min(src_w) as f64;
    let max_h = height.unwrap_or(src_h).min(src_h) as f64;
    let scale = (max_w / src_w as f64).min(max_h / src_h as f64);

    let w = ((src_w as f64 * scale).round() as u32).max(1);
    let h = ((src_h as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Decodes, resizes and re-encodes an image. CPU bound; run it off the
/// async workers.
pub fn transform(
    source: &[u8],
    params: &ImageParams,
) -> Result<EncodedImage, ImageError> {
    let img = image::load_from_memory(source)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let (w, h) =
        target_dimensions(img.dimensions(), params.width, params.height);
    let img = if (w, h) == img.dimensions() {
        img
    } else {
        img.resize_exact(w, h, FilterType::Lanczos3)
    };

    encode(&img, params.quality)
}

fn encode(img: &DynamicImage, quality: u8) -> Result<EncodedImage, ImageError> {
    let mut bytes = Vec::new();

    if img.color().has_alpha() {
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        return Ok(EncodedImage {
            bytes,
            content_type: "image/png",
        });
    }

    let rgb = img.to_rgb8();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode_image(&rgb)
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(EncodedImage {
        bytes,
        content_type: "image/jpeg",
    })
}
