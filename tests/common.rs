#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use actix_web::{web, App, HttpServer};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};

use pressx_front::common::ClientError;
use pressx_front::config::AppConfig;
use pressx_front::models::*;
use pressx_front::services::ContentSource;

pub fn media_json(url: &str) -> Value {
    json!({
        "sourceUrl": url,
        "altText": "alt text",
        "mediaDetails": { "width": 2400, "height": 1200 }
    })
}

pub fn link_json(url: &str, title: &str) -> Value {
    json!({ "url": url, "title": title, "target": null })
}

/// One payload per section kind, in `SectionKind::ALL` order.
pub fn all_sections_json() -> Vec<Value> {
    let img = media_json("https://cms.example.com/wp-content/uploads/hero.jpg");

    vec![
        json!({
            "type": "hero",
            "heroLayout": "image_bottom",
            "heading": "Build faster",
            "summary": "A headless starter",
            "media": img,
            "link": link_json("/start", "Get started"),
            "link2": link_json("https://docs.example.com", "Docs")
        }),
        json!({
            "type": "text",
            "eyebrow": "Why",
            "title": "Text title",
            "body": "<p>Some <strong>rich</strong> text</p>",
            "textLayout": "centered",
            "link": null,
            "link2": null
        }),
        json!({
            "type": "accordion",
            "title": "FAQ",
            "accordionItems": [
                { "title": "Question one", "body": "<p>Answer one</p>", "link": null },
                { "title": "Question two", "body": "<p>Answer two</p>" }
            ]
        }),
        json!({
            "type": "card_group",
            "title": "Cards",
            "cards": [
                { "type": "stat", "heading": "99%", "body": "Uptime", "icon": "bolt" },
                { "type": "custom", "heading": "Custom card", "summary": "Summary", "tags": ["new"],
                  "media": img, "link": link_json("/more", "More") }
            ]
        }),
        json!({
            "type": "carousel",
            "title": "Carousel",
            "carouselItems": [ { "title": "Slide one", "summary": "First", "media": img } ]
        }),
        json!({
            "type": "embed",
            "title": "Embed",
            "script": "<iframe src=\"https://player.example.com/1\"></iframe>",
            "caption": "A video"
        }),
        json!({
            "type": "gallery",
            "title": "Gallery",
            "summary": "Pictures",
            "mediaItems": [img, img]
        }),
        json!({
            "type": "logo_collection",
            "title": "Trusted by",
            "logos": [img]
        }),
        json!({ "type": "media", "title": "Media", "media": img }),
        json!({ "type": "newsletter", "title": "Stay in touch", "summary": "Monthly news" }),
        json!({
            "type": "pricing",
            "eyebrow": "Plans",
            "title": "Pricing",
            "summary": "Pick one",
            "includesLabel": "Includes",
            "pricingCards": [
                { "eyebrow": "Starter", "title": "Basic", "monthlyLabel": "$9/mo",
                  "features": ["One site", "Email support"], "ctaText": "Buy", "ctaLink": "/buy" }
            ]
        }),
        json!({
            "type": "quote",
            "quote": "It just works.",
            "author": "Alex Doe",
            "jobTitle": "CTO",
            "logo": img,
            "thumbnail": null
        }),
        json!({
            "type": "side_by_side",
            "eyebrow": "Features",
            "sideBySideLayout": "image_right",
            "title": "Side by side",
            "summary": "<p>Left and right</p>",
            "media": img,
            "link": link_json("/features", "See features"),
            "features": [
                { "type": "bullet", "text": "Fast builds" },
                { "type": "stat", "title": "10x", "summary": "quicker" }
            ]
        }),
        json!({ "type": "recent_posts", "title": "Latest", "subtitle": "From the blog" }),
    ]
}

pub fn all_sections() -> Vec<Section> {
    all_sections_json()
        .into_iter()
        .map(Section::from_value)
        .collect()
}

pub fn landing_json(id: u64, slug: &str, sections: Vec<Value>) -> Value {
    json!({
        "databaseId": id,
        "title": format!("Landing {slug}"),
        "slug": slug,
        "uri": format!("/landing/{slug}/"),
        "sections": sections
    })
}

pub fn landing(id: u64, slug: &str, sections: Vec<Value>) -> Landing {
    serde_json::from_value(landing_json(id, slug, sections)).expect("valid landing fixture")
}

pub fn content_node(id: u64, slug: &str, title: &str) -> ContentNode {
    ContentNode {
        database_id: id,
        title: Some(title.to_string()),
        slug: Some(slug.to_string()),
        uri: Some(format!("/{slug}/")),
        date: Some("2024-05-01T10:00:00".to_string()),
        excerpt: Some(format!("<p>{title} excerpt</p>")),
        content: Some(format!("<p>{title} body</p>")),
        featured_image: None,
    }
}

pub fn menu_item(id: &str, parent: Option<&str>, label: &str) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        parent_id: parent.map(str::to_string),
        label: Some(label.to_string()),
        path: Some(format!("/{}", label.to_lowercase())),
        ..Default::default()
    }
}

/// Unsigned JWT whose payload carries `exp`.
pub fn jwt_expiring_at(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "exp": exp, "data": { "user": { "id": "1" } } }).to_string());
    format!("{header}.{payload}.signature")
}

pub fn config_from(vars: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

/// In-memory content source keyed by the lookup id sent to it.
#[derive(Default)]
pub struct FakeSource {
    pub posts: HashMap<String, ContentNode>,
    pub pages: HashMap<String, ContentNode>,
    pub landings: HashMap<String, Landing>,
    pub recent: Vec<ContentNode>,
    pub primary_menu: Vec<MenuItem>,
    pub fallback_menu: Vec<MenuItem>,
    pub front_page: Option<u64>,
    pub failing: Vec<ContentKind>,
    pub expired: Vec<ContentKind>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn find<T: Clone>(
        &self,
        kind: ContentKind,
        lookup: &RouteLookup,
        store: &HashMap<String, T>,
    ) -> Result<Option<T>, ClientError> {
        self.record(format!("{kind}:{}:{}", lookup.id, lookup.id_type.as_graphql()));

        if self.expired.contains(&kind) {
            return Err(ClientError::ExpiredToken("Expired token".into()));
        }
        if self.failing.contains(&kind) {
            return Err(ClientError::Status {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(store.get(&lookup.id).cloned())
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn post(
        &self,
        lookup: &RouteLookup,
    ) -> Result<Option<ContentNode>, ClientError> {
        self.find(ContentKind::Post, lookup, &self.posts)
    }

    async fn page(
        &self,
        lookup: &RouteLookup,
    ) -> Result<Option<ContentNode>, ClientError> {
        self.find(ContentKind::Page, lookup, &self.pages)
    }

    async fn landing(
        &self,
        lookup: &RouteLookup,
    ) -> Result<Option<Landing>, ClientError> {
        self.find(ContentKind::Landing, lookup, &self.landings)
    }

    async fn landings(&self) -> Result<Vec<Landing>, ClientError> {
        self.record("landings".into());
        Ok(self.landings.values().cloned().collect())
    }

    async fn recent_posts(
        &self,
        first: u32,
    ) -> Result<Vec<ContentNode>, ClientError> {
        self.record(format!("recent_posts:{first}"));
        Ok(self.recent.iter().take(first as usize).cloned().collect())
    }

    async fn menu_items(
        &self,
        location: &str,
    ) -> Result<Vec<MenuItem>, ClientError> {
        self.record(format!("menu_items:{location}"));
        Ok(self.primary_menu.clone())
    }

    async fn menu(&self, name: &str) -> Result<Vec<MenuItem>, ClientError> {
        self.record(format!("menu:{name}"));
        Ok(self.fallback_menu.clone())
    }

    async fn front_page_id(&self) -> Result<Option<u64>, ClientError> {
        self.record("front_page_id".into());
        Ok(self.front_page)
    }
}

/// Starts an actix server on an ephemeral port as a stand-in CMS and returns
/// its base URL. Must be called from inside an actix test runtime.
pub fn spawn_server<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let server =
        HttpServer::new(move || App::new().configure(configure.clone()))
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .expect("bind fake cms");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}
