use askama::Template;

use pressx_front::frontend::components::ImageView;
use pressx_front::models::{ChatLink, ChatMessage, ChatRole, Landing, MenuItem};

#[derive(Template)]
#[template(path = "public/layout.html")]
pub struct LayoutTemplate {
    pub title: String,
    pub nav: Vec<MenuItem>,
    pub body: String,
    pub chat_enabled: bool,
    pub preview: bool,
}

#[derive(Template)]
#[template(path = "public/landing.html")]
pub struct LandingTemplate {
    pub title: String,
    pub sections: Vec<String>,
}

#[derive(Template)]
#[template(path = "public/content.html")]
pub struct ContentTemplate {
    pub kind: &'static str,
    pub title: String,
    pub date: Option<String>,
    pub image: Option<ImageView>,
    pub content: Option<String>,
}

pub struct LandingLink {
    pub title: String,
    pub href: String,
}

impl From<&Landing> for LandingLink {
    fn from(landing: &Landing) -> Self {
        Self {
            title: landing.title_or_default().to_string(),
            href: landing.href(),
        }
    }
}

#[derive(Template)]
#[template(path = "public/landings.html")]
pub struct LandingIndexTemplate {
    pub landings: Vec<LandingLink>,
}

#[derive(Template)]
#[template(path = "public/not_found.html")]
pub struct NotFoundTemplate {
    pub path: String,
}

/// Shown when preview content cannot be fetched with the server credentials.
#[derive(Template)]
#[template(path = "public/preview_auth.html")]
pub struct PreviewAuthTemplate {
    pub message: String,
    pub login_url: Option<String>,
}

pub struct ChatBubble {
    pub key: i64,
    pub role_class: &'static str,
    pub content: String,
    pub links: Vec<ChatLink>,
    pub note: Option<String>,
}

impl From<&ChatMessage> for ChatBubble {
    fn from(msg: &ChatMessage) -> Self {
        let note = if msg.command_failed {
            Some("Command failed".to_string())
        } else if msg.command_executed {
            Some("Command executed".to_string())
        } else if msg.needs_confirmation || msg.needs_more_info {
            msg.command_prompt.clone()
        } else {
            None
        };

        Self {
            key: msg.timestamp,
            role_class: match msg.role {
                ChatRole::User => "chat-bubble--user",
                ChatRole::Assistant => "chat-bubble--assistant",
            },
            content: msg.content.clone(),
            links: msg.links.clone(),
            note,
        }
    }
}

/// One widget round trip: the user's turn, the reply, and any recovery action.
#[derive(Template)]
#[template(path = "chat/exchange.html")]
pub struct ChatExchangeTemplate {
    pub messages: Vec<ChatBubble>,
    pub offer_refresh: bool,
    pub login_url: Option<String>,
}
