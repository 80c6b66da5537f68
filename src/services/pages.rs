use std::sync::OnceLock;

use regex::Regex;

use crate::common::ClientError;
use crate::frontend::SectionContext;
use crate::log_err;
use crate::models::{
    ContentKind, ContentNode, IdType, Landing, MenuItem, RouteLookup,
};
use crate::services::graphql::ContentSource;

pub const HOME_LANDING_SLUG: &str = "home";
pub const PRIMARY_MENU_LOCATION: &str = "PRIMARY";
pub const FALLBACK_MENU_NAME: &str = "Main";
pub const RECENT_POSTS_COUNT: u32 = 3;

/// An all-digit segment is a database id; anything else is the kind's slug/URI.
pub fn classify_segment(segment: &str, kind: ContentKind) -> RouteLookup {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    let numeric = NUMERIC
        .get_or_init(|| Regex::new(r"^\d+$").expect("static regex"));

    let segment = segment.trim().trim_matches('/');
    if numeric.is_match(segment) {
        RouteLookup {
            id: segment.to_string(),
            id_type: IdType::DatabaseId,
        }
    } else {
        let id = match kind.text_id_type() {
            IdType::Uri => format!("/{segment}/"),
            _ => segment.to_string(),
        };
        RouteLookup {
            id,
            id_type: kind.text_id_type(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Assembled {
    Post(ContentNode),
    Page(ContentNode),
    Landing {
        landing: Landing,
        context: SectionContext,
    },
    NotFound,
}

impl Assembled {
    pub fn kind(&self) -> Option<ContentKind> {
        match self {
            Self::Post(_) => Some(ContentKind::Post),
            Self::Page(_) => Some(ContentKind::Page),
            Self::Landing { .. } => Some(ContentKind::Landing),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Route-level orchestration over a content source.
pub struct PageAssembler<'a> {
    source: &'a dyn ContentSource,
}

impl<'a> PageAssembler<'a> {
    pub fn new(source: &'a dyn ContentSource) -> Self {
        Self { source }
    }

    pub async fn fetch_kind(
        &self,
        kind: ContentKind,
        segment: &str,
    ) -> Result<Option<Assembled>, ClientError> {
        let lookup = classify_segment(segment, kind);

        Ok(match kind {
            ContentKind::Post => {
                self.source.post(&lookup).await?.map(Assembled::Post)
            }
            ContentKind::Page => {
                self.source.page(&lookup).await?.map(Assembled::Page)
            }
            ContentKind::Landing => match self.source.landing(&lookup).await? {
                Some(landing) => Some(self.landing(landing).await),
                None => None,
            },
        })
    }

    /// Tries each kind in order, first hit wins. A failing lookup is logged and
    /// skipped, except an expired token, which the caller must handle.
    pub async fn first_match(
        &self,
        order: &[ContentKind],
        segment: &str,
    ) -> Result<Assembled, ClientError> {
        for kind in order {
            match self.fetch_kind(*kind, segment).await {
                Ok(Some(found)) => return Ok(found),
                Ok(None) => continue,
                Err(e) if e.is_expired_token() => return Err(e),
                Err(e) => {
                    log_err!(format!("{kind} lookup"), &e, &segment);
                }
            }
        }

        Ok(Assembled::NotFound)
    }

    /// Public `/{slug}` route: page, then landing.
    pub async fn by_segment(&self, segment: &str) -> Assembled {
        self.first_match(&ContentKind::PUBLIC_FALLBACK, segment)
            .await
            .unwrap_or_else(|e| {
                log_err!("public route", &e, &segment);
                Assembled::NotFound
            })
    }

    /// Preview route: post, then page, then landing, with an authenticated
    /// source.
    pub async fn preview(&self, id: &str) -> Result<Assembled, ClientError> {
        self.first_match(&ContentKind::PREVIEW_FALLBACK, id).await
    }

    pub async fn single(&self, kind: ContentKind, segment: &str) -> Assembled {
        match self.fetch_kind(kind, segment).await {
            Ok(Some(found)) => found,
            Ok(None) => Assembled::NotFound,
            Err(e) => {
                log_err!(format!("{kind} route"), &e, &segment);
                Assembled::NotFound
            }
        }
    }

    /// Home: the `home` landing, else the configured front page.
    pub async fn home(&self) -> Assembled {
        match self.fetch_kind(ContentKind::Landing, HOME_LANDING_SLUG).await {
            Ok(Some(found)) => return found,
            Ok(None) => {}
            Err(e) => log_err!("home landing", &e, &HOME_LANDING_SLUG),
        }

        match self.source.front_page_id().await {
            Ok(Some(id)) => {
                self.single(ContentKind::Page, &id.to_string()).await
            }
            Ok(None) => Assembled::NotFound,
            Err(e) => {
                log_err!("homepage settings", &e, &());
                Assembled::NotFound
            }
        }
    }

    pub async fn landings(&self) -> Vec<Landing> {
        self.source.landings().await.unwrap_or_else(|e| {
            log_err!("landing index", &e, &());
            Vec::new()
        })
    }

    /// Primary navigation as a tree; an empty menu on failure.
    pub async fn navigation(&self) -> Vec<MenuItem> {
        let items = match self.source.menu_items(PRIMARY_MENU_LOCATION).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => self
                .source
                .menu(FALLBACK_MENU_NAME)
                .await
                .unwrap_or_else(|e| {
                    log_err!("fallback menu", &e, &FALLBACK_MENU_NAME);
                    Vec::new()
                }),
            Err(e) => {
                log_err!("primary menu", &e, &PRIMARY_MENU_LOCATION);
                Vec::new()
            }
        };

        MenuItem::build_tree(items)
    }

    async fn landing(&self, landing: Landing) -> Assembled {
        let recent_posts = if landing.has_recent_posts() {
            self.source
                .recent_posts(RECENT_POSTS_COUNT)
                .await
                .unwrap_or_else(|e| {
                    log_err!("recent posts", &e, &RECENT_POSTS_COUNT);
                    Vec::new()
                })
        } else {
            Vec::new()
        };

        Assembled::Landing {
            landing,
            context: SectionContext::new(recent_posts),
        }
    }
}
