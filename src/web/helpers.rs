use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use askama::Template;

use pressx_front::frontend::components::ImageView;
use pressx_front::frontend::render_sections;
use pressx_front::models::{AuthSession, AuthToken, ContentNode};
use pressx_front::services::auth::token_cookie;
use pressx_front::services::{Assembled, PageAssembler};

use crate::web::state::AppState;
use crate::web::templates::{
    ContentTemplate, LandingTemplate, LayoutTemplate, NotFoundTemplate,
};

const FEATURED_IMAGE_WIDTH: u32 = 1280;

pub fn is_htmx(req: &HttpRequest) -> bool {
    req.headers()
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|s| s.eq_ignore_ascii_case("true"))
}

/// First non-blank token found under `names`, in order.
pub fn cookie_token(req: &HttpRequest, names: &[&str]) -> Option<AuthToken> {
    names
        .iter()
        .filter_map(|name| req.cookie(name))
        .find_map(|c| AuthToken::from_cookie_value(c.value()))
}

/// Re-issues the token cookies after a refresh replaced the caller's token.
pub fn set_token_cookies(
    res: &mut HttpResponse,
    names: &[&'static str],
    session: &AuthSession,
    secure: bool,
) {
    for &name in names {
        let cookie = token_cookie(name, &session.token, secure);
        if let Err(e) = res.add_cookie(&cookie) {
            log::error!("Failed to set {name} cookie: {e}");
        }
    }
}

pub fn render<T: Template>(t: T) -> HttpResponse {
    render_with_status(StatusCode::OK, t)
}

pub fn render_with_status<T: Template>(
    status: StatusCode,
    t: T,
) -> HttpResponse {
    match t.render() {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Template error: {e}");
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(format!("Template error: {e}"))
        }
    }
}

fn content_body(
    kind: &'static str,
    node: &ContentNode,
    dated: bool,
) -> ContentTemplate {
    ContentTemplate {
        kind,
        title: node.title_or_default().to_string(),
        date: if dated { node.display_date() } else { None },
        image: ImageView::from_option(
            node.featured_media(),
            FEATURED_IMAGE_WIDTH,
        ),
        content: node.content.clone(),
    }
}

/// Title and inner HTML for an assembled page; `None` for not found.
pub fn page_body(
    assembled: &Assembled,
) -> Option<Result<(String, String), askama::Error>> {
    let (title, body) = match assembled {
        Assembled::Post(post) => (
            post.title_or_default().to_string(),
            content_body("post", post, true).render(),
        ),
        Assembled::Page(page) => (
            page.title_or_default().to_string(),
            content_body("page", page, false).render(),
        ),
        Assembled::Landing { landing, context } => (
            landing.title_or_default().to_string(),
            LandingTemplate {
                title: landing.title_or_default().to_string(),
                sections: render_sections(&landing.sections, context),
            }
            .render(),
        ),
        Assembled::NotFound => return None,
    };

    Some(body.map(|body| (title, body)))
}

/// Wraps `body` in the site layout. htmx requests get the bare fragment.
pub async fn render_layout(
    req: &HttpRequest,
    state: &AppState,
    status: StatusCode,
    title: String,
    body: String,
    preview: bool,
) -> HttpResponse {
    if is_htmx(req) {
        return HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body);
    }

    let nav = PageAssembler::new(&state.graphql).navigation().await;

    render_with_status(
        status,
        LayoutTemplate {
            title,
            nav,
            body,
            chat_enabled: state.chat.is_enabled(),
            preview,
        },
    )
}

pub async fn render_not_found(
    req: &HttpRequest,
    state: &AppState,
) -> HttpResponse {
    let body = NotFoundTemplate {
        path: req.path().to_string(),
    }
    .render()
    .unwrap_or_else(|e| {
        log::error!("Template error: {e}");
        "Not found".to_string()
    });

    render_layout(
        req,
        state,
        StatusCode::NOT_FOUND,
        "Not found".to_string(),
        body,
        false,
    )
    .await
}

pub async fn render_assembled(
    req: &HttpRequest,
    state: &AppState,
    assembled: Assembled,
    preview: bool,
) -> HttpResponse {
    match page_body(&assembled) {
        None => render_not_found(req, state).await,
        Some(Ok((title, body))) => {
            render_layout(req, state, StatusCode::OK, title, body, preview)
                .await
        }
        Some(Err(e)) => {
            log::error!("Template error: {e}");
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(format!("Template error: {e}"))
        }
    }
}
