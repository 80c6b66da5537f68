use std::time::Duration;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::{get, web, HttpRequest, HttpResponse};
use askama::Template;
use serde_json::json;
use uuid::Uuid;

use pressx_front::common::ClientError;
use pressx_front::models::AuthSession;
use pressx_front::services::auth::{
    PREVIEW_DATA_COOKIE, PREVIEW_JWT_COOKIE, PRERENDER_BYPASS_COOKIE,
    PRESSX_JWT_COOKIE,
};
use pressx_front::services::PageAssembler;

use crate::web::forms::PreviewQuery;
use crate::web::helpers::{
    cookie_token, render_assembled, render_layout, set_token_cookies,
};
use crate::web::security::{client_key, secrets_match};
use crate::web::state::AppState;
use crate::web::templates::PreviewAuthTemplate;

const PREVIEW_RATE_LIMIT: usize = 10;
const PREVIEW_RATE_WINDOW: Duration = Duration::from_secs(60);

/// Session cookie marking the browser as being in preview mode.
fn preview_marker(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build(name, Uuid::new_v4().to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .finish()
}

/// Entry point linked from the CMS editor: validates the shared secret, logs
/// in with the server credentials and redirects to the preview page.
#[get("/api/preview")]
pub async fn enter_preview(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PreviewQuery>,
) -> HttpResponse {
    if !state.rate_limiter.check_rate_limit(
        &client_key(&req, "preview"),
        PREVIEW_RATE_LIMIT,
        PREVIEW_RATE_WINDOW,
    ) {
        return HttpResponse::TooManyRequests()
            .json(json!({ "message": "Too many preview requests" }));
    }

    let Some(expected) = state.config.preview_secret.as_deref() else {
        log::error!(
            "Preview requested but WORDPRESS_PREVIEW_SECRET is not configured"
        );
        return HttpResponse::InternalServerError()
            .json(json!({ "message": "Preview is not configured" }));
    };

    if !secrets_match(expected, query.secret.as_deref().unwrap_or_default()) {
        log::warn!("Preview request with an invalid secret");
        return HttpResponse::Unauthorized()
            .json(json!({ "message": "Invalid token" }));
    }

    let id = query.id.as_deref().map(str::trim).filter(|id| !id.is_empty());
    let Some(id) = id else {
        return HttpResponse::BadRequest()
            .json(json!({ "message": "Missing id" }));
    };

    let session = match state.tokens.refresh(None).await {
        Ok(session) => session,
        Err(e) => {
            log::error!("Preview login failed: {e}");
            return HttpResponse::InternalServerError()
                .json(json!({ "message": "Unable to authenticate preview" }));
        }
    };

    let secure = state.config.cookie_secure;
    let encoded: String =
        url::form_urlencoded::byte_serialize(id.as_bytes()).collect();

    let mut res = HttpResponse::TemporaryRedirect()
        .insert_header((LOCATION, format!("/preview/{encoded}")))
        .cookie(preview_marker(PRERENDER_BYPASS_COOKIE, secure))
        .cookie(preview_marker(PREVIEW_DATA_COOKIE, secure))
        .finish();
    set_token_cookies(&mut res, &[PREVIEW_JWT_COOKIE], &session, secure);
    res
}

/// Renders unpublished content with the service-account token, refreshing and
/// retrying once when the token has expired.
#[get("/preview/{id}")]
pub async fn preview_page(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();

    let (token, mut refreshed): (_, Option<AuthSession>) =
        match cookie_token(&req, &[PREVIEW_JWT_COOKIE, PRESSX_JWT_COOKIE]) {
            Some(token) => (token, None),
            None => match state.tokens.refresh(None).await {
                Ok(session) => (session.token.clone(), Some(session)),
                Err(e) => return preview_unavailable(&req, &state, &e).await,
            },
        };

    let graphql = &state.graphql;
    let result = state
        .tokens
        .with_refresh(token, |token| {
            let client = graphql.authenticated(token);
            let id = id.clone();
            async move { PageAssembler::new(&client).preview(&id).await }
        })
        .await;

    match result {
        Ok(authorized) => {
            if authorized.refreshed.is_some() {
                refreshed = authorized.refreshed;
            }
            let mut res =
                render_assembled(&req, &state, authorized.value, true).await;
            if let Some(session) = refreshed {
                set_token_cookies(
                    &mut res,
                    &[PREVIEW_JWT_COOKIE, PRESSX_JWT_COOKIE],
                    &session,
                    state.config.cookie_secure,
                );
            }
            res
        }
        Err(e) => preview_unavailable(&req, &state, &e).await,
    }
}

async fn preview_unavailable(
    req: &HttpRequest,
    state: &AppState,
    err: &ClientError,
) -> HttpResponse {
    log::warn!("Preview unavailable: {err}");

    let (status, message) = match err {
        ClientError::MissingConfig(key) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Preview credentials are not configured ({key})."),
        ),
        e if e.needs_login() => (
            StatusCode::UNAUTHORIZED,
            "Your preview session could not be renewed. Log in to WordPress and try again."
                .to_string(),
        ),
        _ => (
            StatusCode::BAD_GATEWAY,
            "The content source could not be reached. Try again shortly.".to_string(),
        ),
    };

    let body = PreviewAuthTemplate {
        message,
        login_url: state.config.login_url(),
    }
    .render()
    .unwrap_or_else(|e| {
        log::error!("Template error: {e}");
        String::new()
    });

    let title = "Preview unavailable".to_string();
    render_layout(req, state, status, title, body, true).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(enter_preview).service(preview_page);
}
