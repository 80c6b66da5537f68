use actix_web::http::StatusCode;
use actix_web::{get, web, HttpRequest, Responder};
use askama::Template;

use pressx_front::models::ContentKind;
use pressx_front::services::PageAssembler;

use crate::web::helpers::{render_assembled, render_layout};
use crate::web::state::AppState;
use crate::web::templates::{LandingIndexTemplate, LandingLink};

#[get("/")]
pub async fn home(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> impl Responder {
    let assembled = PageAssembler::new(&state.graphql).home().await;
    render_assembled(&req, &state, assembled, false).await
}

#[get("/landings")]
pub async fn landing_index(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> impl Responder {
    let landings = PageAssembler::new(&state.graphql).landings().await;

    let body = LandingIndexTemplate {
        landings: landings.iter().map(LandingLink::from).collect(),
    }
    .render()
    .unwrap_or_else(|e| {
        log::error!("Template error: {e}");
        String::new()
    });

    let title = "Landing pages".to_string();
    render_layout(&req, &state, StatusCode::OK, title, body, false).await
}

#[get("/post/{slug}")]
pub async fn post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let assembled = PageAssembler::new(&state.graphql)
        .single(ContentKind::Post, &path.into_inner())
        .await;
    render_assembled(&req, &state, assembled, false).await
}

#[get("/page/{slug}")]
pub async fn page(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let assembled = PageAssembler::new(&state.graphql)
        .single(ContentKind::Page, &path.into_inner())
        .await;
    render_assembled(&req, &state, assembled, false).await
}

#[get("/landing/{slug}")]
pub async fn landing(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let assembled = PageAssembler::new(&state.graphql)
        .single(ContentKind::Landing, &path.into_inner())
        .await;
    render_assembled(&req, &state, assembled, false).await
}

/// Catch-all: page first, then landing.
#[get("/{slug}")]
pub async fn by_slug(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let assembled = PageAssembler::new(&state.graphql)
        .by_segment(&path.into_inner())
        .await;
    render_assembled(&req, &state, assembled, false).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(landing_index)
        .service(post)
        .service(page)
        .service(landing);
}
