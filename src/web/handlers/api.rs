use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde_json::json;

use pressx_front::common::{ChatError, ClientError, ImageError};
use pressx_front::models::{ChatReply, ChatRequest};
use pressx_front::services::auth::PRESSX_JWT_COOKIE;
use pressx_front::services::image::{transform, CACHE_CONTROL_IMMUTABLE};
use pressx_front::services::ImageRequest;

use crate::web::helpers::{cookie_token, set_token_cookies};
use crate::web::state::AppState;

/// Logs in with the server credentials and hands the browser a fresh
/// `pressxJWT`.
#[get("/api/refresh-token")]
pub async fn refresh_token(state: web::Data<AppState>) -> HttpResponse {
    match state.tokens.refresh(None).await {
        Ok(session) => {
            let mut res = HttpResponse::Ok().json(json!({
                "success": true,
                "user": session.user,
            }));
            set_token_cookies(
                &mut res,
                &[PRESSX_JWT_COOKIE],
                &session,
                state.config.cookie_secure,
            );
            res
        }
        Err(e) => {
            log::error!("Token refresh failed: {e}");
            let (mut res, error) = match e {
                ClientError::MissingConfig(_) => {
                    (HttpResponse::InternalServerError(), "missing_config")
                }
                ClientError::Unauthorized(_) | ClientError::ExpiredToken(_) => {
                    (HttpResponse::Unauthorized(), "login_failed")
                }
                _ => (HttpResponse::BadGateway(), "upstream_error"),
            };
            res.json(json!({
                "success": false,
                "error": error,
                "message": e.to_string(),
            }))
        }
    }
}

/// The body is decoded only after the preview flag check, so a disabled
/// deployment answers `preview_not_enabled` whatever was posted.
#[post("/api/chat")]
pub async fn chat(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<web::Json<ChatReply>, ChatError> {
    if !state.chat.is_enabled() {
        return Err(ChatError::NotEnabled);
    }

    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|e| ChatError::InvalidRequest(e.to_string()))?;

    let token = cookie_token(&req, &[PRESSX_JWT_COOKIE]);
    let reply = state.chat.send(&request.messages, token.as_ref()).await?;
    Ok(web::Json(reply))
}

#[get("/api/image")]
pub async fn image(
    state: web::Data<AppState>,
    query: web::Query<ImageRequest>,
) -> Result<HttpResponse, ImageError> {
    let params = query.validate(state.images.allowed_hosts())?;
    let source = state.images.fetch(&params).await?;

    let encoded = web::block(move || transform(&source, &params))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))??;

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, encoded.content_type))
        .insert_header((CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE))
        .body(encoded.bytes))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(refresh_token).service(chat).service(image);
}
