use actix_web::{post, web, HttpRequest, HttpResponse};

use pressx_front::common::Remediation;
use pressx_front::models::{ChatMessage, ChatTurn};
use pressx_front::services::auth::PRESSX_JWT_COOKIE;

use crate::web::forms::ChatForm;
use crate::web::helpers::{cookie_token, render, set_token_cookies};
use crate::web::state::AppState;
use crate::web::templates::{ChatBubble, ChatExchangeTemplate};

/// htmx chat widget: appends the user's turn and the reply to the log.
#[post("/chat")]
pub async fn send_message(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<ChatForm>,
) -> HttpResponse {
    let content = form.message.trim().to_string();
    let user = ChatMessage::user(content.clone(), state.chat_clock.next());
    let turns = [ChatTurn {
        role: "user".into(),
        content,
    }];

    let token = cookie_token(&req, &[PRESSX_JWT_COOKIE]);
    let mut result = state.chat.send(&turns, token.as_ref()).await;

    let mut refreshed = None;
    let mut refresh_failed = false;
    let needs_refresh = matches!(
        &result,
        Err(e) if e.remediation() == Some(Remediation::RefreshToken)
    );
    if needs_refresh {
        match state.tokens.refresh(token.as_ref()).await {
            Ok(session) => {
                result = state.chat.send(&turns, Some(&session.token)).await;
                refreshed = Some(session);
            }
            Err(e) => {
                log::warn!("Chat token refresh failed: {e}");
                refresh_failed = true;
            }
        }
    }

    let (reply, remediation) = match &result {
        Ok(reply) => {
            (ChatMessage::from_reply(reply, state.chat_clock.next()), None)
        }
        Err(e) => {
            log::warn!("Chat request failed: {e}");
            let remediation = if refresh_failed {
                Some(Remediation::Login)
            } else {
                e.remediation()
            };
            (ChatMessage::from_error(e, state.chat_clock.next()), remediation)
        }
    };

    let mut res = render(ChatExchangeTemplate {
        messages: vec![ChatBubble::from(&user), ChatBubble::from(&reply)],
        offer_refresh: remediation == Some(Remediation::RefreshToken),
        login_url: (remediation == Some(Remediation::Login))
            .then(|| state.config.login_url())
            .flatten(),
    });

    if let Some(session) = refreshed {
        set_token_cookies(
            &mut res,
            &[PRESSX_JWT_COOKIE],
            &session,
            state.config.cookie_secure,
        );
    }
    res
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(send_message);
}
