mod common;

#[cfg(test)]
pub mod chat_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::common::*;

    use pressx_front::common::{ChatError, Remediation};
    use pressx_front::config::CHAT_PATH;
    use pressx_front::models::*;
    use pressx_front::services::ChatProxy;

    #[derive(Default)]
    struct Upstream {
        calls: AtomicUsize,
    }

    async fn chat_endpoint(
        upstream: web::Data<Upstream>,
        req: HttpRequest,
        body: web::Json<Value>,
    ) -> HttpResponse {
        upstream.calls.fetch_add(1, Ordering::SeqCst);

        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        match bearer {
            "Bearer good" => HttpResponse::Ok().json(json!({
                "response": format!("echo: {}", body["message"].as_str().unwrap_or_default()),
                "links": [{ "title": "Docs", "url": "https://docs.example.com" }],
                "command_detected": true,
                "command_executed": true
            })),
            "Bearer expired" => HttpResponse::Unauthorized().json(json!({
                "code": "jwt_auth_invalid_token",
                "message": "Expired token"
            })),
            "Bearer plain" => HttpResponse::Forbidden()
                .content_type("text/plain")
                .body("Expired token"),
            "Bearer maintenance" => HttpResponse::Ok()
                .content_type("text/html")
                .body("<html>maintenance</html>"),
            "Bearer broken" => HttpResponse::InternalServerError()
                .json(json!({ "message": "Model unavailable" })),
            _ => HttpResponse::Unauthorized().json(json!({ "message": "Invalid signature" })),
        }
    }

    fn start_upstream() -> (String, web::Data<Upstream>) {
        let upstream = web::Data::new(Upstream::default());
        let data = upstream.clone();
        let base = spawn_server(move |cfg| {
            cfg.app_data(data.clone())
                .route(CHAT_PATH, web::post().to(chat_endpoint));
        });
        (base, upstream)
    }

    fn proxy(base: &str, preview_mode: &str) -> ChatProxy {
        let config = config_from(&[("WORDPRESS_URL", base), ("PREVIEW_MODE", preview_mode)]);
        ChatProxy::new(reqwest::Client::new(), &config)
    }

    fn user(content: &str) -> ChatTurn {
        ChatTurn {
            role: "user".into(),
            content: content.into(),
        }
    }

    fn assistant(content: &str) -> ChatTurn {
        ChatTurn {
            role: "assistant".into(),
            content: content.into(),
        }
    }

    async fn error_body(err: &ChatError) -> Value {
        let bytes = actix_web::body::to_bytes(err.error_response().into_body())
            .await
            .expect("error body");
        serde_json::from_slice(&bytes).expect("json error body")
    }

    #[actix_web::test]
    async fn test_send_success() {
        let (base, upstream) = start_upstream();
        let chat = proxy(&base, "true");

        let turns = vec![user("first"), assistant("hello"), user("  second  ")];
        let reply = chat
            .send(&turns, Some(&AuthToken::new("good")))
            .await
            .expect("reply");

        assert_eq!(reply.response, "echo: second");
        assert_eq!(reply.content, reply.response);
        assert_eq!(reply.links.len(), 1);
        assert!(reply.command_detected);
        assert!(reply.command_executed);
        assert!(!reply.command_failed);
        assert!(!reply.needs_more_info);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_send_fails_on_preview_disabled() {
        let (base, upstream) = start_upstream();
        let chat = proxy(&base, "false");

        for turns in [vec![], vec![user("hi")], vec![assistant("only me")]] {
            let err = chat
                .send(&turns, Some(&AuthToken::new("good")))
                .await
                .unwrap_err();
            assert!(matches!(err, ChatError::NotEnabled));
            assert_eq!(err.status_code(), 403);
        }
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_send_fails_on_invalid_messages() {
        let (base, upstream) = start_upstream();
        let chat = proxy(&base, "true");

        for turns in [vec![], vec![assistant("only me")], vec![user("   ")]] {
            let err = chat
                .send(&turns, Some(&AuthToken::new("good")))
                .await
                .unwrap_err();
            assert!(matches!(err, ChatError::InvalidRequest(_)), "{err:?}");
            assert_eq!(err.status_code(), 400);
        }
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_send_fails_on_missing_config() {
        let config = config_from(&[("PREVIEW_MODE", "yes")]);
        let chat = ChatProxy::new(reqwest::Client::new(), &config);

        let err = chat
            .send(&[user("hi")], Some(&AuthToken::new("good")))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MissingConfig(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[actix_web::test]
    async fn test_send_fails_on_missing_token() {
        let (base, upstream) = start_upstream();
        let chat = proxy(&base, "true");

        let err = chat.send(&[user("hi")], None).await.unwrap_err();
        assert!(matches!(err, ChatError::NoAuthToken));
        assert_eq!(err.remediation(), Some(Remediation::RefreshToken));
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_send_fails_on_expired_token() {
        let (base, _upstream) = start_upstream();
        let chat = proxy(&base, "true");

        let err = chat
            .send(&[user("hi")], Some(&AuthToken::new("expired")))
            .await
            .unwrap_err();

        assert!(err.is_expired_token());
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.remediation(), Some(Remediation::RefreshToken));

        let body = error_body(&err).await;
        assert_eq!(body["error"], "auth_rejected");
        assert_eq!(body["expired_token"], true);
    }

    #[actix_web::test]
    async fn test_send_detects_expired_marker_in_plain_body() {
        let (base, _upstream) = start_upstream();
        let chat = proxy(&base, "true");

        let err = chat
            .send(&[user("hi")], Some(&AuthToken::new("plain")))
            .await
            .unwrap_err();
        assert!(err.is_expired_token());
    }

    #[actix_web::test]
    async fn test_send_fails_on_generic_auth_rejection() {
        let (base, _upstream) = start_upstream();
        let chat = proxy(&base, "true");

        let err = chat
            .send(&[user("hi")], Some(&AuthToken::new("revoked")))
            .await
            .unwrap_err();

        assert!(!err.is_expired_token());
        assert_eq!(err.remediation(), Some(Remediation::Login));

        let body = error_body(&err).await;
        assert_eq!(body["expired_token"], false);
        assert_eq!(body["message"], "Authentication rejected: Invalid signature");
    }

    #[actix_web::test]
    async fn test_send_fails_on_upstream_error() {
        let (base, _upstream) = start_upstream();
        let chat = proxy(&base, "true");

        let err = chat
            .send(&[user("hi")], Some(&AuthToken::new("broken")))
            .await
            .unwrap_err();

        match &err {
            ChatError::Upstream { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "Model unavailable");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert_eq!(error_body(&err).await["error"], "upstream_error");
    }

    #[actix_web::test]
    async fn test_send_fails_on_unreadable_success_body() {
        let (base, _upstream) = start_upstream();
        let chat = proxy(&base, "true");

        let err = chat
            .send(&[user("hi")], Some(&AuthToken::new("maintenance")))
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::MalformedReply(_)), "{err:?}");
        assert_eq!(err.status_code(), 502);
        assert_eq!(error_body(&err).await["error"], "upstream_error");
    }

    #[test]
    fn test_upstream_status_outside_error_range_is_bad_gateway() {
        for status in [200, 204, 302, 99] {
            let err = ChatError::Upstream {
                status,
                message: "x".into(),
            };
            assert_eq!(err.status_code(), 502, "status {status}");
        }
        let err = ChatError::Upstream {
            status: 503,
            message: "x".into(),
        };
        assert_eq!(err.status_code(), 503);
    }

    #[actix_web::test]
    async fn test_send_fails_on_transport_error() {
        let chat = proxy("http://127.0.0.1:9", "true");

        let err = chat
            .send(&[user("hi")], Some(&AuthToken::new("good")))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let errors = [
            ChatError::Transport("x".into()),
            ChatError::Upstream {
                status: 500,
                message: "x".into(),
            },
            ChatError::AuthRejected {
                expired: false,
                message: "x".into(),
            },
            ChatError::AuthRejected {
                expired: true,
                message: "x".into(),
            },
        ];

        let messages: std::collections::HashSet<String> =
            errors.iter().map(ChatError::user_message).collect();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn test_chat_message_from_reply_success() {
        let reply = ChatReply {
            content: "Done".into(),
            response: "Done".into(),
            command_detected: true,
            command_failed: true,
            ..Default::default()
        };

        let msg = ChatMessage::from_reply(&reply, 10);
        assert_eq!(msg.role, ChatRole::Assistant);
        assert_eq!(msg.content, "Done");
        assert!(msg.is_command);
        assert!(msg.command_failed);
        assert_eq!(msg.timestamp, 10);
    }

    #[test]
    fn test_chat_clock_is_unique_and_monotonic() {
        let clock = ChatClock::new();
        let stamps: Vec<i64> = (0..1_000).map(|_| clock.next()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_chat_request_decodes_messages() {
        let request: ChatRequest = serde_json::from_value(json!({
            "messages": [{ "role": "user", "content": "hi" }, { "role": "assistant" }]
        }))
        .expect("chat request");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(
            ChatProxy::latest_user_message(&request.messages).expect("user message"),
            "hi"
        );
    }
}
