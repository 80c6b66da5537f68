use reqwest::header::{AUTHORIZATION, CACHE_CONTROL};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::common::{is_expired_token_message, ChatError};
use crate::config::AppConfig;
use crate::models::{AuthToken, ChatLink, ChatReply, ChatTurn};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpstreamReply {
    response: Option<String>,
    links: Option<Vec<ChatLink>>,
    command_detected: Option<bool>,
    command_executed: Option<bool>,
    command_failed: Option<bool>,
    needs_more_info: Option<bool>,
    needs_confirmation: Option<bool>,
    command_type: Option<String>,
    command_prompt: Option<String>,
}

impl From<UpstreamReply> for ChatReply {
    fn from(up: UpstreamReply) -> Self {
        let response = up.response.unwrap_or_default();
        Self {
            content: response.clone(),
            response,
            links: up.links.unwrap_or_default(),
            command_detected: up.command_detected.unwrap_or(false),
            command_executed: up.command_executed.unwrap_or(false),
            command_failed: up.command_failed.unwrap_or(false),
            needs_more_info: up.needs_more_info.unwrap_or(false),
            needs_confirmation: up.needs_confirmation.unwrap_or(false),
            command_type: up.command_type,
            command_prompt: up.command_prompt,
        }
    }
}

/// Stateless forwarder to the CMS chat endpoint.
#[derive(Clone)]
pub struct ChatProxy {
    http: reqwest::Client,
    endpoint: Option<String>,
    enabled: bool,
}

impl ChatProxy {
    pub fn new(http: reqwest::Client, config: &AppConfig) -> Self {
        Self {
            http,
            endpoint: config.chat_endpoint(),
            enabled: config.preview_mode,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The upstream endpoint is single-turn: only the latest user message
    /// is sent.
    pub fn latest_user_message(turns: &[ChatTurn]) -> Result<&str, ChatError> {
        turns
            .iter()
            .rev()
            .find(|t| t.is_user())
            .map(|t| t.content.trim())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                ChatError::InvalidRequest("no user message provided".into())
            })
    }

    pub async fn send(
        &self,
        turns: &[ChatTurn],
        token: Option<&AuthToken>,
    ) -> Result<ChatReply, ChatError> {
        if !self.enabled {
            return Err(ChatError::NotEnabled);
        }

        let message = Self::latest_user_message(turns)?;

        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ChatError::MissingConfig("WORDPRESS_URL"))?;

        let token = token.ok_or(ChatError::NoAuthToken)?;

        let response = self
            .http
            .post(endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", token.as_str()))
            .header(CACHE_CONTROL, "no-cache")
            .json(&json!({ "message": message }))
            .send()
            .await
            .map_err(|e| {
                log::error!("Chat upstream unreachable: {e}");
                ChatError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        if is_auth_rejection(status) {
            let message = upstream_message(&body, status);
            return Err(ChatError::AuthRejected {
                expired: is_expired_token_message(&message),
                message,
            });
        }

        if !status.is_success() {
            log::warn!("Chat upstream returned {status}");
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body, status),
            });
        }

        let reply: UpstreamReply = serde_json::from_str(&body).map_err(|e| {
            log::warn!("Chat upstream sent an unreadable reply: {e}");
            ChatError::MalformedReply(e.to_string())
        })?;

        Ok(reply.into())
    }
}

/// The JWT plugin answers 403 for tokens it cannot validate, 401 otherwise.
fn is_auth_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn upstream_message(body: &str, status: StatusCode) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            let text: String = body.trim().chars().take(200).collect();
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                text
            }
        })
}
