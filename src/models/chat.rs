use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::common::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatLink {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// One turn of a conversation. `timestamp` doubles as the render key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ChatLink>,
    #[serde(default)]
    pub is_command: bool,
    #[serde(default)]
    pub command_executed: bool,
    #[serde(default)]
    pub command_failed: bool,
    #[serde(default)]
    pub needs_confirmation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_prompt: Option<String>,
    #[serde(default)]
    pub needs_more_info: bool,
}

impl ChatMessage {
    pub fn new(
        role: ChatRole,
        content: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
            links: Vec::new(),
            is_command: false,
            command_executed: false,
            command_failed: false,
            needs_confirmation: false,
            command_type: None,
            command_prompt: None,
            needs_more_info: false,
        }
    }

    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self::new(ChatRole::User, content, timestamp)
    }

    pub fn from_reply(reply: &ChatReply, timestamp: i64) -> Self {
        Self {
            links: reply.links.clone(),
            is_command: reply.command_detected,
            command_executed: reply.command_executed,
            command_failed: reply.command_failed,
            needs_confirmation: reply.needs_confirmation,
            command_type: reply.command_type.clone(),
            command_prompt: reply.command_prompt.clone(),
            needs_more_info: reply.needs_more_info,
            ..Self::new(ChatRole::Assistant, reply.content.clone(), timestamp)
        }
    }

    /// Inline assistant turn describing a failed request.
    pub fn from_error(err: &ChatError, timestamp: i64) -> Self {
        Self::new(ChatRole::Assistant, err.user_message(), timestamp)
    }
}

/// Minimal turn shape accepted by `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatTurn {
    pub fn is_user(&self) -> bool {
        self.role.eq_ignore_ascii_case("user")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
}

/// Normalized chat result; `response` is mirrored into `content` for callers
/// that read either key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    pub response: String,
    pub links: Vec<ChatLink>,
    pub command_detected: bool,
    pub command_executed: bool,
    pub command_failed: bool,
    pub needs_more_info: bool,
    #[serde(default)]
    pub needs_confirmation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_prompt: Option<String>,
}

/// Hands out millisecond timestamps that never repeat within the process.
#[derive(Debug, Default)]
pub struct ChatClock {
    last: AtomicI64,
}

impl ChatClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}
