use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Marker the CMS JWT plugin puts in its message when a token has lapsed.
pub const EXPIRED_TOKEN_MARKER: &str = "expired token";

pub fn is_expired_token_message(message: &str) -> bool {
    message.to_lowercase().contains(EXPIRED_TOKEN_MARKER)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} is not configured")]
    Missing(&'static str),
}

/// Failures talking to the content source over GraphQL.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Content source returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Authentication rejected: {0}")]
    Unauthorized(String),

    #[error("Expired token: {0}")]
    ExpiredToken(String),

    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("{0} is not configured")]
    MissingConfig(&'static str),
}

impl ClientError {
    pub fn is_expired_token(&self) -> bool {
        matches!(self, Self::ExpiredToken(_))
    }

    /// Errors a fresh login cannot fix; the user goes to the CMS login.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            Self::ExpiredToken(_)
                | Self::Unauthorized(_)
                | Self::RefreshFailed(_)
        )
    }
}

/// Remediation a UI can offer next to an auth failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remediation {
    RefreshToken,
    Login,
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Chat is only available when preview mode is enabled")]
    NotEnabled,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0} is not configured")]
    MissingConfig(&'static str),

    #[error("No authentication token available")]
    NoAuthToken,

    #[error("Authentication rejected: {message}")]
    AuthRejected { expired: bool, message: String },

    #[error("Upstream returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed chat response: {0}")]
    MalformedReply(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ChatError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotEnabled => "preview_not_enabled",
            Self::InvalidRequest(_) => "invalid_request",
            Self::MissingConfig(_) => "missing_config",
            Self::NoAuthToken => "no_auth_token",
            Self::AuthRejected { .. } => "auth_rejected",
            Self::Upstream { .. } | Self::MalformedReply(_) => {
                "upstream_error"
            }
            Self::Transport(_) => "transport_error",
        }
    }

    pub fn is_expired_token(&self) -> bool {
        matches!(self, Self::AuthRejected { expired: true, .. })
    }

    /// Text shown to the user inside the chat transcript.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotEnabled => self.to_string(),
            Self::InvalidRequest(reason) => format!("I couldn't send that: {reason}."),
            Self::MissingConfig(_) => {
                "The chat service is not configured on this site.".to_string()
            }
            Self::NoAuthToken => {
                "You are not signed in. Refresh your token to start chatting.".to_string()
            }
            Self::AuthRejected { expired: true, .. } => {
                "Your session has expired. Refresh your token to continue.".to_string()
            }
            Self::AuthRejected { expired: false, .. } => {
                "The content server rejected your session. Please log in to WordPress.".to_string()
            }
            Self::Upstream { status, .. } => format!(
                "The content server returned an error (status {status}). Please try again later."
            ),
            Self::MalformedReply(_) => {
                "The chat service sent a reply I couldn't read. Please try again later."
                    .to_string()
            }
            Self::Transport(_) => {
                "Could not reach the content server. Check your connection and try again."
                    .to_string()
            }
        }
    }

    pub fn remediation(&self) -> Option<Remediation> {
        match self {
            Self::NoAuthToken | Self::AuthRejected { expired: true, .. } => {
                Some(Remediation::RefreshToken)
            }
            Self::AuthRejected { expired: false, .. } => {
                Some(Remediation::Login)
            }
            _ => None,
        }
    }
}

impl ResponseError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotEnabled => StatusCode::FORBIDDEN,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoAuthToken | Self::AuthRejected { .. } => {
                StatusCode::UNAUTHORIZED
            }
            // Only 4xx/5xx pass through; anything else is a bad gateway.
            Self::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::MalformedReply(_) | Self::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "message": self.to_string(),
            "expired_token": self.is_expired_token(),
        }))
    }
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Invalid image url: {0}")]
    InvalidUrl(String),

    #[error("Image host {0} is not allowed")]
    HostNotAllowed(String),

    #[error("Failed to fetch image: {0}")]
    Fetch(String),

    #[error("Image source returned status {0}")]
    UpstreamStatus(u16),

    #[error("Image source exceeds {0} bytes")]
    TooLarge(usize),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl ResponseError for ImageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl(_) | Self::HostNotAllowed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Fetch(_) | Self::UpstreamStatus(_) | Self::TooLarge(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(json!({ "error": self.to_string() }))
    }
}
