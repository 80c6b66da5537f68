use std::time::Duration;

use crate::common::ConfigError;
use crate::models::Credentials;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const CHAT_PATH: &str = "/wp-json/pressx/v1/chat";

/// Process-wide configuration, built once at startup and shared through
/// `AppState`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cms_url: Option<String>,
    pub graphql_endpoint: Option<String>,
    pub preview_mode: bool,
    pub preview_secret: Option<String>,
    pub preview_credentials: Option<Credentials>,
    pub image_allowed_hosts: Vec<String>,
    pub http_timeout: Duration,
    pub bind_addr: String,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let cms_url = get("WORDPRESS_URL")
            .map(|u| u.trim_end_matches('/').to_string());

        let graphql_endpoint = get("WORDPRESS_GRAPHQL_ENDPOINT")
            .or_else(|| cms_url.as_ref().map(|base| format!("{base}/graphql")));

        let preview_mode = match get("PREVIEW_MODE") {
            Some(v) => parse_flag("PREVIEW_MODE", &v)?,
            None => false,
        };

        let cookie_secure = match get("COOKIE_SECURE") {
            Some(v) => parse_flag("COOKIE_SECURE", &v)?,
            None => true,
        };

        let preview_credentials = match (
            get("WORDPRESS_PREVIEW_USERNAME"),
            get("WORDPRESS_PREVIEW_PASSWORD"),
        ) {
            (Some(username), Some(password)) => {
                Some(Credentials { username, password })
            }
            _ => None,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    key: "HTTP_TIMEOUT_SECS",
                    value: v,
                })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let mut image_allowed_hosts: Vec<String> = get("IMAGE_ALLOWED_HOSTS")
            .map(|v| {
                v.split(',')
                    .map(|h| h.trim().to_lowercase())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if let Some(host) = cms_url.as_deref().and_then(host_of) {
            if !image_allowed_hosts.contains(&host) {
                image_allowed_hosts.push(host);
            }
        }

        Ok(Self {
            cms_url,
            graphql_endpoint,
            preview_mode,
            preview_secret: get("WORDPRESS_PREVIEW_SECRET"),
            preview_credentials,
            image_allowed_hosts,
            http_timeout,
            bind_addr: get("BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            cookie_secure,
        })
    }

    pub fn chat_endpoint(&self) -> Option<String> {
        self.cms_url.as_ref().map(|base| format!("{base}{CHAT_PATH}"))
    }

    /// Manual-login target offered when an automatic refresh is not possible.
    pub fn login_url(&self) -> Option<String> {
        self.cms_url.as_ref().map(|base| format!("{base}/wp-login.php"))
    }

    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder().timeout(self.http_timeout).build()
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

fn host_of(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
}
