use std::sync::Arc;

use pressx_front::config::AppConfig;
use pressx_front::models::ChatClock;
use pressx_front::services::{
    ChatProxy, GraphqlClient, ImageProxy, TokenManager,
};

use crate::web::security::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Unauthenticated client for public routes.
    pub graphql: GraphqlClient,
    pub tokens: Arc<TokenManager>,
    pub chat: ChatProxy,
    pub images: ImageProxy,
    pub chat_clock: Arc<ChatClock>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: AppConfig) -> reqwest::Result<Self> {
        let http = config.http_client()?;
        let graphql = GraphqlClient::public(
            http.clone(),
            config.graphql_endpoint.clone(),
        );

        Ok(Self {
            tokens: Arc::new(TokenManager::new(
                graphql.clone(),
                config.preview_credentials.clone(),
            )),
            chat: ChatProxy::new(http, &config),
            images: ImageProxy::new(
                config.http_timeout,
                config.image_allowed_hosts.clone(),
            )?,
            graphql,
            chat_clock: Arc::new(ChatClock::new()),
            rate_limiter: Arc::new(RateLimiter::new()),
            config: Arc::new(config),
        })
    }
}
