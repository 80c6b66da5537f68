use std::future::Future;
use std::sync::Mutex;

use actix_web::cookie::{Cookie, SameSite};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::common::ClientError;
use crate::models::{AuthSession, AuthToken, CmsUser, Credentials, TokenState};
use crate::services::graphql::GraphqlClient;
use crate::services::queries::LOGIN_MUTATION;

pub const PRESSX_JWT_COOKIE: &str = "pressxJWT";
pub const PREVIEW_JWT_COOKIE: &str = "wp_jwt_token";
pub const PRERENDER_BYPASS_COOKIE: &str = "__prerender_bypass";
pub const PREVIEW_DATA_COOKIE: &str = "__next_preview_data";

pub const TOKEN_MAX_AGE_DAYS: i64 = 30;

/// HTTP-only cookie carrying a bearer token. Issuing a new one under the same
/// name replaces the previous token in the browser.
pub fn token_cookie(
    name: &'static str,
    token: &AuthToken,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build(name, token.as_str().to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(actix_web::cookie::time::Duration::days(TOKEN_MAX_AGE_DAYS))
        .finish()
}

/// Result of an operation run through `TokenManager::with_refresh`.
/// `refreshed` is set when a new session replaced the caller's token.
#[derive(Debug)]
pub struct Authorized<T> {
    pub value: T,
    pub refreshed: Option<AuthSession>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
    auth_token: Option<String>,
    user: Option<CmsUser>,
}

#[derive(Deserialize)]
struct LoginData {
    login: Option<LoginPayload>,
}

/// Owns the service-account token used for preview and chat.
///
/// Expiry is detected reactively (an `ExpiredToken` error from the content
/// source) or from the token's own `exp` claim. Refreshes are single-flight:
/// callers that arrive while a login is in progress wait for it and share
/// its result instead of issuing their own.
pub struct TokenManager {
    graphql: GraphqlClient,
    credentials: Option<Credentials>,
    state: Mutex<TokenState>,
    flight: tokio::sync::Mutex<()>,
}

impl TokenManager {
    pub fn new(
        graphql: GraphqlClient,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            graphql,
            credentials,
            state: Mutex::new(TokenState::Unauthenticated),
            flight: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> TokenState {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, TokenState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, next: TokenState) {
        let mut state = self.lock_state();
        log::debug!("Token state {} -> {}", state.label(), next.label());
        *state = next;
    }

    fn held_token(&self) -> Option<AuthToken> {
        match &*self.lock_state() {
            TokenState::Authenticated(session) => Some(session.token.clone()),
            _ => None,
        }
    }

    /// Logs in again and returns the new session.
    ///
    /// `stale` names the token the caller found unusable; `None` means the
    /// token held right now. The login is skipped only when another caller
    /// already replaced that token while this one waited for the flight lock.
    pub async fn refresh(
        &self,
        stale: Option<&AuthToken>,
    ) -> Result<AuthSession, ClientError> {
        let seen = match stale {
            Some(token) => Some(token.clone()),
            None => self.held_token(),
        };

        let _flight = self.flight.lock().await;

        if let TokenState::Authenticated(session) = &*self.lock_state() {
            let replaced = seen.as_ref() != Some(&session.token);
            if replaced && !session.token.is_expired_at(Utc::now()) {
                return Ok(session.clone());
            }
        }

        self.set_state(TokenState::Refreshing);

        match self.exchange().await {
            Ok(session) => {
                log::info!("Obtained a new CMS token");
                self.set_state(TokenState::Authenticated(session.clone()));
                Ok(session)
            }
            Err(e) => {
                log::warn!("CMS login failed: {e}");
                self.set_state(TokenState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Runs `op` with `token`; on an expired token refreshes and retries
    /// once.
    pub async fn with_refresh<T, F, Fut>(
        &self,
        token: AuthToken,
        op: F,
    ) -> Result<Authorized<T>, ClientError>
    where
        F: Fn(AuthToken) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let (token, refreshed) = if token.is_expired_at(Utc::now()) {
            let session = self.refresh_expired(&token).await?;
            (session.token.clone(), Some(session))
        } else {
            (token, None)
        };

        match op(token.clone()).await {
            Err(e) if e.is_expired_token() && refreshed.is_none() => {
                let session = self.refresh_expired(&token).await?;
                let value = op(session.token.clone()).await?;
                Ok(Authorized {
                    value,
                    refreshed: Some(session),
                })
            }
            other => other.map(|value| Authorized { value, refreshed }),
        }
    }

    async fn refresh_expired(
        &self,
        token: &AuthToken,
    ) -> Result<AuthSession, ClientError> {
        if self.held_token().as_ref() == Some(token) {
            self.set_state(TokenState::Expired(token.clone()));
        }

        self.refresh(Some(token))
            .await
            .map_err(|e| ClientError::RefreshFailed(e.to_string()))
    }

    async fn exchange(&self) -> Result<AuthSession, ClientError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ClientError::MissingConfig("WORDPRESS_PREVIEW_USERNAME"))?;

        let data: LoginData = self
            .graphql
            .execute(
                LOGIN_MUTATION,
                json!({
                    "username": credentials.username,
                    "password": credentials.password,
                }),
            )
            .await?;

        let payload = data
            .login
            .ok_or_else(|| {
                ClientError::Unauthorized("login returned no payload".into())
            })?;

        let token = payload
            .auth_token
            .as_deref()
            .and_then(AuthToken::from_cookie_value)
            .ok_or_else(|| {
                ClientError::Unauthorized("login returned no token".into())
            })?;

        Ok(AuthSession {
            token,
            user: payload.user.unwrap_or_default(),
        })
    }
}
