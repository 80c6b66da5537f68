use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::common::{is_expired_token_message, ClientError};
use crate::models::{
    AuthToken, ContentKind, ContentNode, Landing, MenuItem, RouteLookup,
};
use crate::services::queries;

/// Everything the page assemblers need from the content source.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn post(
        &self,
        lookup: &RouteLookup,
    ) -> Result<Option<ContentNode>, ClientError>;

    async fn page(
        &self,
        lookup: &RouteLookup,
    ) -> Result<Option<ContentNode>, ClientError>;

    async fn landing(
        &self,
        lookup: &RouteLookup,
    ) -> Result<Option<Landing>, ClientError>;

    async fn landings(&self) -> Result<Vec<Landing>, ClientError>;

    async fn recent_posts(
        &self,
        first: u32,
    ) -> Result<Vec<ContentNode>, ClientError>;

    async fn menu_items(
        &self,
        location: &str,
    ) -> Result<Vec<MenuItem>, ClientError>;

    async fn menu(&self, name: &str) -> Result<Vec<MenuItem>, ClientError>;

    async fn front_page_id(&self) -> Result<Option<u64>, ClientError>;
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorItem>,
}

#[derive(Deserialize)]
struct GraphqlErrorItem {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct Nodes<T> {
    #[serde(default)]
    nodes: Vec<T>,
}

/// GraphQL client for the content source. The public variant sends no
/// credentials; `authenticated` derives a variant carrying a bearer token.
#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    token: Option<AuthToken>,
}

impl GraphqlClient {
    pub fn public(http: reqwest::Client, endpoint: Option<String>) -> Self {
        Self {
            http,
            endpoint,
            token: None,
        }
    }

    pub fn authenticated(&self, token: AuthToken) -> Self {
        Self {
            http: self.http.clone(),
            endpoint: self.endpoint.clone(),
            token: Some(token),
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, ClientError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ClientError::MissingConfig("WORDPRESS_GRAPHQL_ENDPOINT"))?;

        let mut request = self
            .http
            .post(endpoint)
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(token) = &self.token {
            request = request
                .header(AUTHORIZATION, format!("Bearer {}", token.as_str()))
                .header(CACHE_CONTROL, "no-cache");
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        // WPGraphQL JWT answers 403 for tokens it cannot validate.
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
        {
            let message = error_message(&body);
            return Err(if is_expired_token_message(&message) {
                ClientError::ExpiredToken(message)
            } else {
                ClientError::Unauthorized(message)
            });
        }

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: GraphqlResponse<T> = serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        let messages: Vec<String> =
            parsed.errors.into_iter().map(|e| e.message).collect();

        let expired = messages.iter().find(|m| is_expired_token_message(m));
        if let Some(expired) = expired {
            return Err(ClientError::ExpiredToken(expired.clone()));
        }

        match parsed.data {
            Some(data) => {
                if !messages.is_empty() {
                    log::warn!(
                        "GraphQL returned partial data: {}",
                        messages.join("; ")
                    );
                }
                Ok(data)
            }
            None if !messages.is_empty() => Err(ClientError::GraphQl(messages)),
            None => Err(ClientError::Decode("response carried no data".into())),
        }
    }

    pub async fn fetch_single<T: DeserializeOwned>(
        &self,
        kind: ContentKind,
        query: &str,
        lookup: &RouteLookup,
    ) -> Result<Option<T>, ClientError> {
        let mut data: serde_json::Map<String, Value> = self
            .execute(
                query,
                json!({
                    "id": lookup.id,
                    "idType": lookup.id_type.as_graphql(),
                }),
            )
            .await?;

        match data.remove(kind.as_str()) {
            None | Some(Value::Null) => Ok(None),
            Some(node) => serde_json::from_value(node)
                .map(Some)
                .map_err(|e| ClientError::Decode(e.to_string())),
        }
    }
}

/// Pulls a human-readable message out of an error body, whatever its shape.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(message) = value
            .get("errors")
            .and_then(|e| e.get(0))
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
    }

    body.chars().take(200).collect()
}

#[async_trait]
impl ContentSource for GraphqlClient {
    async fn post(
        &self,
        lookup: &RouteLookup,
    ) -> Result<Option<ContentNode>, ClientError> {
        self.fetch_single(ContentKind::Post, queries::post_query(), lookup)
            .await
    }

    async fn page(
        &self,
        lookup: &RouteLookup,
    ) -> Result<Option<ContentNode>, ClientError> {
        self.fetch_single(ContentKind::Page, queries::page_query(), lookup)
            .await
    }

    async fn landing(
        &self,
        lookup: &RouteLookup,
    ) -> Result<Option<Landing>, ClientError> {
        let query = queries::landing_query();
        self.fetch_single(ContentKind::Landing, query, lookup).await
    }

    async fn landings(&self) -> Result<Vec<Landing>, ClientError> {
        #[derive(Deserialize)]
        struct Data {
            landings: Option<Nodes<Landing>>,
        }

        let data: Data =
            self.execute(queries::LANDINGS_QUERY, json!({})).await?;
        Ok(data.landings.map(|l| l.nodes).unwrap_or_default())
    }

    async fn recent_posts(
        &self,
        first: u32,
    ) -> Result<Vec<ContentNode>, ClientError> {
        #[derive(Deserialize)]
        struct Data {
            posts: Option<Nodes<ContentNode>>,
        }

        let data: Data = self
            .execute(queries::recent_posts_query(), json!({ "first": first }))
            .await?;
        Ok(data.posts.map(|p| p.nodes).unwrap_or_default())
    }

    async fn menu_items(
        &self,
        location: &str,
    ) -> Result<Vec<MenuItem>, ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            menu_items: Option<Nodes<MenuItem>>,
        }

        let data: Data = self
            .execute(queries::MENU_ITEMS_QUERY, json!({ "location": location }))
            .await?;
        Ok(data.menu_items.map(|m| m.nodes).unwrap_or_default())
    }

    async fn menu(&self, name: &str) -> Result<Vec<MenuItem>, ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Menu {
            menu_items: Option<Nodes<MenuItem>>,
        }

        #[derive(Deserialize)]
        struct Data {
            menu: Option<Menu>,
        }

        let data: Data = self
            .execute(queries::MENU_QUERY, json!({ "id": name }))
            .await?;
        Ok(data
            .menu
            .and_then(|m| m.menu_items)
            .map(|m| m.nodes)
            .unwrap_or_default())
    }

    async fn front_page_id(&self) -> Result<Option<u64>, ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct FrontPage {
            database_id: Option<u64>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Settings {
            front_page: Option<FrontPage>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            homepage_settings: Option<Settings>,
        }

        let data: Data = self
            .execute(queries::HOMEPAGE_SETTINGS_QUERY, json!({}))
            .await?;
        Ok(data
            .homepage_settings
            .and_then(|s| s.front_page)
            .and_then(|f| f.database_id))
    }
}
