use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{BackendError, RecipeBackend};
use crate::config::BackendConfig;
use crate::constants::{USER_AGENT, endpoints};
use crate::domain::QueryParams;
use crate::models::Ingredient;

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    answer: String,
}

/// HTTP client for the recipe backend.
#[derive(Clone)]
pub struct RecipeApiClient {
    client: Client,
    base_url: Url,
}

impl RecipeApiClient {
    /// # Errors
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .user_agent(if config.user_agent.is_empty() {
                USER_AGENT
            } else {
                config.user_agent.as_str()
            })
            .pool_max_idle_per_host(10);

        if config.request_timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_seconds));
        }

        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self::with_shared_client(client, parse_base_url(&config.base_url)?))
    }

    #[must_use]
    pub const fn with_shared_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path)?)
    }
}

/// Parses a base URL, making sure relative joins keep its path.
///
/// # Errors
///
/// Returns the parse error for malformed URLs.
pub fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait::async_trait]
impl RecipeBackend for RecipeApiClient {
    async fn search_recipes(
        &self,
        params: &QueryParams,
    ) -> Result<serde_json::Value, BackendError> {
        let mut url = self.endpoint(endpoints::SEARCH_RECIPES)?;
        url.query_pairs_mut().extend_pairs(params.iter());

        debug!(url = %url, "Fetching recipes");

        let response = self.client.get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, BackendError> {
        let url = self.endpoint(endpoints::INGREDIENTS)?;

        debug!(url = %url, "Fetching ingredient catalog");

        let response = self.client.get(url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn chat(&self, message: &str) -> Result<String, BackendError> {
        let url = self.endpoint(endpoints::CHAT)?;

        let response = self
            .client
            .post(url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let reply: ChatReply = check_status(response).await?.json().await?;
        Ok(reply.answer)
    }
}
