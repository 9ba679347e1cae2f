use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    api::client::{ApiClientConfig, GameDataApi},
    models::{CharacterResponse, FinderError, Result, WorldResponse},
};

/// Client for the TibiaData v4 REST API.
pub struct TibiaDataClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl TibiaDataClient {
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FinderError::ConfigError(format!("Invalid API base URL {}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(FinderError::ConfigError(format!(
                "API base URL cannot be a base: {}",
                config.base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| FinderError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// `{base}/world/{world}` with the world name lower-cased.
    pub fn world_url(&self, world: &str) -> Url {
        self.endpoint(&["world", &world.trim().to_lowercase()])
    }

    /// `{base}/character/{name}` with the name percent-encoded.
    pub fn character_url(&self, name: &str) -> Url {
        self.endpoint(&["character", name.trim()])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`, the base URL always has path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FinderError::NetworkFailure(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
            return Err(FinderError::ApiError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FinderError::NetworkFailure(format!("Failed to read body from {}: {}", url, e)))?;

        serde_json::from_str(&body)
            .map_err(|e| FinderError::MalformedResponse(format!("Unexpected body from {}: {}", url, e)))
    }
}

#[async_trait]
impl GameDataApi for TibiaDataClient {
    async fn fetch_world(&self, world: &str) -> Result<WorldResponse> {
        let response: WorldResponse = self.get_json(self.world_url(world)).await?;
        info!(
            "Fetched world {} with {} players online",
            world,
            response.world.online_players.as_ref().map(Vec::len).unwrap_or(0)
        );
        Ok(response)
    }

    async fn fetch_character(&self, name: &str) -> Result<CharacterResponse> {
        let response = self.get_json(self.character_url(name)).await?;
        info!("Fetched character {}", name);
        Ok(response)
    }
}
