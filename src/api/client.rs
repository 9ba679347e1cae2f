use async_trait::async_trait;

use crate::models::{CharacterResponse, Result, WorldResponse};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameDataApi: Send + Sync {
    /// Fetch the world document, including its online roster
    async fn fetch_world(&self, world: &str) -> Result<WorldResponse>;

    /// Fetch the detail document for a single character
    async fn fetch_character(&self, name: &str) -> Result<CharacterResponse>;
}

/// Configuration for API clients
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}
