use std::sync::Arc;

use anyhow::{Context, Result};
use glossa_core::{
    ArticleStructurer, ChatClient, CompletionClient, FetchConfig, LookupGateway, MemoryRateLimitStore, RateLimiter,
};

use crate::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub structurer: Arc<ArticleStructurer>,
    pub lookup: LookupGateway<Arc<dyn CompletionClient>>,
    pub rate_limiter: Arc<RateLimiter>,
    pub fetch_config: Arc<FetchConfig>,
}

impl AppState {
    /// State around an existing language-model client.
    pub fn new(client: Arc<dyn CompletionClient>, config: &ServerConfig) -> Self {
        Self {
            structurer: Arc::new(ArticleStructurer::new()),
            lookup: LookupGateway::new(client),
            rate_limiter: Arc::new(RateLimiter::new(MemoryRateLimitStore::new(), config.rate_limits)),
            fetch_config: Arc::new(config.fetch.clone()),
        }
    }

    /// State talking to the chat-completions API named in `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let client = ChatClient::new(config.lookup.clone()).context("Failed to build language model client")?;
        Ok(Self::new(Arc::new(client), config))
    }
}
