//! OpenAI client configuration with sensible defaults.

use crate::config::ModelSettings;
use crate::error::{DelveError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for model API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for the configured provider.
///
/// The API key is read from the environment variable named in the model
/// settings; `api_base` switches to any OpenAI-compatible endpoint.
pub fn create_client(model: &ModelSettings, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let api_key = std::env::var(&model.api_key_env).map_err(|_| {
        DelveError::Config(format!("{} not set", model.api_key_env))
    })?;

    let mut config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = model.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
    }

    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    Ok(Client::with_config(config).with_http_client(http_client))
}
