pub mod endpoint;

use crate::config::Config;
use anyhow::Result;
use rig::providers;

pub use endpoint::EndpointClient;

/// Enum to hold different provider clients
pub enum ProviderClient {
    Gemini(providers::gemini::Client),
    Endpoint(EndpointClient),
}

impl ProviderClient {
    /// Pick a provider from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        // Priority order:
        // 1. LLM_ENDPOINT → generic JSON endpoint
        // 2. GEMINI_API_KEY / API_KEY → Gemini

        if let Some(endpoint) = &config.endpoint {
            return Ok(Self::Endpoint(EndpointClient::new(
                endpoint.clone(),
                config.model.clone(),
                config.endpoint_api_key.clone(),
            )));
        }

        if let Some(key) = &config.gemini_api_key {
            return Ok(Self::Gemini(providers::gemini::Client::new(key)));
        }

        Err(anyhow::anyhow!(
            "No AI provider configured. Set LLM_ENDPOINT or GEMINI_API_KEY"
        ))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini(_) => "gemini",
            Self::Endpoint(_) => "endpoint",
        }
    }
}
