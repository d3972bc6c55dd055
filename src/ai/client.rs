use super::prompt::{SYSTEM_INSTRUCTION, TEMPERATURE, THINKING_BUDGET};
use super::providers::ProviderClient;
use super::{ChatError, ChatResult, ModelBackend, prior_turns};
use crate::config::Config;
use crate::types::{Message, Role};
use anyhow::Result;
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Chat;
use serde_json::json;

/// Configured model client for TONY
/// Handles provider selection and agent configuration
pub struct TonyAI {
    client: ProviderClient,
    model: String,
}

impl TonyAI {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ProviderClient::from_config(config)?;
        tracing::debug!(provider = client.name(), model = %config.model, "model client ready");
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    pub fn provider_name(&self) -> &'static str {
        self.client.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Convert TONY messages to Rig Message format
    fn convert_to_rig_messages(messages: &[Message]) -> Vec<rig::message::Message> {
        messages
            .iter()
            .map(|msg| match msg.role {
                Role::User => rig::message::Message::user(&msg.content),
                Role::Assistant => rig::message::Message::assistant(&msg.content),
            })
            .collect()
    }
}

/// Gemini generation settings passed through Rig's `additional_params`.
fn gemini_params() -> serde_json::Value {
    json!({
        "generationConfig": {
            "thinkingConfig": { "thinkingBudget": THINKING_BUDGET }
        }
    })
}

#[async_trait]
impl ModelBackend for TonyAI {
    async fn generate(&self, history: &[Message], input: &str) -> ChatResult<String> {
        let prior = prior_turns(history, input);
        match &self.client {
            ProviderClient::Gemini(client) => {
                let agent = client
                    .agent(&self.model)
                    .preamble(SYSTEM_INSTRUCTION)
                    .temperature(TEMPERATURE)
                    .additional_params(gemini_params())
                    .build();

                agent
                    .chat(input, Self::convert_to_rig_messages(prior))
                    .await
                    .map_err(|e| ChatError::new(format!("Chat error: {}", e)))
            }
            ProviderClient::Endpoint(client) => {
                client
                    .complete(SYSTEM_INSTRUCTION, TEMPERATURE, prior, input)
                    .await
            }
        }
    }
}
