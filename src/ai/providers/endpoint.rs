use crate::ai::{ChatError, ChatResult};
use crate::types::{Message, Role};
use serde::{Deserialize, Serialize};

/// Client for a generic JSON chat endpoint
pub struct EndpointClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

// Endpoint response types
#[derive(Deserialize)]
struct EndpointMessage {
    content: String,
}

#[derive(Deserialize)]
struct EndpointChoice {
    message: Option<EndpointMessage>,
}

#[derive(Deserialize)]
struct ResponseOpenAIShape {
    choices: Vec<EndpointChoice>,
}

#[derive(Deserialize)]
struct ResponseContentOnly {
    content: String,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Serialize)]
struct EndpointRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
}

impl EndpointClient {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            model,
            api_key,
        }
    }

    /// Sends prior turns plus `input` as one request and returns the reply text.
    pub async fn complete(
        &self,
        system: &str,
        temperature: f64,
        prior: &[Message],
        input: &str,
    ) -> ChatResult<String> {
        let mut messages: Vec<WireMessage<'_>> = prior
            .iter()
            .map(|msg| WireMessage {
                role: msg.role,
                content: &msg.content,
            })
            .collect();
        messages.push(WireMessage {
            role: Role::User,
            content: input,
        });

        let mut request = self.client.post(&self.endpoint).json(&EndpointRequest {
            model: &self.model,
            system,
            messages,
            temperature,
        });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::new(format!("LLM endpoint error {status}: {body}")));
        }

        Ok(extract_reply(body))
    }
}

/// Accepts an OpenAI-shaped body, a `{content}` body, or raw text.
fn extract_reply(body: String) -> String {
    if let Ok(parsed) = serde_json::from_str::<ResponseOpenAIShape>(&body)
        && let Some(choice) = parsed.choices.into_iter().next()
        && let Some(msg) = choice.message
    {
        return msg.content;
    }

    if let Ok(parsed) = serde_json::from_str::<ResponseContentOnly>(&body) {
        return parsed.content;
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_openai_shape() {
        let body = r#"{"choices":[{"message":{"content":"Hello"}}]}"#;
        assert_eq!(extract_reply(body.to_string()), "Hello");
    }

    #[test]
    fn test_extract_content_only() {
        let body = r#"{"content":"Hi there"}"#;
        assert_eq!(extract_reply(body.to_string()), "Hi there");
    }

    #[test]
    fn test_extract_raw_text() {
        assert_eq!(extract_reply("plain".to_string()), "plain");
    }

    #[test]
    fn test_request_wire_shape() {
        let request = EndpointRequest {
            model: "m",
            system: "s",
            messages: vec![WireMessage {
                role: Role::Assistant,
                content: "x",
            }],
            temperature: 0.7,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "assistant");
        assert_eq!(json["model"], "m");
    }
}
