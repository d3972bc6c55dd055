//! AI module for TONY
//!
//! This module provides the single outbound model call behind the
//! `ModelBackend` trait. Providers are selected from configuration.
//!
//! # Architecture
//!
//! - `client` - `TonyAI`, the configured backend used by the orchestrator
//! - `prompt` - fixed persona instruction and sampling parameters
//! - `providers` - Gemini (via Rig) and a generic JSON endpoint
//!
//! # Usage
//!
//! ```rust,no_run
//! use tony::ai::{ModelBackend, TonyAI};
//! use tony::config::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let ai = TonyAI::from_config(&Config::from_env())?;
//! let reply = ai.generate(&[], "Hello!").await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod prompt;
pub mod providers;

use crate::types::Message;
use async_trait::async_trait;

pub use client::TonyAI;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ChatError(String);

impl ChatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::new(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::new(err.to_string())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;

/// The external model call.
///
/// `history` is the session transcript and already ends with the user
/// message carrying `input`.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, history: &[Message], input: &str) -> ChatResult<String>;
}

/// Splits a transcript into prior turns and the pending prompt, dropping the
/// trailing user message when it duplicates `input`.
pub fn prior_turns<'a>(history: &'a [Message], input: &str) -> &'a [Message] {
    match history.split_last() {
        Some((last, rest)) if last.is_user() && last.content == input => rest,
        _ => history,
    }
}
