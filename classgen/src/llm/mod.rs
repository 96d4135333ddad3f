//! Completion client abstraction used by the plan requester.
//!
//! [`LlmClient`] takes the prompt messages and returns the generated text. Decoding
//! parameters (model, max output tokens, temperature) are fixed when the client is
//! built, so every request from one client uses the same settings.
//! Implementations: [`ChatOpenAI`] (OpenAI-compatible API) and [`MockLlm`] (tests).

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::Message;

/// Errors from a completion call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request could not be assembled (bad parameters).
    #[error("request build failed: {0}")]
    Request(String),

    /// Transport, auth, quota, or protocol failure reported by the service.
    #[error("API error: {0}")]
    Api(String),

    /// The service answered without any candidate.
    #[error("completion returned no choices")]
    EmptyResponse,
}

/// Token usage for one completion call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Text returned by a completion call.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Generated text, untrimmed.
    pub content: String,
    /// Token usage, when the service reports it.
    pub usage: Option<LlmUsage>,
}

/// Fixed decoding settings for lesson-plan generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationParams {
    pub model: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature (0–2); the default favours variety.
    pub temperature: f32,
}

impl GenerationParams {
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";
    pub const DEFAULT_MAX_TOKENS: u32 = 1800;
    pub const DEFAULT_TEMPERATURE: f32 = 0.9;

    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("generation.model must not be empty".to_string());
        }
        if self.max_tokens == 0 {
            return Err("generation.max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "generation.temperature must be between 0 and 2, got {}",
                self.temperature
            ));
        }
        Ok(())
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            temperature: Self::DEFAULT_TEMPERATURE,
        }
    }
}

/// Completion client: given messages, returns one generated text.
///
/// One call per user action; no retries. Errors propagate to the caller.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, LlmError>;
}
