//! OpenAI Chat Completions client implementing [`LlmClient`].
//!
//! Requires `OPENAI_API_KEY` (or an explicit [`OpenAIConfig`]). [`ChatOpenAI::from_env`]
//! also takes the base URL from `OPENAI_BASE_URL` / `OPENAI_API_BASE`, so any
//! OpenAI-compatible endpoint works. Each request asks for a single candidate and
//! sends no stop sequence.

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::llm::{GenerationParams, LlmClient, LlmError, LlmResponse, LlmUsage};
use crate::message::Message;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};

/// Number of candidates requested per completion.
const CANDIDATES: u8 = 1;

/// OpenAI-compatible completion client.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Build client from the profile's generation settings.
    pub fn from_params(params: &GenerationParams) -> Self {
        Self::new(params.model.clone())
            .with_temperature(params.temperature)
            .with_max_tokens(params.max_tokens)
    }

    /// Build client from the environment: `OPENAI_API_KEY` is required, the base URL
    /// comes from `OPENAI_BASE_URL` or `OPENAI_API_BASE` when set.
    pub fn from_env(params: &GenerationParams) -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| LlmError::Request("OPENAI_API_KEY is not set".to_string()))?;
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base_from_env() {
            config = config.with_api_base(base.trim_end_matches('/'));
        }
        Ok(Self::with_config(config, params.model.clone())
            .with_temperature(params.temperature)
            .with_max_tokens(params.max_tokens))
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the upper bound on generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Chat completions URL for logging. Does not append /v1 when the base already ends with it.
    fn chat_completions_url() -> String {
        let base = api_base_from_env().unwrap_or_else(|| "https://api.openai.com".to_string());
        let base = base.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    fn messages_to_request(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(s) => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(s.as_str()),
                ),
                Message::User(s) => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(s.as_str()),
                ),
                Message::Assistant(s) => {
                    ChatCompletionRequestMessage::Assistant((s.as_str()).into())
                }
            })
            .collect()
    }
}

fn api_base_from_env() -> Option<String> {
    std::env::var("OPENAI_BASE_URL")
        .or_else(|_| std::env::var("OPENAI_API_BASE"))
        .ok()
        .filter(|s| !s.trim().is_empty())
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, LlmError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages));
        args.n(CANDIDATES);

        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        if let Some(m) = self.max_tokens {
            args.max_completion_tokens(m);
        }

        let request = args
            .build()
            .map_err(|e| LlmError::Request(format!("OpenAI request build failed: {}", e)))?;

        let url = Self::chat_completions_url();
        debug!(
            trace_id = %trace_id,
            url = %url,
            model = %self.model,
            message_count = messages.len(),
            temperature = ?self.temperature,
            max_tokens = ?self.max_tokens,
            "OpenAI chat create"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(trace_id = %trace_id, request = %js, "OpenAI request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Api(format!("OpenAI API error: {}", e)))?;

        if let Ok(js) = serde_json::to_string_pretty(&response) {
            trace!(trace_id = %trace_id, response = %js, "OpenAI response body");
        }

        let usage = response.usage.as_ref().map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        debug!(trace_id = %trace_id, usage = ?usage, "OpenAI chat complete");
        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
        })
    }
}
