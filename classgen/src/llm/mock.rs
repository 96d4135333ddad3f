//! Mock completion client for tests and dry runs.
//!
//! Returns scripted text, counts calls, and remembers the prompts it received so
//! tests can assert how often the service would have been hit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, LlmResponse};
use crate::message::Message;

/// Mock LLM with scripted responses.
///
/// Responses are returned in order; once the script runs out the last one
/// repeats. A failing mock returns [`LlmError::Api`] on every call (still counted).
pub struct MockLlm {
    responses: Vec<String>,
    failure: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    /// Always returns `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_responses(vec![content.into()])
    }

    /// Returns `responses` in order, then repeats the last one.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses,
            failure: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::with_responses(Vec::new())
        }
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt text of every call, in order (messages joined by blank lines).
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts().pop()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = messages
            .iter()
            .map(Message::content)
            .collect::<Vec<_>>()
            .join("\n\n");
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt);

        if let Some(message) = &self.failure {
            return Err(LlmError::Api(message.clone()));
        }
        let content = self
            .responses
            .get(n)
            .or_else(|| self.responses.last())
            .cloned()
            .ok_or(LlmError::EmptyResponse)?;
        Ok(LlmResponse {
            content,
            usage: None,
        })
    }
}
