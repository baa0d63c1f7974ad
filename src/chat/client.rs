//! Chat completions client.

use crate::chat::types::{ChatCompletionBody, ChatCompletionResponse, ChatRequest, ChatResult};
use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::{Result, SoraChatError};
use crate::http::HttpTransport;
use std::time::Instant;

const CHAT_PATH: &str = "chat/completions";

/// Builder for ChatClient.
#[derive(Debug, Clone)]
pub struct ChatClientBuilder {
    config: ClientConfig,
    max_tokens: u32,
    temperature: f32,
}

impl Default for ChatClientBuilder {
    fn default() -> Self {
        Self {
            config: ClientConfig::from_env(),
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

impl ChatClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the connection settings.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.with_base_url(base_url);
        self
    }

    /// Sets the completion token limit.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<ChatClient> {
        Ok(ChatClient {
            transport: HttpTransport::new(&self.config)?,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        })
    }
}

/// Sends single prompts to the chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    transport: HttpTransport,
    max_tokens: u32,
    temperature: f32,
}

impl ChatClient {
    /// Creates a new `ChatClientBuilder`.
    pub fn builder() -> ChatClientBuilder {
        ChatClientBuilder::new()
    }

    /// Sends the prompt and returns the assistant's reply. Never retries.
    pub async fn send(&self, request: &ChatRequest, credential: &Credential) -> Result<ChatResult> {
        if request.user_prompt.trim().is_empty() {
            return Err(SoraChatError::InvalidRequest("prompt is empty".into()));
        }

        let start = Instant::now();
        let body = ChatCompletionBody {
            model: &request.model,
            messages: request.messages(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(
            model = %request.model,
            has_image = request.inline_image.is_some(),
            "sending chat completion request"
        );

        let response: ChatCompletionResponse = self
            .transport
            .post_json(CHAT_PATH, &body, credential, "API request failed")
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                SoraChatError::MalformedResponse("missing choices[0].message.content".into())
            })?;

        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = text.len(),
            "chat completion received"
        );

        Ok(ChatResult {
            text,
            model: response.model,
        })
    }
}
