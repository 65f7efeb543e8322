//! HTTP client for the completion service
//!
//! Supports two API formats:
//! - **OpenAI-compatible** (default): OpenAI, Groq, Ollama, vLLM, LiteLLM, Together, ...
//! - **Anthropic**: Claude messages API with `x-api-key` auth
//!
//! Set `ASKDB_LLM_PROVIDER=anthropic` to switch to Anthropic mode.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, CompletionRequest, LlmClient, LlmConfig, LlmError, LlmProvider, Role};

// ── OpenAI-compatible API types ──

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

// ── Anthropic API types ──

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "String::is_empty")]
    system: String,
    messages: Vec<&'a ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    text: Option<String>,
}

/// [`LlmClient`] that talks to a hosted chat-completion endpoint
#[derive(Clone)]
pub struct HttpLlmClient {
    http: Client,
    config: LlmConfig,
}

impl HttpLlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn call_openai(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = OpenAIRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: &request.messages,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .header("authorization", format!("Bearer {}", self.config.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let msg: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        Ok(openai_text(msg))
    }

    async fn call_anthropic(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = anthropic_body(request);

        let response = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let msg: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        Ok(anthropic_text(msg))
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        log::debug!(
            "LLM call: provider={}, model={}, temperature={}, max_tokens={}, messages={}",
            self.config.provider.as_str(),
            request.model,
            request.temperature,
            request.max_tokens,
            request.messages.len()
        );

        match self.config.provider {
            LlmProvider::OpenAI => self.call_openai(&request).await,
            LlmProvider::Anthropic => self.call_anthropic(&request).await,
        }
    }
}

/// Anthropic takes system instructions as a top-level field, not a message.
fn anthropic_body(request: &CompletionRequest) -> AnthropicRequest<'_> {
    let system = request
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    AnthropicRequest {
        model: &request.model,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        system,
        messages: request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .collect(),
    }
}

fn openai_text(msg: OpenAIResponse) -> String {
    msg.choices
        .into_iter()
        .filter_map(|c| c.message.content)
        .collect::<Vec<_>>()
        .join("")
}

fn anthropic_text(msg: AnthropicResponse) -> String {
    msg.content
        .into_iter()
        .filter_map(|b| b.text)
        .collect::<Vec<_>>()
        .join("")
}
