//! Chat-completion client for the LLM-backed strategy.
//!
//! [`LlmClient`] is the seam the assessor depends on; [`HttpLlmClient`]
//! talks to any OpenAI-compatible `/chat/completions` endpoint with a
//! blocking client (assessments run on blocking worker threads, see the
//! server binary).

use serde::{Deserialize, Serialize};

use crate::{AgentConfig, AgentError, AgentResult};

/// A chat-completion backend.
pub trait LlmClient: Send + Sync {
    /// Send a system + user message pair, returning the assistant reply.
    ///
    /// # Errors
    ///
    /// Returns an [`AgentError`] for connection, timeout, HTTP, and
    /// response-shape failures.
    fn chat(&self, system: &str, user: &str) -> AgentResult<String>;
}

/// HTTP client for an OpenAI-compatible chat endpoint.
#[derive(Debug)]
pub struct HttpLlmClient {
    base_url: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl HttpLlmClient {
    /// Build a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotConfigured`] when no API key is set and
    /// [`AgentError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &AgentConfig) -> AgentResult<Self> {
        let api_key = config.api_key.clone().ok_or(AgentError::NotConfigured)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            timeout_secs: config.timeout_secs,
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    /// Low temperature for consistent clinical reasoning.
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl LlmClient for HttpLlmClient {
    fn chat(&self, system: &str, user: &str) -> AgentResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.3,
            max_tokens: 2000,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    AgentError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    AgentError::Timeout(self.timeout_secs)
                } else {
                    AgentError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AgentError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| AgentError::ResponseParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AgentError::ResponseParsing("response contained no choices".to_string()))
    }
}
