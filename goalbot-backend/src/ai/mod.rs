//! AI completion client for SMART goal rewriting.
//!
//! Talks to an OpenAI-compatible chat completions endpoint over reqwest
//! with an explicit timeout. One attempt per objective; callers fall back
//! to the raw text when the call fails.

use crate::config::{defaults, AiConfig};
use crate::error::AiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seam between the dispatcher and the AI collaborator. The production
/// implementation is `AiClient`; tests substitute a canned one.
#[async_trait]
pub trait SmartRewriter: Send + Sync {
    /// Rewrite free-form objective text into SMART goal language.
    async fn rewrite_smart(&self, objective_text: &str) -> Result<String, AiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct AiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl AiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// The fixed SMART instruction wrapped around the user's objective.
    fn smart_prompt(objective_text: &str) -> String {
        format!(
            "Please structure this business objective into a SMART goal format \
             (Specific, Measurable, Achievable, Relevant, Time-bound):\n\n\
             Objective: {}\n\n\
             Format your response as:\n\
             1. Structured Objective:\n\
             2. Key Metrics:\n\
             3. Suggested Timeline:",
            objective_text
        )
    }
}

#[async_trait]
impl SmartRewriter for AiClient {
    async fn rewrite_smart(&self, objective_text: &str) -> Result<String, AiError> {
        let messages = [Message {
            role: MessageRole::User,
            content: Self::smart_prompt(objective_text),
        }];
        let body = ChatRequest {
            model: &self.model,
            messages: &messages,
            max_tokens: defaults::AI_MAX_TOKENS,
            temperature: defaults::AI_TEMPERATURE,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            log::warn!("[AI] Completion request rejected: HTTP {}", response.status());
            return Err(AiError::Status(response.status()));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(AiError::EmptyCompletion)
    }
}
