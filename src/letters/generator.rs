use anyhow::Context;
use axum::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeneratorConfig;

/// Opaque external text generator: given prompts, returns letter text or
/// fails. Single attempt; callers surface failure immediately.
#[async_trait]
pub trait LetterGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> anyhow::Result<String>;
}

/// OpenAI-compatible chat-completions client.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
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
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[async_trait]
impl LetterGenerator for OpenAiGenerator {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> anyhow::Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: 1500,
            temperature: 0.7,
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("chat completion request")?
            .error_for_status()
            .context("chat completion status")?;

        let parsed: ChatResponse = resp.json().await.context("chat completion body")?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("chat completion returned no choices")?;
        debug!(chars = content.len(), "letter text generated");
        Ok(content)
    }
}
