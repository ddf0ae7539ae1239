//! OpenAI-compatible chat-completions client (Hugging Face router by default).

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use ragdoc_core::config::GenerationConfig;
use ragdoc_core::traits::Generator;

use crate::prompt::build_user_prompt;
use crate::redact::redact_known;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct ChatCompletionsGenerator {
    client: Client,
    config: GenerationConfig,
    api_key: Option<String>,
    id: String,
}

impl ChatCompletionsGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let api_key = config.resolved_api_key();
        let id = format!("chat:{}", config.model);
        Ok(Self { client, config, api_key, id })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn request_body(&self, query: &str, passages: &[String]) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: self.config.system_prompt.clone() },
                ChatMessage { role: "user".to_string(), content: build_user_prompt(query, passages) },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    /// Mask the configured API key and any key-shaped token in `text`.
    pub fn redact(&self, text: &str) -> String {
        redact_known(text, self.api_key.as_deref())
    }

    async fn request_answer(&self, query: &str, passages: &[String]) -> Result<String> {
        let start = Instant::now();
        let body = self.request_body(query, passages);
        let mut request = self.client.post(&self.config.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        debug!(model = %self.config.model, passages = passages.len(), "calling generation backend");
        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("could not reach generation backend: {}", e.without_url()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| anyhow!("could not read generation response: {}", e.without_url()))?;
        if !status.is_success() {
            bail!("generation backend returned {}: {}", status, error_detail(&text));
        }
        let answer = parse_response(&text)?;
        info!(model = %self.config.model, elapsed_ms = start.elapsed().as_millis() as u64, "answer generated");
        Ok(answer)
    }
}

/// Extract the first choice's content from a chat-completions response body.
pub fn parse_response(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| anyhow!("malformed response from generation backend: {}", e))?;
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| anyhow!("generation backend returned no choices"))
}

/// Pull a readable message out of an error body (`{"error": "..."}` or
/// `{"error": {"message": "..."}}`), falling back to the raw text.
pub fn error_detail(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        let err = v.get("error")?;
        err.as_str()
            .map(str::to_string)
            .or_else(|| err.get("message").and_then(|m| m.as_str()).map(str::to_string))
    });
    from_json.unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl Generator for ChatCompletionsGenerator {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, query: &str, passages: &[String]) -> Result<String> {
        self.request_answer(query, passages)
            .await
            .map_err(|e| anyhow!(self.redact(&format!("{e:#}"))))
    }
}
