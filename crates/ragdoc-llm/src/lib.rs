use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use ragdoc_core::config::GenerationConfig;
use ragdoc_core::traits::Generator;

pub mod chat;
pub mod prompt;
pub mod redact;

pub use chat::{parse_response, ChatCompletionsGenerator, ChatMessage, ChatRequest};

/// Offline generator for tests and local runs: echoes what it was given.
pub struct FakeGenerator {
    id: String,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self { id: "fake".to_string() }
    }
}

impl Default for FakeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, query: &str, passages: &[String]) -> Result<String> {
        let lead: String = passages
            .first()
            .map(|p| p.chars().take(80).collect())
            .unwrap_or_default();
        Ok(format!(
            "Answer to \"{}\" based on {} passage(s): {}",
            query.trim(),
            passages.len(),
            lead.trim()
        ))
    }
}

fn use_fake_generation() -> bool {
    std::env::var("APP_USE_FAKE_GENERATION")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn get_default_generator(config: &GenerationConfig) -> Result<Box<dyn Generator>> {
    if use_fake_generation() {
        info!("using fake generator");
        return Ok(Box::new(FakeGenerator::new()));
    }
    let generator = ChatCompletionsGenerator::new(config.clone())?;
    if !generator.has_api_key() {
        tracing::warn!("no generation API key configured; requests will be sent unauthenticated");
    }
    info!(model = %config.model, url = %config.api_url, "using chat-completions generator");
    Ok(Box::new(generator))
}
