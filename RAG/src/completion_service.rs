use crate::config::RagConfig;
use crate::embedding_service::api_error_message;
use crate::models::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion>;
}

pub struct OpenAICompletion {
    client: Client,
    api_key: String,
    url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAICompletion {
    pub fn new(config: &RagConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            url: config.endpoint("completions"),
            model: config.completion_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAICompletion {
    async fn complete(&self, prompt: &str) -> Result<Completion> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Completion request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow::anyhow!(
                "OpenAI completions API error ({}): {}",
                status,
                api_error_message(&error_text)
            ));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .context("Malformed completions response")?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| anyhow::anyhow!("Completion response had no choices"))?;

        let usage = match parsed.usage {
            Some(u) => TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
                successful_requests: 1,
                total_cost_usd: estimate_cost(&self.model, u.prompt_tokens, u.completion_tokens),
            },
            None => TokenUsage {
                successful_requests: 1,
                ..TokenUsage::default()
            },
        };

        Ok(Completion { text, usage })
    }
}

/// USD per 1K tokens as (prompt, completion).
fn price_per_1k(model: &str) -> Option<(f64, f64)> {
    match model {
        "gpt-3.5-turbo-instruct" => Some((0.0015, 0.002)),
        "davinci-002" => Some((0.002, 0.002)),
        "babbage-002" => Some((0.0004, 0.0004)),
        _ => None,
    }
}

pub fn estimate_cost(model: &str, prompt_tokens: u32, completion_tokens: u32) -> f64 {
    match price_per_1k(model) {
        Some((prompt, completion)) => {
            prompt_tokens as f64 / 1000.0 * prompt + completion_tokens as f64 / 1000.0 * completion
        }
        None => 0.0,
    }
}
