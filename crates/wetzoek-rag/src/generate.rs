//! OpenAI-compatible chat completions client.
//!
//! Groq and OpenAI expose the same `/chat/completions` shape, so a single
//! client covers both; the provider switch only selects base URL, model and
//! API-key variable. Consumed strictly after retrieval.

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use wetzoek_core::config::LlmConfig;
use wetzoek_core::error::Error;
use wetzoek_core::traits::AnswerGenerator;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

pub struct ChatGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ChatGenerator {
    pub fn from_config(cfg: &LlmConfig) -> Result<Self, Error> {
        let (base_url, model, key_var) = match cfg.provider.as_str() {
            "groq" => (GROQ_BASE_URL, cfg.groq_model.clone(), "GROQ_API_KEY"),
            "openai" => (OPENAI_BASE_URL, cfg.openai_model.clone(), "OPENAI_API_KEY"),
            other => {
                return Err(Error::InvalidConfig(format!("unknown LLM provider: {}", other)))
            }
        };
        let api_key = std::env::var(key_var)
            .map_err(|_| Error::InvalidConfig(format!("missing {} in environment", key_var)))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url: base_url.to_string(), model, api_key })
    }
}

#[async_trait]
impl AnswerGenerator for ChatGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: 0.1,
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("chat request failed: {}", e))?;
        if !response.status().is_success() {
            return Err(anyhow!("chat API error: {}", response.status()));
        }
        let parsed: ChatResponse =
            response.json().await.map_err(|e| anyhow!("failed to parse chat response: {}", e))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("chat response contained no choices"))
    }
}
