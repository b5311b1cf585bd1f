use crate::domain::ports::{CompletionParams, ModelClient};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_API_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Anthropic messages 客戶端，供 planning agent 使用
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl AnthropicClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: ANTHROPIC_API_BASE_URL.to_string(),
            model,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<RequestMessage>,
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ModelClient for AnthropicClient {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str, params: &CompletionParams) -> Result<String> {
        // Anthropic 沒有 JSON mode，force_json 靠 prompt 約束
        let url = format!("{}/v1/messages", self.base_url);

        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            messages: vec![RequestMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        tracing::debug!(
            "📡 anthropic: POST {} (model: {}, prompt: {} chars)",
            url,
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            if status.as_u16() == 429 {
                return Err(PlannerError::RateLimitError {
                    provider: "anthropic".to_string(),
                    message,
                });
            }
            return Err(PlannerError::ProviderStatusError {
                provider: "anthropic".to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let parsed: MessagesResponse =
            serde_json::from_str(&raw).map_err(|e| PlannerError::MalformedResponseError {
                provider: "anthropic".to_string(),
                details: format!("invalid JSON body: {}", e),
            })?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.clone())
            .ok_or_else(|| PlannerError::MalformedResponseError {
                provider: "anthropic".to_string(),
                details: "response contains no content blocks".to_string(),
            })?;

        if text.is_empty() {
            return Err(PlannerError::MalformedResponseError {
                provider: "anthropic".to_string(),
                details: "response text is empty".to_string(),
            });
        }

        tracing::debug!("📡 anthropic: received {} chars", text.len());
        Ok(text)
    }
}
