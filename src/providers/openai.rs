use crate::domain::ports::{CompletionParams, ModelClient};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// OpenAI chat-completions 客戶端，供 research agent 使用
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: OPENAI_API_BASE_URL.to_string(),
            model,
            timeout: Duration::from_secs(120),
        }
    }

    /// 替換 API base URL（測試或相容端點用）
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
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, prompt: &str, params: &CompletionParams) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response_format = params.force_json.then(|| ResponseFormat {
            format_type: "json_object".to_string(),
        });

        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            response_format,
        };

        tracing::debug!(
            "📡 openai: POST {} (model: {}, prompt: {} chars)",
            url,
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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
                    provider: "openai".to_string(),
                    message,
                });
            }
            return Err(PlannerError::ProviderStatusError {
                provider: "openai".to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&raw).map_err(|e| PlannerError::MalformedResponseError {
                provider: "openai".to_string(),
                details: format!("invalid JSON body: {}", e),
            })?;

        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| PlannerError::MalformedResponseError {
                provider: "openai".to_string(),
                details: "response contains no choices".to_string(),
            })?;

        if content.is_empty() {
            return Err(PlannerError::MalformedResponseError {
                provider: "openai".to_string(),
                details: "response text is empty".to_string(),
            });
        }

        tracing::debug!("📡 openai: received {} chars", content.len());
        Ok(content)
    }
}
