use crate::domain::ports::{CompletionParams, ModelClient};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Google Gemini generateContent 客戶端，供 personalization agent 使用
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_API_BASE_URL.to_string(),
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
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str, params: &CompletionParams) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response_mime_type = params
            .force_json
            .then(|| "application/json".to_string());

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
                response_mime_type,
            }),
        };

        tracing::debug!(
            "📡 gemini: POST {} (model: {}, prompt: {} chars)",
            url,
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
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
                    provider: "gemini".to_string(),
                    message,
                });
            }
            return Err(PlannerError::ProviderStatusError {
                provider: "gemini".to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| PlannerError::MalformedResponseError {
                provider: "gemini".to_string(),
                details: format!("invalid JSON body: {}", e),
            })?;

        // 先檢查 prompt 是否被安全機制擋下
        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(PlannerError::MalformedResponseError {
                    provider: "gemini".to_string(),
                    details: format!("prompt was blocked: {}", reason),
                });
            }
        }

        let text = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| PlannerError::MalformedResponseError {
                provider: "gemini".to_string(),
                details: "response contains no candidates".to_string(),
            })?;

        if text.is_empty() {
            return Err(PlannerError::MalformedResponseError {
                provider: "gemini".to_string(),
                details: "response text is empty".to_string(),
            });
        }

        tracing::debug!("📡 gemini: received {} chars", text.len());
        Ok(text)
    }
}
