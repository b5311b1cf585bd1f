use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::Validate;
use std::env;

pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const GOOGLE_KEY_VAR: &str = "GOOGLE_API_KEY";

/// 三家 provider 的 API 金鑰
///
/// 啟動時一次讀入並驗證，任何網路呼叫之前缺漏即失敗。
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    pub google_api_key: String,
}

impl ApiCredentials {
    pub fn from_env() -> Result<Self> {
        let credentials = Self {
            openai_api_key: env::var(OPENAI_KEY_VAR).unwrap_or_default(),
            anthropic_api_key: env::var(ANTHROPIC_KEY_VAR).unwrap_or_default(),
            google_api_key: env::var(GOOGLE_KEY_VAR).unwrap_or_default(),
        };
        credentials.validate()?;
        Ok(credentials)
    }
}

impl Validate for ApiCredentials {
    fn validate(&self) -> Result<()> {
        let required = [
            ("openai", OPENAI_KEY_VAR, &self.openai_api_key),
            ("anthropic", ANTHROPIC_KEY_VAR, &self.anthropic_api_key),
            ("gemini", GOOGLE_KEY_VAR, &self.google_api_key),
        ];

        for (provider, env_var, key) in required {
            if key.trim().is_empty() {
                return Err(PlannerError::MissingCredentialError {
                    provider: provider.to_string(),
                    env_var: env_var.to_string(),
                });
            }
        }
        Ok(())
    }
}
