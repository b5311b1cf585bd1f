use crate::domain::ports::CompletionParams;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 各階段模型調校，來源是 --config 指定的 TOML 檔
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub agents: AgentsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub research: AgentTuning,
    #[serde(default)]
    pub planning: AgentTuning,
    #[serde(default)]
    pub personalization: AgentTuning,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentTuning {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u32>,
    pub base_url: Option<String>,
}

impl AgentTuning {
    /// 套用調校後的呼叫參數，未指定的欄位維持預設
    pub fn completion_params(&self) -> CompletionParams {
        let mut params = CompletionParams::default();
        if let Some(temperature) = self.temperature {
            params.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            params.max_tokens = max_tokens;
        }
        params
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .map(|seconds| Duration::from_secs(u64::from(seconds)))
    }

    fn validate_section(&self, section: &str) -> Result<()> {
        if let Some(model) = &self.model {
            validate_non_empty_string(&format!("agents.{}.model", section), model)?;
        }
        if let Some(temperature) = self.temperature {
            validate_range(
                &format!("agents.{}.temperature", section),
                temperature,
                0.0,
                2.0,
            )?;
        }
        if let Some(max_tokens) = self.max_tokens {
            validate_positive_number(&format!("agents.{}.max_tokens", section), max_tokens, 1)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number(&format!("agents.{}.timeout_seconds", section), timeout, 1)?;
        }
        if let Some(base_url) = &self.base_url {
            validate_url(&format!("agents.{}.base_url", section), base_url)?;
        }
        Ok(())
    }
}

impl PlannerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PLANNER_MODEL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for PlannerConfig {
    fn validate(&self) -> Result<()> {
        self.agents.research.validate_section("research")?;
        self.agents.planning.validate_section("planning")?;
        self.agents.personalization.validate_section("personalization")?;
        Ok(())
    }
}
