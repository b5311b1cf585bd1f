use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing API credential for {provider}: please set {env_var}")]
    MissingCredentialError { provider: String, env_var: String },

    #[error("Invalid config value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required config field: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("{provider} API returned status {status}: {message}")]
    ProviderStatusError {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} API rate limit exceeded: {message}")]
    RateLimitError { provider: String, message: String },

    #[error("{provider} returned an unusable response: {details}")]
    MalformedResponseError { provider: String, details: String },

    #[error("Agent '{agent}' failed: {details}")]
    AgentError { agent: String, details: String },
}

/// 錯誤分類，用於日誌與統計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Credential,
    Provider,
    Processing,
    System,
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredentialError { .. } => ErrorCategory::Credential,
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::ApiError(_)
            | Self::ProviderStatusError { .. }
            | Self::RateLimitError { .. }
            | Self::MalformedResponseError { .. } => ErrorCategory::Provider,
            Self::SerializationError(_) | Self::AgentError { .. } => ErrorCategory::Processing,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingCredentialError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorSeverity::Critical,
            // 429 與網路層錯誤重試後通常可恢復
            Self::RateLimitError { .. } | Self::ApiError(_) => ErrorSeverity::Medium,
            Self::ProviderStatusError { .. }
            | Self::MalformedResponseError { .. }
            | Self::SerializationError(_)
            | Self::AgentError { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingCredentialError { env_var, .. } => {
                format!("Export {} before running the planner", env_var)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' and retry", field)
            }
            Self::MissingConfigError { field } => {
                format!("Add the missing field '{}' to your configuration", field)
            }
            Self::ConfigValidationError { .. } => {
                "Check the TOML config file against the documented schema".to_string()
            }
            Self::RateLimitError { provider, .. } => {
                format!(
                    "Wait a moment and retry, or lower usage of the {} API",
                    provider
                )
            }
            Self::ProviderStatusError { provider, .. } => {
                format!("Verify your {} account status and model name", provider)
            }
            Self::MalformedResponseError { .. } => {
                "Retry the run; if it persists, try a different model".to_string()
            }
            Self::ApiError(_) => "Check your network connection and retry".to_string(),
            Self::SerializationError(_) => "Inspect the model output saved in the logs".to_string(),
            Self::AgentError { agent, .. } => {
                format!(
                    "Re-run with --verbose to see what the '{}' agent received",
                    agent
                )
            }
            Self::IoError(_) => "Check file permissions and available disk space".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingCredentialError { provider, .. } => {
                format!("No API key configured for {}", provider)
            }
            Self::RateLimitError { provider, .. } => {
                format!("{} is rate limiting us right now", provider)
            }
            Self::ProviderStatusError {
                provider, status, ..
            } => {
                format!("{} rejected the request (HTTP {})", provider, status)
            }
            Self::MalformedResponseError { provider, .. } => {
                format!("{} returned a response we could not use", provider)
            }
            Self::AgentError { agent, .. } => {
                format!("The {} stage of the pipeline failed", agent)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
