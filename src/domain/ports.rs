use crate::utils::error::Result;
use async_trait::async_trait;

/// 單次模型呼叫的參數
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
    /// 要求模型回傳 JSON（僅部分 provider 支援）
    pub force_json: bool,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 4000,
            force_json: false,
        }
    }
}

/// 對外部托管模型的單次 prompt/response 交換
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn complete(&self, prompt: &str, params: &CompletionParams) -> Result<String>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
