pub mod anthropic;
pub mod gemini;
pub mod openai;

pub use anthropic::{AnthropicClient, DEFAULT_ANTHROPIC_MODEL};
pub use gemini::{DEFAULT_GEMINI_MODEL, GeminiClient};
pub use openai::{DEFAULT_OPENAI_MODEL, OpenAiClient};
