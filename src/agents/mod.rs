pub mod personalization;
pub mod planning;
pub mod research;

use crate::core::context::AgentContext;
use crate::domain::model::TripRequest;
use crate::utils::error::Result;
use async_trait::async_trait;

pub const RESEARCH_AGENT: &str = "research";
pub const PLANNING_AGENT: &str = "planning";
pub const PERSONALIZATION_AGENT: &str = "personalization";

/// 行程規劃 agent 介面，orchestrator 依序執行並計時
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// 執行單一階段，輸出交給 orchestrator 放入上下文
    async fn execute(
        &self,
        request: &TripRequest,
        context: &AgentContext,
    ) -> Result<serde_json::Value>;
}

pub use personalization::PersonalizationAgent;
pub use planning::PlanningAgent;
pub use research::ResearchAgent;
