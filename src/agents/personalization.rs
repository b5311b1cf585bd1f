use crate::agents::{Agent, PERSONALIZATION_AGENT, PLANNING_AGENT, RESEARCH_AGENT};
use crate::core::context::AgentContext;
use crate::domain::model::TripRequest;
use crate::domain::ports::{CompletionParams, ModelClient};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use serde_json::json;

/// 個人化階段：依偏好調整行程並補充在地建議
///
/// 個人化呼叫失敗則階段失敗；補充建議呼叫失敗時降級，
/// 保留已個人化的行程。
pub struct PersonalizationAgent<M: ModelClient> {
    model: M,
    params: CompletionParams,
}

impl<M: ModelClient> PersonalizationAgent<M> {
    pub fn new(model: M, params: CompletionParams) -> Self {
        Self { model, params }
    }

    fn personalize_prompt(
        &self,
        request: &TripRequest,
        itinerary: &serde_json::Value,
        research_data: &serde_json::Value,
    ) -> String {
        let must_visit = if request.must_visit.is_empty() {
            "None specified".to_string()
        } else {
            request.must_visit.join(", ")
        };
        let avoid = if request.avoid.is_empty() {
            "None specified".to_string()
        } else {
            request.avoid.join(", ")
        };

        format!(
            "Personalize this travel itinerary based on user preferences:\n\n\
             ITINERARY:\n{}\n\n\
             USER PROFILE:\n\
             - Preferences: {}\n\
             - Travel style: {}\n\
             - Group size: {}\n\
             - Must visit: {}\n\
             - Avoid: {}\n\n\
             RESEARCH CONTEXT:\n{}\n\n\
             Personalize by replacing generic recommendations with specific\n\
             ones matching preferences, adjusting activity types and intensity\n\
             based on travel style, adding local experiences that match\n\
             interests, suggesting restaurants and food experiences, and\n\
             including cultural immersion opportunities.\n\n\
             Keep the same JSON structure but enhance with personalized details.",
            itinerary,
            request.preferences.join(", "),
            request.style,
            request.travelers,
            must_visit,
            avoid,
            research_data
        )
    }

    fn recommendations_prompt(&self, personalized: &str) -> String {
        format!(
            "Enhance this personalized itinerary with contextual recommendations:\n\n\
             {}\n\n\
             Add local etiquette and cultural tips, helpful language phrases,\n\
             tipping customs and payment methods, safety considerations,\n\
             packing suggestions specific to activities, alternative options\n\
             for bad weather, local apps or services to download, and\n\
             emergency contacts.\n\n\
             Format as enhanced JSON with additional context fields.",
            personalized
        )
    }

    fn personalization_notes(&self, request: &TripRequest) -> Vec<String> {
        let top_preferences: Vec<&str> = request
            .preferences
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();

        vec![
            format!("Itinerary personalized for {} travel style", request.style),
            format!("Optimized for {} travelers", request.travelers),
            format!("Focused on preferences: {}", top_preferences.join(", ")),
            "Alternative options provided for weather contingencies".to_string(),
        ]
    }
}

#[async_trait]
impl<M: ModelClient> Agent for PersonalizationAgent<M> {
    fn name(&self) -> &str {
        PERSONALIZATION_AGENT
    }

    async fn execute(
        &self,
        request: &TripRequest,
        context: &AgentContext,
    ) -> Result<serde_json::Value> {
        let plan =
            context
                .get_result_by_name(PLANNING_AGENT)
                .ok_or_else(|| PlannerError::AgentError {
                    agent: PERSONALIZATION_AGENT.to_string(),
                    details: "no planning output in context".to_string(),
                })?;
        let itinerary = plan
            .payload
            .get("itinerary")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        let research_data = context
            .get_result_by_name(RESEARCH_AGENT)
            .and_then(|result| result.payload.get("research_data").cloned())
            .unwrap_or(serde_json::Value::Null);

        tracing::info!(
            "🎨 personalization: tailoring itinerary for {} style",
            request.style
        );

        let personalized = self
            .model
            .complete(
                &self.personalize_prompt(request, &itinerary, &research_data),
                &self.params,
            )
            .await?;

        let enhanced = match self
            .model
            .complete(&self.recommendations_prompt(&personalized), &self.params)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "⚠️ personalization: contextual recommendations failed, keeping base version: {}",
                    e
                );
                personalized.clone()
            }
        };

        Ok(json!({
            "personalized_itinerary": {"enhanced_itinerary": enhanced},
            "personalization_notes": self.personalization_notes(request),
        }))
    }
}
