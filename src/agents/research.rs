use crate::agents::{Agent, RESEARCH_AGENT};
use crate::core::context::AgentContext;
use crate::domain::model::TripRequest;
use crate::domain::ports::{CompletionParams, ModelClient};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::json;

/// 研究階段：向模型收集目的地情報並彙整成結構化摘要
///
/// 五個子查詢（天氣、活動、景點、住宿、交通）各自失敗時以
/// unavailable 標記降級，最後的彙整呼叫失敗則整個階段失敗。
pub struct ResearchAgent<M: ModelClient> {
    model: M,
    params: CompletionParams,
}

impl<M: ModelClient> ResearchAgent<M> {
    pub fn new(model: M, params: CompletionParams) -> Self {
        Self { model, params }
    }

    async fn query_section(&self, section: &str, prompt: String) -> serde_json::Value {
        match self.model.complete(&prompt, &self.params).await {
            Ok(text) => serde_json::Value::String(text),
            Err(e) => {
                tracing::warn!("⚠️ research: {} lookup failed: {}", section, e);
                serde_json::Value::String(format!("{} information unavailable", section))
            }
        }
    }

    fn weather_prompt(&self, request: &TripRequest) -> String {
        format!(
            "Provide current weather information and forecast for {} for the next {} days.\n\
             Include:\n\
             - Current season and typical weather patterns\n\
             - Temperature ranges\n\
             - Precipitation likelihood\n\
             - Best times to visit outdoor attractions\n\
             - Seasonal considerations for activities\n\n\
             Format as structured data.",
            request.destination, request.days
        )
    }

    fn events_prompt(&self, request: &TripRequest) -> String {
        format!(
            "Research current events, festivals, and seasonal activities in {}.\n\
             Focus on events happening in the next 30 days.\n\
             Include cultural festivals, local markets, seasonal activities,\n\
             special exhibitions or shows, and food festivals.\n\
             Provide specific dates when possible.",
            request.destination
        )
    }

    fn attractions_prompt(&self, request: &TripRequest) -> String {
        format!(
            "List the top 15-20 attractions and points of interest in {}.\n\
             For each attraction, provide:\n\
             - Name and brief description\n\
             - Approximate coordinates (lat, lng)\n\
             - Category (historical, natural, cultural, etc.)\n\
             - Typical visit duration and entry cost\n\
             - Best time to visit\n\n\
             Format as JSON array.",
            request.destination
        )
    }

    fn accommodation_prompt(&self, request: &TripRequest) -> String {
        format!(
            "Research accommodation options in {} for {} travelers.\n\
             Budget: ${:.0} per night\n\
             Duration: {} days\n\
             Style: {}\n\n\
             Provide recommendations for hotels in different price ranges,\n\
             guesthouses or B&Bs, and unique local accommodation options.\n\
             Include pricing, locations, and booking considerations.",
            request.destination,
            request.travelers,
            request.nightly_accommodation_budget(),
            request.days,
            request.style
        )
    }

    fn transport_prompt(&self, request: &TripRequest) -> String {
        format!(
            "Research transportation options in and around {} for {} days.\n\
             Consider airport transfers, public transportation, car rental\n\
             options and costs, inter-city transport, walking distances\n\
             between attractions, and local transport apps or services.\n\
             Provide practical advice for {} travelers with {} style.",
            request.destination, request.days, request.travelers, request.style
        )
    }

    fn synthesis_prompt(&self, request: &TripRequest, raw_data: &serde_json::Value) -> String {
        format!(
            "Synthesize the following travel research data for {}:\n\n\
             {}\n\n\
             Constraints: budget ${:.0}, {} days, {} travelers, {} style,\n\
             preferences: {}.\n\n\
             Provide a structured summary including:\n\
             1. Best areas to stay\n\
             2. Must-see attractions with priorities\n\
             3. Optimal transportation strategy\n\
             4. Seasonal considerations\n\
             5. Budget allocation recommendations\n\
             6. Potential challenges or considerations\n\
             7. Daily activity suggestions\n\n\
             Format as structured JSON.",
            request.destination,
            raw_data,
            request.budget_usd,
            request.days,
            request.travelers,
            request.style,
            request.preferences.join(", ")
        )
    }
}

#[async_trait]
impl<M: ModelClient> Agent for ResearchAgent<M> {
    fn name(&self) -> &str {
        RESEARCH_AGENT
    }

    async fn execute(
        &self,
        request: &TripRequest,
        _context: &AgentContext,
    ) -> Result<serde_json::Value> {
        tracing::info!(
            "🔍 research: gathering intelligence for {}",
            request.destination
        );

        let weather = self
            .query_section("weather", self.weather_prompt(request))
            .await;
        let events = self
            .query_section("events", self.events_prompt(request))
            .await;
        let attractions = self
            .query_section("attractions", self.attractions_prompt(request))
            .await;
        let accommodation = self
            .query_section("accommodation", self.accommodation_prompt(request))
            .await;
        let transport = self
            .query_section("transport", self.transport_prompt(request))
            .await;

        let raw_data = json!({
            "weather": weather,
            "events": events,
            "attractions": attractions,
            "accommodation": accommodation,
            "transport": transport,
        });

        // 彙整呼叫要求 JSON，溫度略高於子查詢
        let synthesis_params = CompletionParams {
            temperature: 0.2,
            force_json: true,
            ..self.params.clone()
        };
        let synthesis = self
            .model
            .complete(&self.synthesis_prompt(request, &raw_data), &synthesis_params)
            .await?;

        Ok(json!({
            "destination": request.destination,
            "research_data": {"synthesis": synthesis},
            "raw_data": raw_data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TravelStyle;
    use crate::utils::error::PlannerError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedModel {
        responses: Mutex<VecDeque<std::result::Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<std::result::Result<String, String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str, _params: &CompletionParams) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(details)) => Err(PlannerError::MalformedResponseError {
                    provider: "scripted".to_string(),
                    details,
                }),
                None => Err(PlannerError::MalformedResponseError {
                    provider: "scripted".to_string(),
                    details: "script exhausted".to_string(),
                }),
            }
        }
    }

    fn sample_request() -> TripRequest {
        TripRequest {
            destination: "Kyoto".to_string(),
            budget_usd: 4000.0,
            days: 7,
            travelers: 2,
            style: TravelStyle::Balanced,
            preferences: vec!["temples".to_string(), "food".to_string()],
            must_visit: vec![],
            avoid: vec![],
        }
    }

    #[tokio::test]
    async fn test_research_collects_all_sections() {
        let model = ScriptedModel::new(vec![
            Ok("mild autumn weather".to_string()),
            Ok("Jidai Matsuri festival".to_string()),
            Ok("[{\"name\": \"Fushimi Inari\"}]".to_string()),
            Ok("ryokan options".to_string()),
            Ok("JR pass advice".to_string()),
            Ok("{\"best_areas\": [\"Gion\"]}".to_string()),
        ]);
        let agent = ResearchAgent::new(model, CompletionParams::default());
        let context = AgentContext::new("test".to_string());

        let payload = agent.execute(&sample_request(), &context).await.unwrap();

        assert_eq!(payload["destination"], "Kyoto");
        assert_eq!(payload["raw_data"]["weather"], "mild autumn weather");
        assert_eq!(payload["raw_data"]["transport"], "JR pass advice");
        assert_eq!(
            payload["research_data"]["synthesis"],
            "{\"best_areas\": [\"Gion\"]}"
        );
    }

    #[tokio::test]
    async fn test_research_prompts_mention_trip_parameters() {
        let model = ScriptedModel::new(vec![
            Ok("w".to_string()),
            Ok("e".to_string()),
            Ok("a".to_string()),
            Ok("h".to_string()),
            Ok("t".to_string()),
            Ok("s".to_string()),
        ]);
        let agent = ResearchAgent::new(model, CompletionParams::default());
        let context = AgentContext::new("test".to_string());

        agent.execute(&sample_request(), &context).await.unwrap();

        let prompts = agent.model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 6);
        assert!(prompts[0].contains("Kyoto"));
        // 住宿子查詢帶每晚預算：4000 * 0.3 / 7 ≈ 171
        assert!(prompts[3].contains("$171"));
        assert!(prompts[5].contains("temples, food"));
    }

    #[tokio::test]
    async fn test_research_sub_query_failure_degrades() {
        let model = ScriptedModel::new(vec![
            Err("weather service down".to_string()),
            Ok("events".to_string()),
            Ok("attractions".to_string()),
            Ok("accommodation".to_string()),
            Ok("transport".to_string()),
            Ok("synthesis".to_string()),
        ]);
        let agent = ResearchAgent::new(model, CompletionParams::default());
        let context = AgentContext::new("test".to_string());

        let payload = agent.execute(&sample_request(), &context).await.unwrap();

        assert_eq!(
            payload["raw_data"]["weather"],
            "weather information unavailable"
        );
        assert_eq!(payload["raw_data"]["events"], "events");
    }

    #[tokio::test]
    async fn test_research_synthesis_failure_is_fatal() {
        let model = ScriptedModel::new(vec![
            Ok("w".to_string()),
            Ok("e".to_string()),
            Ok("a".to_string()),
            Ok("h".to_string()),
            Ok("t".to_string()),
            Err("model overloaded".to_string()),
        ]);
        let agent = ResearchAgent::new(model, CompletionParams::default());
        let context = AgentContext::new("test".to_string());

        let err = agent.execute(&sample_request(), &context).await.unwrap_err();
        assert!(matches!(err, PlannerError::MalformedResponseError { .. }));
    }
}
