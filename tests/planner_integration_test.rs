use anyhow::Result;
use httpmock::prelude::*;
use trip_planner::agents::{PersonalizationAgent, PlanningAgent, ResearchAgent};
use trip_planner::config::credentials::ApiCredentials;
use trip_planner::core::orchestrator::write_itinerary;
use trip_planner::domain::model::{TravelStyle, TripRequest};
use trip_planner::domain::ports::CompletionParams;
use trip_planner::providers::{AnthropicClient, GeminiClient, OpenAiClient};
use trip_planner::utils::validation::Validate;
use trip_planner::{AgentSequence, Itinerary, LocalStorage};
use tempfile::TempDir;

fn sample_request() -> TripRequest {
    TripRequest {
        destination: "Kyoto".to_string(),
        budget_usd: 4000.0,
        days: 7,
        travelers: 2,
        style: TravelStyle::Balanced,
        preferences: vec!["temples".to_string(), "food".to_string()],
        must_visit: vec!["Fushimi Inari".to_string()],
        avoid: vec![],
    }
}

/// 三個 provider 全部 mock，跑完整序列
fn mocked_sequence(
    openai: &MockServer,
    anthropic: &MockServer,
    gemini: &MockServer,
) -> AgentSequence {
    let research_client = OpenAiClient::new("sk-test".to_string(), "gpt-4o".to_string())
        .with_base_url(openai.url(""));
    let planning_client = AnthropicClient::new(
        "sk-ant-test".to_string(),
        "claude-3-5-sonnet-20241022".to_string(),
    )
    .with_base_url(anthropic.url(""));
    let personalization_client =
        GeminiClient::new("AIza-test".to_string(), "gemini-2.5-flash".to_string())
            .with_base_url(gemini.url(""));

    let mut sequence = AgentSequence::new("trip_test".to_string());
    sequence.add_agent(Box::new(ResearchAgent::new(
        research_client,
        CompletionParams::default(),
    )));
    sequence.add_agent(Box::new(PlanningAgent::new(
        planning_client,
        CompletionParams::default(),
    )));
    sequence.add_agent(Box::new(PersonalizationAgent::new(
        personalization_client,
        CompletionParams::default(),
    )));
    sequence
}

#[tokio::test]
async fn test_full_pipeline_produces_itinerary() -> Result<()> {
    let openai = MockServer::start();
    let anthropic = MockServer::start();
    let gemini = MockServer::start();

    // research：五個子查詢加一次彙整
    let openai_mock = openai.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).json_body(serde_json::json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Kyoto research findings"}
            }]
        }));
    });

    // planning：草稿、動線最佳化、成本分析
    let anthropic_mock = anthropic.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200).json_body(serde_json::json!({
            "content": [{"type": "text", "text": "Day-by-day Kyoto plan"}]
        }));
    });

    // personalization：個人化加在地建議
    let gemini_mock = gemini.mock(|when, then| {
        when.method(POST)
            .path("/models/gemini-2.5-flash:generateContent");
        then.status(200).json_body(serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "Personalized Kyoto plan"}], "role": "model"}
            }]
        }));
    });

    let sequence = mocked_sequence(&openai, &anthropic, &gemini);
    let itinerary = sequence.run(&sample_request()).await?;

    openai_mock.assert_hits(6);
    anthropic_mock.assert_hits(3);
    gemini_mock.assert_hits(2);

    assert_eq!(itinerary.destination, "Kyoto");
    assert_eq!(
        itinerary.research_output["research_data"]["synthesis"],
        "Kyoto research findings"
    );
    assert_eq!(
        itinerary.planning_output["itinerary"]["optimized_itinerary"],
        "Day-by-day Kyoto plan"
    );
    assert_eq!(
        itinerary.personalization_output["personalized_itinerary"]["enhanced_itinerary"],
        "Personalized Kyoto plan"
    );

    // 三個階段各有計時，總和不超過整體耗時
    assert_eq!(itinerary.agent_times.len(), 3);
    let sum: f64 = itinerary.agent_times.values().sum();
    assert!(sum <= itinerary.total_processing_time);

    Ok(())
}

#[tokio::test]
async fn test_itinerary_file_round_trips() -> Result<()> {
    let openai = MockServer::start();
    let anthropic = MockServer::start();
    let gemini = MockServer::start();

    openai.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).json_body(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "research"}}]
        }));
    });
    anthropic.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200).json_body(serde_json::json!({
            "content": [{"type": "text", "text": "plan"}]
        }));
    });
    gemini.mock(|when, then| {
        when.method(POST)
            .path("/models/gemini-2.5-flash:generateContent");
        then.status(200).json_body(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "personalized"}], "role": "model"}}]
        }));
    });

    let sequence = mocked_sequence(&openai, &anthropic, &gemini);
    let itinerary = sequence.run(&sample_request()).await?;

    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
    write_itinerary(&storage, "kyoto.json", &itinerary).await?;

    let bytes = std::fs::read(temp_dir.path().join("kyoto.json"))?;
    let parsed: Itinerary = serde_json::from_slice(&bytes)?;

    assert_eq!(parsed.destination, itinerary.destination);
    assert_eq!(parsed.request.days, 7);
    assert_eq!(parsed.request.must_visit, vec!["Fushimi Inari"]);
    assert_eq!(parsed.agent_times, itinerary.agent_times);
    assert_eq!(parsed.total_processing_time, itinerary.total_processing_time);

    Ok(())
}

#[tokio::test]
async fn test_stage_failure_stops_pipeline() -> Result<()> {
    let openai = MockServer::start();
    let anthropic = MockServer::start();
    let gemini = MockServer::start();

    openai.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).json_body(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "research"}}]
        }));
    });
    // planning 的主要呼叫直接失敗
    anthropic.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(500).body("internal error");
    });
    let gemini_mock = gemini.mock(|when, then| {
        when.method(POST)
            .path("/models/gemini-2.5-flash:generateContent");
        then.status(200).json_body(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "unused"}], "role": "model"}}]
        }));
    });

    let sequence = mocked_sequence(&openai, &anthropic, &gemini);
    let err = sequence.run(&sample_request()).await.unwrap_err();

    match err {
        trip_planner::PlannerError::AgentError { agent, .. } => assert_eq!(agent, "planning"),
        other => panic!("unexpected error: {:?}", other),
    }
    // 後面的階段不會執行
    gemini_mock.assert_hits(0);

    Ok(())
}

#[tokio::test]
async fn test_missing_credential_fails_before_any_request() -> Result<()> {
    let server = MockServer::start();
    let catch_all = server.mock(|when, then| {
        when.path_contains("/");
        then.status(200);
    });

    let credentials = ApiCredentials {
        openai_api_key: "sk-test".to_string(),
        anthropic_api_key: String::new(),
        google_api_key: "AIza-test".to_string(),
    };

    let err = credentials.validate().unwrap_err();
    match err {
        trip_planner::PlannerError::MissingCredentialError { provider, env_var } => {
            assert_eq!(provider, "anthropic");
            assert_eq!(env_var, "ANTHROPIC_API_KEY");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // 憑證驗證失敗時不應發出任何網路請求
    catch_all.assert_hits(0);

    Ok(())
}
