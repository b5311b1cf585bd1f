use clap::Parser;
use trip_planner::agents::{
    PersonalizationAgent, PlanningAgent, ResearchAgent, PERSONALIZATION_AGENT, PLANNING_AGENT,
    RESEARCH_AGENT,
};
use trip_planner::config::credentials::ApiCredentials;
use trip_planner::core::orchestrator::write_itinerary;
use trip_planner::providers::{
    AnthropicClient, GeminiClient, OpenAiClient, DEFAULT_ANTHROPIC_MODEL, DEFAULT_GEMINI_MODEL,
    DEFAULT_OPENAI_MODEL,
};
use trip_planner::utils::error::ErrorSeverity;
use trip_planner::utils::{logger, validation::Validate};
use trip_planner::{AgentSequence, CliConfig, LocalStorage, PlannerConfig, PlannerError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("🌍 Starting trip-planner for {}", config.destination);
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 載入模型調校檔（未指定則全用預設值）
    let tuning = match &config.config {
        Some(path) => match PlannerConfig::from_file(path).and_then(|c| {
            c.validate()?;
            Ok(c)
        }) {
            Ok(c) => c,
            Err(e) => fail(e),
        },
        None => PlannerConfig::default(),
    };

    let research_model = tuning
        .agents
        .research
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
    let planning_model = tuning
        .agents
        .planning
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string());
    let personalization_model = tuning
        .agents
        .personalization
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

    if config.dry_run {
        println!(
            "Execution plan for {} ({} days, ${:.0}):",
            config.destination, config.days, config.budget
        );
        println!("  1. {:<16} openai     {}", RESEARCH_AGENT, research_model);
        println!("  2. {:<16} anthropic  {}", PLANNING_AGENT, planning_model);
        println!(
            "  3. {:<16} gemini     {}",
            PERSONALIZATION_AGENT, personalization_model
        );
        println!("No API calls made (--dry-run).");
        return Ok(());
    }

    // 憑證缺漏要在任何網路呼叫之前失敗
    let credentials = match ApiCredentials::from_env() {
        Ok(c) => c,
        Err(e) => fail(e),
    };

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let mut research_client =
        OpenAiClient::new(credentials.openai_api_key.clone(), research_model);
    if let Some(base_url) = tuning.agents.research.base_url.clone() {
        research_client = research_client.with_base_url(base_url);
    }
    if let Some(timeout) = tuning.agents.research.timeout() {
        research_client = research_client.with_timeout(timeout);
    }

    let mut planning_client =
        AnthropicClient::new(credentials.anthropic_api_key.clone(), planning_model);
    if let Some(base_url) = tuning.agents.planning.base_url.clone() {
        planning_client = planning_client.with_base_url(base_url);
    }
    if let Some(timeout) = tuning.agents.planning.timeout() {
        planning_client = planning_client.with_timeout(timeout);
    }

    let mut personalization_client =
        GeminiClient::new(credentials.google_api_key.clone(), personalization_model);
    if let Some(base_url) = tuning.agents.personalization.base_url.clone() {
        personalization_client = personalization_client.with_base_url(base_url);
    }
    if let Some(timeout) = tuning.agents.personalization.timeout() {
        personalization_client = personalization_client.with_timeout(timeout);
    }

    let execution_id = format!("trip_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
    let mut sequence = AgentSequence::new(execution_id).with_monitoring(config.monitor);
    sequence.add_agent(Box::new(ResearchAgent::new(
        research_client,
        tuning.agents.research.completion_params(),
    )));
    sequence.add_agent(Box::new(PlanningAgent::new(
        planning_client,
        tuning.agents.planning.completion_params(),
    )));
    sequence.add_agent(Box::new(PersonalizationAgent::new(
        personalization_client,
        tuning.agents.personalization.completion_params(),
    )));

    let request = config.trip_request();

    match sequence.run(&request).await {
        Ok(itinerary) => {
            let output_path = std::path::Path::new(&config.output);
            let base = output_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_else(|| ".".to_string());
            let file_name = output_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "itinerary.json".to_string());

            let storage = LocalStorage::new(base);
            if let Err(e) = write_itinerary(&storage, &file_name, &itinerary).await {
                fail(e);
            }

            tracing::info!("✅ Trip planning completed successfully!");
            println!(
                "✅ Itinerary ready for {} ({} days, ${:.0}, {} style)",
                itinerary.destination, request.days, request.budget_usd, request.style
            );
            for agent_name in [RESEARCH_AGENT, PLANNING_AGENT, PERSONALIZATION_AGENT] {
                if let Some(seconds) = itinerary.agent_times.get(agent_name) {
                    println!("   {:<16} {:>6.2}s", agent_name, seconds);
                }
            }
            println!("   {:<16} {:>6.2}s", "total", itinerary.total_processing_time);
            println!("📁 Output saved to: {}", config.output);
        }
        Err(e) => fail(e),
    }

    Ok(())
}

/// 記錄錯誤並依嚴重程度決定退出碼
fn fail(e: PlannerError) -> ! {
    tracing::error!(
        "❌ Trip planning failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
