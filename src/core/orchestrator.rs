use crate::agents::{Agent, PERSONALIZATION_AGENT, PLANNING_AGENT, RESEARCH_AGENT};
use crate::core::context::AgentContext;
use crate::domain::model::{AgentResult, Itinerary, TripRequest};
use crate::domain::ports::Storage;
use crate::utils::error::{PlannerError, Result};
use crate::utils::monitor::SystemMonitor;
use std::time::{Duration, Instant};

/// Agent 序列，依序執行各階段並計時，最後合併成行程文件
pub struct AgentSequence {
    agents: Vec<Box<dyn Agent>>,
    monitor: Option<SystemMonitor>,
    execution_id: String,
}

impl AgentSequence {
    pub fn new(execution_id: String) -> Self {
        Self {
            agents: Vec::new(),
            monitor: None,
            execution_id,
        }
    }

    /// 啟用或禁用系統監控
    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        if enabled {
            self.monitor = Some(SystemMonitor::new(true));
        }
        self
    }

    pub fn add_agent(&mut self, agent: Box<dyn Agent>) {
        self.agents.push(agent);
    }

    /// 各階段名稱，--dry-run 顯示執行計劃用
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|agent| agent.name()).collect()
    }

    /// 執行所有 agent 並合併結果
    pub async fn run(&self, request: &TripRequest) -> Result<Itinerary> {
        let run_start = Instant::now();
        let mut context = AgentContext::new(self.execution_id.clone());

        if let Some(monitor) = &self.monitor {
            monitor.log_stats("Trip planning started");
        }

        for agent in &self.agents {
            let stage_start = Instant::now();
            tracing::info!("🧭 Running agent: {}", agent.name());

            let payload = agent
                .execute(request, &context)
                .await
                .map_err(|e| match e {
                    err @ PlannerError::AgentError { .. } => err,
                    other => PlannerError::AgentError {
                        agent: agent.name().to_string(),
                        details: other.to_string(),
                    },
                })?;

            let duration = stage_start.elapsed();
            tracing::info!(
                "✅ Agent completed: {} (duration: {:?})",
                agent.name(),
                duration
            );
            if let Some(monitor) = &self.monitor {
                monitor.log_stats(agent.name());
            }

            context.add_result(AgentResult {
                agent_name: agent.name().to_string(),
                payload,
                duration,
            });
        }

        let itinerary = merge_results(request, &context, run_start.elapsed())?;

        if let Some(monitor) = &self.monitor {
            monitor.log_final_stats();
        }
        tracing::info!(
            "🏁 Trip planning completed in {:.2}s",
            itinerary.total_processing_time
        );

        Ok(itinerary)
    }
}

/// 把上下文中的階段結果合併為最終行程文件
///
/// total 涵蓋整個執行過程，因此各階段耗時總和不會超過它
fn merge_results(
    request: &TripRequest,
    context: &AgentContext,
    total: Duration,
) -> Result<Itinerary> {
    let output_of = |name: &str| -> Result<serde_json::Value> {
        context
            .get_result_by_name(name)
            .map(|result| result.payload.clone())
            .ok_or_else(|| PlannerError::AgentError {
                agent: name.to_string(),
                details: "no result recorded for stage".to_string(),
            })
    };

    let agent_times = context
        .previous_results
        .iter()
        .map(|result| (result.agent_name.clone(), result.duration.as_secs_f64()))
        .collect();

    Ok(Itinerary {
        destination: request.destination.clone(),
        request: request.clone(),
        research_output: output_of(RESEARCH_AGENT)?,
        planning_output: output_of(PLANNING_AGENT)?,
        personalization_output: output_of(PERSONALIZATION_AGENT)?,
        total_processing_time: total.as_secs_f64(),
        agent_times,
        generated_at: chrono::Utc::now(),
    })
}

/// 序列化行程並透過 storage 寫出
pub async fn write_itinerary<S: Storage>(
    storage: &S,
    file_name: &str,
    itinerary: &Itinerary,
) -> Result<()> {
    let data = itinerary.to_pretty_json()?;
    tracing::debug!("💾 Writing itinerary ({} bytes) to {}", data.len(), file_name);
    storage.write_file(file_name, &data).await?;
    Ok(())
}
