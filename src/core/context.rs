use crate::domain::model::AgentResult;

/// Agent 執行上下文，用於在各階段間傳遞前面階段的輸出
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub execution_id: String,
    pub previous_results: Vec<AgentResult>,
}

impl AgentContext {
    pub fn new(execution_id: String) -> Self {
        Self {
            execution_id,
            previous_results: Vec::new(),
        }
    }

    /// 取得指定名稱的階段結果
    pub fn get_result_by_name(&self, name: &str) -> Option<&AgentResult> {
        self.previous_results
            .iter()
            .find(|result| result.agent_name == name)
    }

    pub fn add_result(&mut self, result: AgentResult) {
        self.previous_results.push(result);
    }
}
