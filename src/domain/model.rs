use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// 旅行風格，影響預算分配與活動強度
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Budget,
    Balanced,
    Luxury,
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TravelStyle::Budget => "budget",
            TravelStyle::Balanced => "balanced",
            TravelStyle::Luxury => "luxury",
        };
        write!(f, "{}", s)
    }
}

/// 使用者輸入的旅行需求，建立後不再變動
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    pub budget_usd: f64,
    pub days: u32,
    pub travelers: u32,
    pub style: TravelStyle,
    pub preferences: Vec<String>,
    #[serde(default)]
    pub must_visit: Vec<String>,
    #[serde(default)]
    pub avoid: Vec<String>,
}

impl TripRequest {
    /// 住宿預算：總預算的三成除以天數
    pub fn nightly_accommodation_budget(&self) -> f64 {
        self.budget_usd * 0.3 / self.days as f64
    }
}

/// 單一 agent 階段的輸出與耗時
#[derive(Debug, Clone)]
pub struct AgentResult {
    pub agent_name: String,
    pub payload: serde_json::Value,
    pub duration: Duration,
}

/// 合併後的最終行程文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub destination: String,
    pub request: TripRequest,
    pub research_output: serde_json::Value,
    pub planning_output: serde_json::Value,
    pub personalization_output: serde_json::Value,
    pub total_processing_time: f64,
    pub agent_times: HashMap<String, f64>,
    pub generated_at: DateTime<Utc>,
}

impl Itinerary {
    pub fn to_pretty_json(&self) -> crate::utils::error::Result<Vec<u8>> {
        let json = serde_json::to_vec_pretty(self)?;
        Ok(json)
    }
}
