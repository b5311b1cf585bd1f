pub mod cli;
pub mod credentials;
pub mod planner_config;

#[cfg(feature = "cli")]
use crate::domain::model::{TravelStyle, TripRequest};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_amount, validate_positive_number,
    Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "trip-planner")]
#[command(about = "Plan a multi-day travel itinerary with hosted language models")]
pub struct CliConfig {
    /// 目的地城市或地區
    #[arg(long)]
    pub destination: String,

    /// 總預算（美元）
    #[arg(long)]
    pub budget: f64,

    /// 旅行天數
    #[arg(long)]
    pub days: u32,

    #[arg(long, default_value = "2")]
    pub travelers: u32,

    #[arg(long, value_enum, default_value = "balanced")]
    pub style: TravelStyle,

    #[arg(long, value_delimiter = ',', default_value = "culture,food")]
    pub preferences: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub must_visit: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub avoid: Vec<String>,

    #[arg(long, default_value = "itinerary.json")]
    pub output: String,

    /// 模型調校 TOML 檔路徑
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log system resource usage during the run")]
    pub monitor: bool,

    #[arg(long, help = "Show the execution plan without calling any API")]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn trip_request(&self) -> TripRequest {
        TripRequest {
            destination: self.destination.clone(),
            budget_usd: self.budget,
            days: self.days,
            travelers: self.travelers,
            style: self.style,
            preferences: self.preferences.clone(),
            must_visit: self.must_visit.clone(),
            avoid: self.avoid.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("destination", &self.destination)?;
        validate_positive_amount("budget", self.budget)?;
        validate_positive_number("days", self.days, 1)?;
        validate_positive_number("travelers", self.travelers, 1)?;
        validate_path("output", &self.output)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        let mut full = vec!["trip-planner"];
        full.extend_from_slice(args);
        CliConfig::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_minimal_args_with_defaults() {
        let config = parse(&["--destination", "Tokyo", "--budget", "3000", "--days", "5"]);

        assert_eq!(config.destination, "Tokyo");
        assert_eq!(config.travelers, 2);
        assert_eq!(config.style, TravelStyle::Balanced);
        assert_eq!(config.preferences, vec!["culture", "food"]);
        assert_eq!(config.output, "itinerary.json");
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_list_flags_split_on_commas() {
        let config = parse(&[
            "--destination",
            "Rome",
            "--budget",
            "2500",
            "--days",
            "4",
            "--preferences",
            "history,art",
            "--must-visit",
            "Colosseum,Pantheon",
            "--avoid",
            "tourist traps",
        ]);

        assert_eq!(config.preferences, vec!["history", "art"]);
        assert_eq!(config.must_visit, vec!["Colosseum", "Pantheon"]);
        assert_eq!(config.avoid, vec!["tourist traps"]);
    }

    #[test]
    fn test_trip_request_conversion() {
        let config = parse(&[
            "--destination",
            "Tokyo",
            "--budget",
            "3000",
            "--days",
            "5",
            "--style",
            "luxury",
        ]);

        let request = config.trip_request();
        assert_eq!(request.destination, "Tokyo");
        assert_eq!(request.budget_usd, 3000.0);
        assert_eq!(request.style, TravelStyle::Luxury);
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let zero_days = parse(&["--destination", "Tokyo", "--budget", "3000", "--days", "0"]);
        assert!(zero_days.validate().is_err());

        let negative_budget =
            parse(&["--destination", "Tokyo", "--budget=-100", "--days", "5"]);
        assert!(negative_budget.validate().is_err());

        let blank_destination = parse(&["--destination", " ", "--budget", "3000", "--days", "5"]);
        assert!(blank_destination.validate().is_err());
    }
}
