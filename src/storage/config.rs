use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolYearConfig {
    pub early_release_start: NaiveDate,
    pub school_year_end: NaiveDate,
    pub special_diamond_days: BTreeSet<NaiveDate>,
}

impl SchoolYearConfig {
    pub fn is_diamond_day(&self, date: NaiveDate) -> bool {
        self.special_diamond_days.contains(&date)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("schoolcal")
            .join("config.toml")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .expect("Failed to serialize config");
        std::fs::write(&config_path, content)?;

        Ok(())
    }
}

impl Default for SchoolYearConfig {
    // The 2025-26 school year: Wednesday early release picks up on Sept 10,
    // diamonds on the staggered first days and the last day.
    fn default() -> Self {
        let day = |year, month, d| NaiveDate::from_ymd_opt(year, month, d).unwrap();

        Self {
            early_release_start: day(2025, 9, 10),
            school_year_end: day(2026, 6, 17),
            special_diamond_days: BTreeSet::from([
                day(2025, 9, 2),
                day(2025, 9, 5),
                day(2026, 6, 17),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn default_config_covers_2025_school_year() {
        let config = SchoolYearConfig::default();
        assert_eq!(config.early_release_start, date(2025, 9, 10));
        assert_eq!(config.school_year_end, date(2026, 6, 17));
    }

    #[test]
    fn default_config_has_three_diamond_days() {
        let config = SchoolYearConfig::default();
        assert_eq!(config.special_diamond_days.len(), 3);
        assert!(config.is_diamond_day(date(2025, 9, 2)));
        assert!(config.is_diamond_day(date(2025, 9, 5)));
        assert!(config.is_diamond_day(date(2026, 6, 17)));
        assert!(!config.is_diamond_day(date(2025, 9, 3)));
    }

    #[test]
    fn parse_valid_toml_config() {
        let toml_content = r#"
            early_release_start = "2024-09-11"
            school_year_end = "2025-06-18"
            special_diamond_days = ["2024-09-03", "2025-06-18"]
        "#;

        let config = SchoolYearConfig::from_toml(toml_content).unwrap();

        assert_eq!(config.early_release_start, date(2024, 9, 11));
        assert_eq!(config.school_year_end, date(2025, 6, 18));
        assert!(config.is_diamond_day(date(2024, 9, 3)));
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let invalid_toml = "this is not valid toml";
        let result = SchoolYearConfig::from_toml(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = SchoolYearConfig::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed = SchoolYearConfig::from_toml(&content).unwrap();
        assert_eq!(parsed, config);
    }
}
