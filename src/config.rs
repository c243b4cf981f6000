//! Driver configuration.
//!
//! Loaded from a TOML file. Every section except `[data]` is optional and
//! falls back to the defaults of the national trend study: all registry
//! cities, training years 1961-2009, testing years 2010-2015, a 5-year
//! moving average, and New York on January 10th as the single-city focus.
//!
//! ```toml
//! cities = ["BOSTON", "SEATTLE"]
//!
//! [data]
//! csv_path = "data.csv"
//!
//! [training]
//! start = 1961
//! end = 2009
//!
//! [analysis]
//! smoothed_degrees = [1, 2, 20]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::cities;
use crate::logging::LogLevel;
use crate::model::ClimateError;

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ClimateConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "cities::all_city_labels")]
    pub cities: Vec<String>,
    #[serde(default = "YearRange::default_training")]
    pub training: YearRange,
    #[serde(default = "YearRange::default_testing")]
    pub testing: YearRange,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub csv_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_path")]
    pub report_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
        }
    }
}

fn default_report_path() -> String {
    "climate_report.json".to_string()
}

/// Inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    fn default_training() -> Self {
        Self::new(1961, 2009)
    }

    fn default_testing() -> Self {
        Self::new(2010, 2015)
    }

    pub fn years(&self) -> Vec<i32> {
        (self.start..=self.end).collect()
    }

    /// The years as regression `x` values.
    pub fn as_x(&self) -> Vec<f64> {
        (self.start..=self.end).map(f64::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub focus_city: String,
    pub focus_month: u32,
    pub focus_day: u32,
    pub window: usize,
    pub trend_degrees: Vec<usize>,
    pub smoothed_degrees: Vec<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            focus_city: "NEW YORK".to_string(),
            focus_month: 1,
            focus_day: 10,
            window: 5,
            trend_degrees: vec![1],
            smoothed_degrees: vec![1, 2, 20],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
            timestamps: false,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl ClimateConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClimateError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ClimateError::ConfigError(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ClimateError> {
        let config: ClimateConfig =
            toml::from_str(text).map_err(|e| ClimateError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the analyses cannot run with.
    pub fn validate(&self) -> Result<(), ClimateError> {
        let fail = |msg: String| Err(ClimateError::ConfigError(msg));

        if self.data.csv_path.trim().is_empty() {
            return fail("data.csv_path must not be empty".to_string());
        }
        if self.cities.is_empty() {
            return fail("at least one city is required".to_string());
        }
        if self.training.is_empty() {
            return fail(format!(
                "training range {}-{} is empty",
                self.training.start, self.training.end
            ));
        }
        if self.testing.is_empty() {
            return fail(format!(
                "testing range {}-{} is empty",
                self.testing.start, self.testing.end
            ));
        }

        let a = &self.analysis;
        if a.window == 0 {
            return fail("analysis.window must be at least 1".to_string());
        }
        if a.trend_degrees.is_empty() || a.smoothed_degrees.is_empty() {
            return fail("degree lists must not be empty".to_string());
        }
        if !(1..=12).contains(&a.focus_month) {
            return fail(format!("analysis.focus_month {} is not 1-12", a.focus_month));
        }
        if !(1..=31).contains(&a.focus_day) {
            return fail(format!("analysis.focus_day {} is not 1-31", a.focus_day));
        }
        if a.focus_city.is_empty() {
            return fail("analysis.focus_city must not be empty".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
