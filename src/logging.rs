/// Structured logging for the climate trend service
///
/// Provides context-rich logging with component and city identifiers,
/// timestamps, and severity levels. Supports both console output
/// and file-based logging for long analysis runs.

use chrono::Utc;
use serde::Deserialize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::ClimateError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Ingest,
    Store,
    Analysis,
    Pipeline,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Ingest => write!(f, "INGEST"),
            Component::Store => write!(f, "STORE"),
            Component::Analysis => write!(f, "ANALYSIS"),
            Component::Pipeline => write!(f, "PIPELINE"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the selected city/year range is not covered by the data
    Expected,
    /// Unexpected failure - bad input file, configuration, or I/O
    Unexpected,
    /// Unknown - numeric trouble that may or may not be a data problem
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut guard) = LOGGER.lock() {
            *guard = Some(logger);
        }
    }

    fn format_entry(level: LogLevel, component: &Component, city: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let city_part = city.map(|c| format!(" [{}]", c)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, component, city_part, message)
    }

    fn log(&self, level: LogLevel, component: &Component, city: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, component, city, message);
        let city_part = city.map(|c| format!(" [{}]", c)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, city_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, city_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, component: Component, city: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &component, city, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, city: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, component, city, message);
}

/// Log a warning message
pub fn warn(component: Component, city: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, component, city, message);
}

/// Log an error message
pub fn error(component: Component, city: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, component, city, message);
}

/// Log a debug message
pub fn debug(component: Component, city: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, component, city, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an analysis failure by error kind
pub fn classify_failure(err: &ClimateError) -> FailureType {
    match err {
        // The data set simply does not cover what was asked for
        ClimateError::DataNotFound { .. } | ClimateError::DimensionMismatch { .. } => {
            FailureType::Expected
        }
        ClimateError::ParseError(_) | ClimateError::ConfigError(_) | ClimateError::IoError(_) => {
            FailureType::Unexpected
        }
        _ => FailureType::Unknown,
    }
}

/// City named by the error, if any
fn error_city(err: &ClimateError) -> Option<&str> {
    match err {
        ClimateError::DataNotFound { city, .. } | ClimateError::DimensionMismatch { city, .. } => {
            Some(city.as_str())
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a failed experiment with automatic classification
pub fn log_experiment_failure(experiment: &str, err: &ClimateError) {
    let failure_type = classify_failure(err);
    let message = format!("{} failed [{}]: {}", experiment, failure_type, err);
    let city = error_city(err);

    match failure_type {
        FailureType::Expected => warn(Component::Pipeline, city, &message),
        FailureType::Unexpected => error(Component::Pipeline, city, &message),
        FailureType::Unknown => warn(Component::Pipeline, city, &message),
    }
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of the experiments in a run
pub fn log_run_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Run complete: {}/{} experiments successful, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(Component::Pipeline, None, &message);
    } else if successful == 0 {
        error(Component::Pipeline, None, &message);
    } else {
        warn(Component::Pipeline, None, &message);
    }
}
