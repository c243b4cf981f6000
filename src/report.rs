//! Run report
//!
//! Serializable record of one driver run: which data set was analysed, the
//! series each experiment fitted, every model with its score, and the
//! experiments that could not run. Written as pretty-printed JSON.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::regression::ModelEvaluation;
use crate::model::ClimateError;

// ============================================================================
// Report Structures
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub data_path: String,
    pub observations: usize,
    pub cities: Vec<String>,
    pub experiments: Vec<ExperimentReport>,
    pub failures: Vec<ExperimentFailure>,
    pub summary: RunSummary,
}

/// One fitted series: the `x`/`y` it was fitted on plus the training
/// evaluation of each model, and optionally the same models scored on
/// held-out years.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub name: String,
    pub title: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub training: Vec<ModelEvaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testing: Option<TestingReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestingReport {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub evaluations: Vec<ModelEvaluation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperimentFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

// ============================================================================
// Construction and output
// ============================================================================

impl RunReport {
    pub fn new(data_path: &str, observations: usize, cities: &[String]) -> Self {
        Self {
            generated_at: Utc::now(),
            data_path: data_path.to_string(),
            observations,
            cities: cities.to_vec(),
            experiments: Vec::new(),
            failures: Vec::new(),
            summary: RunSummary {
                total: 0,
                successful: 0,
                failed: 0,
            },
        }
    }

    /// Records an experiment outcome and keeps the summary in step.
    pub fn record(&mut self, name: &str, outcome: Result<ExperimentReport, ClimateError>) {
        self.summary.total += 1;
        match outcome {
            Ok(experiment) => {
                self.summary.successful += 1;
                self.experiments.push(experiment);
            }
            Err(err) => {
                self.summary.failed += 1;
                self.failures.push(ExperimentFailure {
                    name: name.to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    pub fn experiment(&self, name: &str) -> Option<&ExperimentReport> {
        self.experiments.iter().find(|e| e.name == name)
    }

    pub fn to_json(&self) -> Result<String, ClimateError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ClimateError::IoError(format!("failed to serialize report: {}", e)))
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ClimateError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| {
            ClimateError::IoError(format!("failed to write '{}': {}", path.display(), e))
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_experiment(name: &str) -> ExperimentReport {
        ExperimentReport {
            name: name.to_string(),
            title: "Sample".to_string(),
            x: vec![2000.0, 2001.0],
            y: vec![50.0, 51.0],
            training: vec![ModelEvaluation {
                degree: 1,
                coefficients: vec![1.0, -1950.0],
                estimates: vec![50.0, 51.0],
                r_squared: Some(1.0),
                rmse: None,
            }],
            testing: None,
        }
    }

    #[test]
    fn test_record_updates_summary() {
        let mut report = RunReport::new("data.csv", 10, &["BOSTON".to_string()]);
        report.record("ok", Ok(sample_experiment("ok")));
        report.record("bad", Err(ClimateError::DegenerateVariance));

        assert_eq!(
            report.summary,
            RunSummary {
                total: 2,
                successful: 1,
                failed: 1
            }
        );
        assert!(report.experiment("ok").is_some());
        assert!(report.experiment("bad").is_none());
        assert_eq!(report.failures[0].name, "bad");
    }

    #[test]
    fn test_json_omits_absent_scores_and_testing() {
        let mut report = RunReport::new("data.csv", 2, &[]);
        report.record("ok", Ok(sample_experiment("ok")));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        let experiment = &json["experiments"][0];
        assert_eq!(experiment["name"], "ok");
        assert!(experiment.get("testing").is_none());
        assert_eq!(experiment["training"][0]["r_squared"], 1.0);
        assert!(experiment["training"][0].get("rmse").is_none());
        assert_eq!(json["summary"]["successful"], 1);
    }
}
