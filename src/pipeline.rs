//! Trend study driver.
//!
//! Runs the five experiments of the national temperature trend study over a
//! loaded store and collects them into a `RunReport`:
//!
//! 1. `daily_trend`            focus city, focus calendar day, each training year
//! 2. `annual_mean_trend`      focus city, mean of each training year
//! 3. `national_average_trend` all cities pooled, each training year
//! 4. `moving_average_trend`   moving average of (3), fitted with the smoothed
//!    degrees, then scored on the testing years' moving average
//! 5. `extreme_variation_trend` moving average of the cross-city daily spread
//!
//! An experiment that fails is logged and recorded; the others still run.

use crate::analysis::aggregate;
use crate::analysis::regression::{self, evaluate_on_testing, evaluate_on_training};
use crate::cities::find_city;
use crate::config::ClimateConfig;
use crate::logging::{self, Component};
use crate::model::{ClimateError, PolynomialModel};
use crate::report::{ExperimentReport, RunReport, TestingReport};
use crate::store::TemperatureStore;

pub const DAILY_TREND: &str = "daily_trend";
pub const ANNUAL_MEAN_TREND: &str = "annual_mean_trend";
pub const NATIONAL_AVERAGE_TREND: &str = "national_average_trend";
pub const MOVING_AVERAGE_TREND: &str = "moving_average_trend";
pub const EXTREME_VARIATION_TREND: &str = "extreme_variation_trend";

// ---------------------------------------------------------------------------
// Shared fitting step
// ---------------------------------------------------------------------------

fn fit_experiment(
    name: &str,
    title: String,
    x: Vec<f64>,
    y: Vec<f64>,
    degrees: &[usize],
) -> Result<(ExperimentReport, Vec<PolynomialModel>), ClimateError> {
    let models = regression::fit(&x, &y, degrees)?;
    let training = evaluate_on_training(&x, &y, &models)?;

    for eval in &training {
        logging::debug(
            Component::Analysis,
            None,
            &format!(
                "{}: degree {} R^2 = {:.4}",
                name,
                eval.degree,
                eval.r_squared.unwrap_or(f64::NAN)
            ),
        );
    }

    let report = ExperimentReport {
        name: name.to_string(),
        title,
        x,
        y,
        training,
        testing: None,
    };
    Ok((report, models))
}

// ---------------------------------------------------------------------------
// Experiments
// ---------------------------------------------------------------------------

pub fn daily_trend(store: &TemperatureStore, config: &ClimateConfig) -> Result<ExperimentReport, ClimateError> {
    let a = &config.analysis;
    let years = config.training.years();
    let y = aggregate::daily_series(store, &a.focus_city, a.focus_month, a.focus_day, &years)?;
    let title = format!(
        "{}: {}/{} temperature ({}-{})",
        a.focus_city, a.focus_month, a.focus_day, config.training.start, config.training.end
    );
    fit_experiment(DAILY_TREND, title, config.training.as_x(), y, &a.trend_degrees).map(|(r, _)| r)
}

pub fn annual_mean_trend(
    store: &TemperatureStore,
    config: &ClimateConfig,
) -> Result<ExperimentReport, ClimateError> {
    let a = &config.analysis;
    let y = aggregate::city_yearly_means(store, &a.focus_city, &config.training.years())?;
    let title = format!(
        "{}: average temperature ({}-{})",
        a.focus_city, config.training.start, config.training.end
    );
    fit_experiment(ANNUAL_MEAN_TREND, title, config.training.as_x(), y, &a.trend_degrees).map(|(r, _)| r)
}

pub fn national_average_trend(
    store: &TemperatureStore,
    config: &ClimateConfig,
) -> Result<ExperimentReport, ClimateError> {
    let y = aggregate::cross_city_yearly_average(store, &config.cities, &config.training.years())?;
    let title = format!(
        "All cities yearly average ({}-{})",
        config.training.start, config.training.end
    );
    fit_experiment(
        NATIONAL_AVERAGE_TREND,
        title,
        config.training.as_x(),
        y,
        &config.analysis.trend_degrees,
    )
    .map(|(r, _)| r)
}

pub fn moving_average_trend(
    store: &TemperatureStore,
    config: &ClimateConfig,
) -> Result<ExperimentReport, ClimateError> {
    let window = config.analysis.window;

    let national = aggregate::cross_city_yearly_average(store, &config.cities, &config.training.years())?;
    let smoothed = aggregate::moving_average(&national, window)?;
    let title = format!(
        "All cities: {}-year moving average ({}-{})",
        window, config.training.start, config.training.end
    );
    let (mut report, models) = fit_experiment(
        MOVING_AVERAGE_TREND,
        title,
        config.training.as_x(),
        smoothed,
        &config.analysis.smoothed_degrees,
    )?;

    let national_test = aggregate::cross_city_yearly_average(store, &config.cities, &config.testing.years())?;
    let smoothed_test = aggregate::moving_average(&national_test, window)?;
    let x_test = config.testing.as_x();
    let evaluations = evaluate_on_testing(&x_test, &smoothed_test, &models)?;

    for eval in &evaluations {
        logging::debug(
            Component::Analysis,
            None,
            &format!(
                "{}: degree {} RMSE on {}-{} = {:.4}",
                MOVING_AVERAGE_TREND,
                eval.degree,
                config.testing.start,
                config.testing.end,
                eval.rmse.unwrap_or(f64::NAN)
            ),
        );
    }

    report.testing = Some(TestingReport {
        x: x_test,
        y: smoothed_test,
        evaluations,
    });
    Ok(report)
}

pub fn extreme_variation_trend(
    store: &TemperatureStore,
    config: &ClimateConfig,
) -> Result<ExperimentReport, ClimateError> {
    let spread = aggregate::cross_city_yearly_stddev(store, &config.cities, &config.training.years())?;
    let smoothed = aggregate::moving_average(&spread, config.analysis.window)?;
    let title = format!(
        "Extreme temperature variation trend ({}-{})",
        config.training.start, config.training.end
    );
    fit_experiment(
        EXTREME_VARIATION_TREND,
        title,
        config.training.as_x(),
        smoothed,
        &config.analysis.trend_degrees,
    )
    .map(|(r, _)| r)
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

type Experiment = fn(&TemperatureStore, &ClimateConfig) -> Result<ExperimentReport, ClimateError>;

const EXPERIMENTS: &[(&str, Experiment)] = &[
    (DAILY_TREND, daily_trend),
    (ANNUAL_MEAN_TREND, annual_mean_trend),
    (NATIONAL_AVERAGE_TREND, national_average_trend),
    (MOVING_AVERAGE_TREND, moving_average_trend),
    (EXTREME_VARIATION_TREND, extreme_variation_trend),
];

/// Years in `years` for which the store holds nothing for `city`.
pub fn missing_years(store: &TemperatureStore, city: &str, years: &[i32]) -> Vec<i32> {
    years.iter().copied().filter(|&year| !store.contains(city, year)).collect()
}

/// Logs roster context for each configured city and warns about any
/// training or testing year the store does not cover.
fn check_city_coverage(store: &TemperatureStore, config: &ClimateConfig) {
    let unknown = crate::cities::unknown_cities(&config.cities);
    for city in &unknown {
        logging::warn(Component::Pipeline, Some(city.as_str()), "city is not in the default roster");
    }

    let mut years = config.training.years();
    years.extend(config.testing.years());

    for city in &config.cities {
        if let Some(entry) = find_city(city) {
            logging::debug(
                Component::Store,
                Some(city.as_str()),
                &format!("{} ({} climate), {} years loaded", entry.region, entry.climate, store.years(city).len()),
            );
        }

        let missing = missing_years(store, city, &years);
        if !missing.is_empty() {
            logging::warn(
                Component::Store,
                Some(city.as_str()),
                &format!("no data for {} of {} analysed years (first: {})", missing.len(), years.len(), missing[0]),
            );
        }
    }
}

/// Runs every experiment against `store` and returns the collected report.
pub fn run(store: &TemperatureStore, config: &ClimateConfig) -> RunReport {
    check_city_coverage(store, config);

    let mut report = RunReport::new(&config.data.csv_path, store.len(), &config.cities);

    for (name, experiment) in EXPERIMENTS {
        logging::info(Component::Pipeline, None, &format!("Running {}", name));
        let outcome = experiment(store, config);
        if let Err(err) = &outcome {
            logging::log_experiment_failure(name, err);
        }
        report.record(name, outcome);
    }

    logging::log_run_summary(report.summary.total, report.summary.successful, report.summary.failed);
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
