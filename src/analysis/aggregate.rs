//! Derived sequences over the temperature store.
//!
//! Cross-city functions gather one yearly series per city and combine them
//! position by position, so every city must report the same set of days for
//! a given year. Unequal lengths are reported as `DimensionMismatch` rather
//! than truncated or padded.
//!
//! Output order always follows the order of the `years` argument.

use crate::model::ClimateError;
use crate::store::TemperatureStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n, not n - 1).
fn population_std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Collects each city's yearly series for `year`, checking they line up.
fn gather_year<S: AsRef<str>>(
    store: &TemperatureStore,
    cities: &[S],
    year: i32,
) -> Result<Vec<Vec<f64>>, ClimateError> {
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(cities.len());
    for city in cities {
        let city = city.as_ref();
        let series = store.get_yearly_temperatures(city, year)?;
        if let Some(first) = rows.first() {
            if first.len() != series.len() {
                return Err(ClimateError::DimensionMismatch {
                    year,
                    city: city.to_string(),
                    expected: first.len(),
                    actual: series.len(),
                });
            }
        }
        rows.push(series);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Cross-city aggregation
// ---------------------------------------------------------------------------

/// For each year, the mean of every daily value of every listed city pooled
/// together (one flat mean, not a mean of per-city means).
pub fn cross_city_yearly_average<S: AsRef<str>>(
    store: &TemperatureStore,
    cities: &[S],
    years: &[i32],
) -> Result<Vec<f64>, ClimateError> {
    if cities.is_empty() {
        return Err(ClimateError::NoCitiesSelected);
    }

    years
        .iter()
        .map(|&year| {
            let rows = gather_year(store, cities, year)?;
            let pooled: Vec<f64> = rows.into_iter().flatten().collect();
            if pooled.is_empty() {
                return Err(ClimateError::EmptySeries);
            }
            Ok(mean(&pooled))
        })
        .collect()
}

/// For each year, averages the cities day by day into one synthetic year,
/// then takes the population standard deviation across that year's days.
pub fn cross_city_yearly_stddev<S: AsRef<str>>(
    store: &TemperatureStore,
    cities: &[S],
    years: &[i32],
) -> Result<Vec<f64>, ClimateError> {
    if cities.is_empty() {
        return Err(ClimateError::NoCitiesSelected);
    }

    years
        .iter()
        .map(|&year| {
            let rows = gather_year(store, cities, year)?;
            let days = rows[0].len();
            if days == 0 {
                return Err(ClimateError::EmptySeries);
            }
            let daily_mean: Vec<f64> = (0..days)
                .map(|d| rows.iter().map(|row| row[d]).sum::<f64>() / rows.len() as f64)
                .collect();
            Ok(population_std_dev(&daily_mean))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Single-city series
// ---------------------------------------------------------------------------

/// Mean temperature of one city for each year.
pub fn city_yearly_means(
    store: &TemperatureStore,
    city: &str,
    years: &[i32],
) -> Result<Vec<f64>, ClimateError> {
    years
        .iter()
        .map(|&year| {
            let series = store.get_yearly_temperatures(city, year)?;
            if series.is_empty() {
                return Err(ClimateError::EmptySeries);
            }
            Ok(mean(&series))
        })
        .collect()
}

/// Temperature of one city on one calendar day, for each year.
///
/// A year without that exact observation is `DataNotFound`; the series is
/// meant for regression, which cannot take a hole.
pub fn daily_series(
    store: &TemperatureStore,
    city: &str,
    month: u32,
    day: u32,
    years: &[i32],
) -> Result<Vec<f64>, ClimateError> {
    years
        .iter()
        .map(|&year| {
            store
                .get_daily_temperature(city, month, day, year)
                .ok_or_else(|| ClimateError::DataNotFound {
                    city: city.to_string(),
                    year,
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Smoothing
// ---------------------------------------------------------------------------

/// Trailing moving average, same length as the input.
///
/// The first `window_length` outputs average everything seen so far
/// (`y[0..=i]`); after that each output averages exactly the last
/// `window_length` values. There is no look-ahead.
pub fn moving_average(values: &[f64], window_length: usize) -> Result<Vec<f64>, ClimateError> {
    if window_length == 0 {
        return Err(ClimateError::InvalidWindow(window_length));
    }

    Ok((0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window_length);
            mean(&values[start..=i])
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
