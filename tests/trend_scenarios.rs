/// Integration tests for the store, aggregation and regression layers
///
/// Tests verify:
/// 1. CSV ingest → store round trip, including header lookup by name
/// 2. Yearly series ordering and sparse-day handling
/// 3. The end-to-end scenarios for cross-city averages, moving averages
///    and linear fits
///
/// Run with: cargo test --test trend_scenarios

use approx::{assert_abs_diff_eq, assert_relative_eq};
use climate_trends::analysis::aggregate::{cross_city_yearly_average, cross_city_yearly_stddev, moving_average};
use climate_trends::analysis::regression::{evaluate, fit, r_squared, rmse};
use climate_trends::ingest::csv_records::{load_store, read_observations};
use climate_trends::model::ClimateError;
use climate_trends::store::TemperatureStore;
use std::io::Write;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const BOSTON_CSV: &str = "\
CITY,TEMP,DATE
BOSTON,30,20000101
BOSTON,32,20000102
BOSTON,34,20000103
BOSTON,40,20010101
BOSTON,42,20010102
BOSTON,44,20010103
";

fn boston_store() -> TemperatureStore {
    let observations = read_observations(BOSTON_CSV.as_bytes()).expect("fixture CSV should parse");
    TemperatureStore::load(observations)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[test]
fn test_load_store_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", BOSTON_CSV).unwrap();

    let store = load_store(file.path()).expect("temp CSV should load");
    assert_eq!(store.len(), 6);
    assert_eq!(store.cities(), vec!["BOSTON"]);
    assert_eq!(store.years("BOSTON"), vec![2000, 2001]);
}

#[test]
fn test_load_store_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_store(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, ClimateError::IoError(_)));
}

#[test]
fn test_yearly_length_equals_distinct_days_in_calendar_order() {
    // Out-of-order rows, a duplicate day, and a gap in February.
    let csv = "\
DATE,CITY,TEMP
20050301,PHOENIX,70
20050101,PHOENIX,50
20050215,PHOENIX,60
20050101,PHOENIX,52
20051231,PHOENIX,55
";
    let store = TemperatureStore::load(read_observations(csv.as_bytes()).unwrap());
    let series = store.get_yearly_temperatures("PHOENIX", 2005).unwrap();
    assert_eq!(series, vec![52.0, 60.0, 70.0, 55.0]);
}

#[test]
fn test_daily_lookup_never_fails_for_absent_keys() {
    let store = boston_store();
    for (city, month, day, year) in [
        ("BOSTON", 1, 1, 2000),
        ("BOSTON", 1, 4, 2000),
        ("BOSTON", 12, 31, 2001),
        ("BOSTON", 1, 1, 1999),
        ("SEATTLE", 1, 1, 2000),
    ] {
        let expected = if (month, day, year) == (1, 1, 2000) && city == "BOSTON" {
            Some(30.0)
        } else {
            None
        };
        assert_eq!(store.get_daily_temperature(city, month, day, year), expected);
    }
}

// ---------------------------------------------------------------------------
// Aggregation scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_single_city_average_scenario() {
    let store = boston_store();
    let avg = cross_city_yearly_average(&store, &["BOSTON"], &[2000, 2001]).unwrap();
    assert_eq!(avg, vec![32.0, 42.0]);
}

#[test]
fn test_single_city_stddev() {
    let store = boston_store();
    let sd = cross_city_yearly_stddev(&store, &["BOSTON"], &[2000, 2001]).unwrap();
    let expected = (8.0_f64 / 3.0).sqrt();
    assert_relative_eq!(sd[0], expected, epsilon = 1e-12);
    assert_relative_eq!(sd[1], expected, epsilon = 1e-12);
}

#[test]
fn test_aggregation_with_missing_city_propagates_data_not_found() {
    let store = boston_store();
    let err = cross_city_yearly_average(&store, &["BOSTON", "CHICAGO"], &[2000]).unwrap_err();
    assert_eq!(
        err,
        ClimateError::DataNotFound {
            city: "CHICAGO".to_string(),
            year: 2000
        }
    );
}

#[test]
fn test_moving_average_scenario() {
    let ma = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
    assert_eq!(ma, vec![1.0, 1.5, 2.0, 3.0, 4.0]);
}

#[test]
fn test_moving_average_full_window_property() {
    let y: Vec<f64> = (0..20).map(|i| ((i * 7) % 11) as f64).collect();
    let w = 4;
    let ma = moving_average(&y, w).unwrap();
    assert_eq!(ma.len(), y.len());
    assert_eq!(ma[0], y[0]);
    for i in w..y.len() {
        let window_mean = y[i + 1 - w..=i].iter().sum::<f64>() / w as f64;
        assert_relative_eq!(ma[i], window_mean, epsilon = 1e-12);
    }
}

// ---------------------------------------------------------------------------
// Regression scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_linear_fit_scenario() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let y = [2.0, 4.0, 6.0, 8.0];
    let models = fit(&x, &y, &[1]).unwrap();
    let c = models[0].coefficients();
    assert_relative_eq!(c[0], 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(c[1], 0.0, epsilon = 1e-9);

    let estimated = evaluate(&models[0], &x);
    assert_relative_eq!(r_squared(&y, &estimated).unwrap(), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rmse(&y, &estimated).unwrap(), 0.0, epsilon = 1e-9);
}

#[test]
fn test_degree_zero_model_is_constant_mean() {
    let x: Vec<f64> = (1961..=1970).map(f64::from).collect();
    let y = [50.1, 49.8, 51.2, 50.0, 50.5, 49.9, 51.0, 50.3, 50.7, 50.6];
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let models = fit(&x, &y, &[0]).unwrap();
    assert_eq!(models[0].degree(), 0);
    for v in evaluate(&models[0], &x) {
        assert_relative_eq!(v, mean, epsilon = 1e-10);
    }
}

#[test]
fn test_higher_degree_never_fits_worse_on_training_data() {
    let x: Vec<f64> = (1961..=2009).map(f64::from).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|v| 50.0 + 0.02 * (v - 1961.0) + ((v * 1.3).sin()))
        .collect();
    let models = fit(&x, &y, &[1, 2]).unwrap();
    let r2_linear = r_squared(&y, &evaluate(&models[0], &x)).unwrap();
    let r2_quadratic = r_squared(&y, &evaluate(&models[1], &x)).unwrap();
    assert!(r2_quadratic >= r2_linear - 1e-9, "{} < {}", r2_quadratic, r2_linear);
}

#[test]
fn test_r_squared_on_constant_data_is_degenerate() {
    let y = [42.0; 5];
    assert_eq!(r_squared(&y, &y), Err(ClimateError::DegenerateVariance));
    assert_eq!(rmse(&y, &y), Ok(0.0));
}
