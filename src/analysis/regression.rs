//! Polynomial trend models.
//!
//! ## Fitting
//!
//! Each degree is an ordinary least-squares fit over the Vandermonde matrix
//! (highest power first). Columns are scaled to unit norm before solving,
//! which keeps year-valued `x` (≈2000) usable at moderate degrees, and the
//! coefficients are unscaled afterwards. The system is solved with an SVD,
//! discarding singular values below `n * EPSILON` relative to the largest,
//! so rank-deficient fits yield the minimum-norm solution instead of an error.
//!
//! ## Evaluation
//!
//! * `r_squared` measures fit quality on the data the model was trained on.
//! * `rmse` measures error against held-out data.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::model::{ClimateError, PolynomialModel};

const SVD_MAX_ITERATIONS: usize = 10_000;

// ============================================================================
// Fitting
// ============================================================================

/// Fits one least-squares polynomial per requested degree, in the order given.
///
/// Every degree needs at least `degree + 1` points.
pub fn fit(x: &[f64], y: &[f64], degrees: &[usize]) -> Result<Vec<PolynomialModel>, ClimateError> {
    if x.len() != y.len() {
        return Err(ClimateError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    degrees.iter().map(|&degree| fit_degree(x, y, degree)).collect()
}

fn fit_degree(x: &[f64], y: &[f64], degree: usize) -> Result<PolynomialModel, ClimateError> {
    let n = x.len();
    let n_coeffs = degree + 1;
    if n < n_coeffs {
        return Err(ClimateError::InsufficientData {
            degree,
            required: n_coeffs,
            actual: n,
        });
    }

    let mut design = DMatrix::from_fn(n, n_coeffs, |i, j| x[i].powi((degree - j) as i32));

    let scales: Vec<f64> = design
        .column_iter()
        .map(|col| {
            let norm = col.norm();
            if norm > 0.0 && norm.is_finite() { norm } else { 1.0 }
        })
        .collect();
    for (j, scale) in scales.iter().enumerate() {
        design.column_mut(j).unscale_mut(*scale);
    }

    let rhs = DVector::from_column_slice(y);

    let svd = design
        .try_svd(true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or_else(|| ClimateError::SolverFailure(format!("SVD did not converge for degree {}", degree)))?;

    let cutoff = n as f64 * f64::EPSILON * svd.singular_values.max();
    let solution = svd
        .solve(&rhs, cutoff)
        .map_err(|e| ClimateError::SolverFailure(e.to_string()))?;

    let coefficients: Vec<f64> = solution
        .iter()
        .zip(scales.iter())
        .map(|(c, scale)| c / scale)
        .collect();

    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(ClimateError::SolverFailure(format!(
            "non-finite coefficients for degree {}",
            degree
        )));
    }

    Ok(PolynomialModel::from_coefficients(coefficients))
}

/// Evaluates `model` at every point of `x`.
pub fn evaluate(model: &PolynomialModel, x: &[f64]) -> Vec<f64> {
    x.iter().map(|&xi| model.value_at(xi)).collect()
}

// ============================================================================
// Goodness of fit
// ============================================================================

fn check_paired(y: &[f64], estimated: &[f64]) -> Result<(), ClimateError> {
    if y.len() != estimated.len() {
        return Err(ClimateError::LengthMismatch {
            left: y.len(),
            right: estimated.len(),
        });
    }
    if y.is_empty() {
        return Err(ClimateError::EmptySeries);
    }
    Ok(())
}

fn sum_squared_residuals(y: &[f64], estimated: &[f64]) -> f64 {
    y.iter()
        .zip(estimated.iter())
        .map(|(a, f)| (a - f).powi(2))
        .sum()
}

/// Coefficient of determination: `1 - SS_res / SS_tot`.
///
/// Returns `DegenerateVariance` when the total sum of squares vanishes,
/// i.e. is no larger than rounding noise on `sum(y^2)`.
pub fn r_squared(y: &[f64], estimated: &[f64]) -> Result<f64, ClimateError> {
    check_paired(y, estimated)?;

    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let scale: f64 = y.iter().map(|v| v * v).sum();
    if ss_tot <= f64::EPSILON * scale {
        return Err(ClimateError::DegenerateVariance);
    }

    Ok(1.0 - sum_squared_residuals(y, estimated) / ss_tot)
}

/// Root-mean-square error: `sqrt(SS_res / n)`.
pub fn rmse(y: &[f64], estimated: &[f64]) -> Result<f64, ClimateError> {
    check_paired(y, estimated)?;
    Ok((sum_squared_residuals(y, estimated) / y.len() as f64).sqrt())
}

// ============================================================================
// Model evaluation
// ============================================================================

/// One model's predictions over a data set, with its score.
///
/// Exactly one of `r_squared` (training) or `rmse` (testing) is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEvaluation {
    pub degree: usize,
    pub coefficients: Vec<f64>,
    pub estimates: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rmse: Option<f64>,
}

impl ModelEvaluation {
    fn new(model: &PolynomialModel, estimates: Vec<f64>) -> Self {
        Self {
            degree: model.degree(),
            coefficients: model.coefficients().to_vec(),
            estimates,
            r_squared: None,
            rmse: None,
        }
    }
}

/// Scores each model against the data it was fitted on, using R².
pub fn evaluate_on_training(
    x: &[f64],
    y: &[f64],
    models: &[PolynomialModel],
) -> Result<Vec<ModelEvaluation>, ClimateError> {
    models
        .iter()
        .map(|model| {
            let estimates = evaluate(model, x);
            let score = r_squared(y, &estimates)?;
            let mut eval = ModelEvaluation::new(model, estimates);
            eval.r_squared = Some(score);
            Ok(eval)
        })
        .collect()
}

/// Scores each model against held-out data, using RMSE.
pub fn evaluate_on_testing(
    x: &[f64],
    y: &[f64],
    models: &[PolynomialModel],
) -> Result<Vec<ModelEvaluation>, ClimateError> {
    models
        .iter()
        .map(|model| {
            let estimates = evaluate(model, x);
            let score = rmse(y, &estimates)?;
            let mut eval = ModelEvaluation::new(model, estimates);
            eval.rmse = Some(score);
            Ok(eval)
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_linear_fit_recovers_slope_and_intercept() {
        let models = fit(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0], &[1]).unwrap();
        let c = models[0].coefficients();
        assert_eq!(c.len(), 2);
        assert_relative_eq!(c[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degree_zero_fit_is_the_mean() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 5.0, 2.0, 8.0];
        let models = fit(&x, &y, &[0]).unwrap();
        for v in evaluate(&models[0], &x) {
            assert_relative_eq!(v, 4.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_quadratic_fit_is_exact_on_quadratic_data() {
        let x: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v * v - 2.0 * v + 1.0).collect();
        let models = fit(&x, &y, &[2]).unwrap();
        let c = models[0].coefficients();
        assert_relative_eq!(c[0], 3.0, epsilon = 1e-8);
        assert_relative_eq!(c[1], -2.0, epsilon = 1e-8);
        assert_relative_eq!(c[2], 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_fit_on_year_valued_x() {
        let x: Vec<f64> = (1961..=2009).map(|y| y as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.02 * v + 10.0).collect();
        let models = fit(&x, &y, &[1]).unwrap();
        let estimates = evaluate(&models[0], &x);
        for (e, a) in estimates.iter().zip(y.iter()) {
            assert_relative_eq!(*e, *a, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_one_model_per_degree_in_requested_order() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 5.0, 4.0];
        let models = fit(&x, &y, &[2, 0, 1]).unwrap();
        let degrees: Vec<usize> = models.iter().map(|m| m.degree()).collect();
        assert_eq!(degrees, vec![2, 0, 1]);
    }

    #[test]
    fn test_insufficient_points_for_degree() {
        let err = fit(&[1.0, 2.0], &[1.0, 2.0], &[1, 2]).unwrap_err();
        assert_eq!(
            err,
            ClimateError::InsufficientData {
                degree: 2,
                required: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_mismatched_xy_lengths() {
        assert!(matches!(
            fit(&[1.0, 2.0, 3.0], &[1.0, 2.0], &[1]),
            Err(ClimateError::LengthMismatch { left: 3, right: 2 })
        ));
    }

    #[test]
    fn test_r_squared_of_perfect_estimate_is_one() {
        let y = [1.0, 4.0, 2.0, 9.0];
        assert_relative_eq!(r_squared(&y, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_r_squared_of_mean_estimate_is_zero() {
        let y = [1.0, 2.0, 3.0];
        assert_abs_diff_eq!(r_squared(&y, &[2.0, 2.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_r_squared_constant_y_is_degenerate() {
        let y = [0.1, 0.1, 0.1];
        assert_eq!(r_squared(&y, &[0.0, 0.0, 0.0]), Err(ClimateError::DegenerateVariance));
        assert_eq!(r_squared(&[2.0, 2.0], &[1.0, 3.0]), Err(ClimateError::DegenerateVariance));
        assert_eq!(r_squared(&[0.0, 0.0], &[0.0, 0.0]), Err(ClimateError::DegenerateVariance));
    }

    #[test]
    fn test_r_squared_small_spread_around_large_mean_is_scored() {
        let y = [50.0, 50.5, 51.0];
        let r2 = r_squared(&y, &y).unwrap();
        assert_eq!(r2, 1.0);
    }

    #[test]
    fn test_rmse() {
        assert_eq!(rmse(&[1.0, 2.0], &[1.0, 2.0]).unwrap(), 0.0);
        // residuals 3 and 4 → sqrt((9 + 16) / 2)
        assert_relative_eq!(rmse(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 12.5_f64.sqrt());
    }

    #[test]
    fn test_metrics_reject_empty_and_mismatched_input() {
        assert_eq!(rmse(&[], &[]), Err(ClimateError::EmptySeries));
        assert_eq!(r_squared(&[], &[]), Err(ClimateError::EmptySeries));
        assert!(matches!(rmse(&[1.0], &[]), Err(ClimateError::LengthMismatch { .. })));
    }

    #[test]
    fn test_training_and_testing_evaluations_carry_one_score() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let models = fit(&x, &y, &[1]).unwrap();

        let train = evaluate_on_training(&x, &y, &models).unwrap();
        assert_eq!(train[0].degree, 1);
        assert!(train[0].rmse.is_none());
        assert_relative_eq!(train[0].r_squared.unwrap(), 1.0, epsilon = 1e-9);

        let test = evaluate_on_testing(&[5.0, 6.0], &[10.0, 13.0], &models).unwrap();
        assert!(test[0].r_squared.is_none());
        // predictions 10 and 12 → sqrt((0 + 1) / 2)
        assert_relative_eq!(test[0].rmse.unwrap(), 0.5_f64.sqrt(), epsilon = 1e-9);
    }
}
