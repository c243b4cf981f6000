/// Numeric analysis for the climate trend service.
///
/// Everything here is a pure function over a loaded `TemperatureStore` or
/// plain `f64` slices; nothing logs, caches, or touches the filesystem.
///
/// Submodules:
/// - `aggregate`: cross-city yearly averages and spreads, moving averages.
/// - `regression`: polynomial least-squares fits and their R² / RMSE.

pub mod aggregate;
pub mod regression;
