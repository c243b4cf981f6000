/// Core data types for the climate trend analysis service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no logic beyond polynomial evaluation.

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single recorded daily temperature for one city.
///
/// Corresponds to one row of the source CSV (`DATE`, `CITY`, `TEMP`), with
/// the 8-digit `DATE` already split into year, month and day.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub city: String,
    pub year: i32,
    pub month: u32, // 1-12
    pub day: u32,   // 1-31
    pub temperature: f64,
}

impl Observation {
    pub fn new(city: impl Into<String>, year: i32, month: u32, day: u32, temperature: f64) -> Self {
        Self {
            city: city.into(),
            year,
            month,
            day,
            temperature,
        }
    }
}

// ---------------------------------------------------------------------------
// Model types
// ---------------------------------------------------------------------------

/// A fitted polynomial, coefficients ordered highest degree first.
///
/// A degree-`d` model always carries `d + 1` coefficients, so
/// `[2.0, 0.5]` is `y = 2x + 0.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialModel {
    coefficients: Vec<f64>,
}

impl PolynomialModel {
    /// Wraps a highest-degree-first coefficient list.
    /// An empty list is treated as the constant zero polynomial.
    pub fn from_coefficients(coefficients: Vec<f64>) -> Self {
        if coefficients.is_empty() {
            return Self { coefficients: vec![0.0] };
        }
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation at a single point.
    pub fn value_at(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, c| acc * x + c)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while loading, aggregating or modelling
/// temperature data.
#[derive(Debug, Clone, PartialEq)]
pub enum ClimateError {
    /// The store has no data for this city, or none for this year.
    DataNotFound { city: String, year: i32 },
    /// Cities' yearly series for one year have different lengths, so they
    /// cannot be averaged day by day.
    DimensionMismatch {
        year: i32,
        city: String,
        expected: usize,
        actual: usize,
    },
    /// Fewer points than `degree + 1` were supplied to a polynomial fit.
    InsufficientData {
        degree: usize,
        required: usize,
        actual: usize,
    },
    /// R² requested on values with zero total variance.
    DegenerateVariance,
    /// Paired sequences (x/y, actual/estimated) differ in length.
    LengthMismatch { left: usize, right: usize },
    /// A metric was requested over zero points.
    EmptySeries,
    /// Moving average window must be at least one.
    InvalidWindow(usize),
    /// An aggregation was asked to combine zero cities.
    NoCitiesSelected,
    /// The least-squares solver could not produce a solution
    /// (e.g. non-finite inputs).
    SolverFailure(String),
    /// A CSV row or date field could not be parsed.
    ParseError(String),
    /// The configuration file is missing, malformed, or inconsistent.
    ConfigError(String),
    /// Reading input or writing output failed.
    IoError(String),
}

impl std::fmt::Display for ClimateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClimateError::DataNotFound { city, year } => {
                write!(f, "Data not available for {} in {}", city, year)
            }
            ClimateError::DimensionMismatch {
                year,
                city,
                expected,
                actual,
            } => write!(
                f,
                "Dimension mismatch in {}: {} has {} days, expected {}",
                year, city, actual, expected
            ),
            ClimateError::InsufficientData {
                degree,
                required,
                actual,
            } => write!(
                f,
                "Insufficient data for degree {} fit: need {} points, got {}",
                degree, required, actual
            ),
            ClimateError::DegenerateVariance => {
                write!(f, "Degenerate variance: all observed values are equal")
            }
            ClimateError::LengthMismatch { left, right } => {
                write!(f, "Length mismatch: {} vs {}", left, right)
            }
            ClimateError::EmptySeries => write!(f, "Empty series"),
            ClimateError::InvalidWindow(w) => write!(f, "Invalid moving average window: {}", w),
            ClimateError::NoCitiesSelected => write!(f, "No cities selected"),
            ClimateError::SolverFailure(msg) => write!(f, "Solver failure: {}", msg),
            ClimateError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ClimateError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            ClimateError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ClimateError {}

impl From<std::io::Error> for ClimateError {
    fn from(err: std::io::Error) -> Self {
        ClimateError::IoError(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
