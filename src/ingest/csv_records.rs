/// Daily temperature CSV reader.
///
/// Input is a header row naming at least `DATE` (YYYYMMDD), `CITY` and
/// `TEMP`, followed by one observation per row. Columns are located by
/// header name, so their order and any additional columns do not matter.
///
/// Parsing is strict: the first malformed row aborts the read with a
/// `ParseError` naming the line.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::model::{ClimateError, Observation};
use crate::store::TemperatureStore;

pub const DATE_FIELD: &str = "DATE";
pub const CITY_FIELD: &str = "CITY";
pub const TEMP_FIELD: &str = "TEMP";

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Positions of the required fields within a CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    date: usize,
    city: usize,
    temp: usize,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, ClimateError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ClimateError::ParseError(format!("missing '{}' column in header", name)))
    };

    Ok(Columns {
        date: find(DATE_FIELD)?,
        city: find(CITY_FIELD)?,
        temp: find(TEMP_FIELD)?,
    })
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Splits an 8-digit `YYYYMMDD` date into (year, month, day).
///
/// Rejects anything that is not exactly eight ASCII digits or that names a
/// day the calendar does not have (e.g. `20010230`).
pub fn parse_date(raw: &str) -> Result<(i32, u32, u32), ClimateError> {
    if raw.len() != 8 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClimateError::ParseError(format!(
            "date '{}' is not an 8-digit YYYYMMDD value",
            raw
        )));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map_err(|e| ClimateError::ParseError(format!("date '{}': {}", raw, e)))?;

    Ok((date.year(), date.month(), date.day()))
}

fn parse_row(record: &csv::StringRecord, cols: Columns, line: usize) -> Result<Observation, ClimateError> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .ok_or_else(|| ClimateError::ParseError(format!("line {}: missing {} field", line, name)))
    };

    let (year, month, day) = parse_date(field(cols.date, DATE_FIELD)?)
        .map_err(|e| ClimateError::ParseError(format!("line {}: {}", line, e)))?;

    let city = field(cols.city, CITY_FIELD)?;
    if city.is_empty() {
        return Err(ClimateError::ParseError(format!("line {}: empty city", line)));
    }

    let raw_temp = field(cols.temp, TEMP_FIELD)?;
    let temperature: f64 = raw_temp.parse().map_err(|_| {
        ClimateError::ParseError(format!("line {}: temperature '{}' is not numeric", line, raw_temp))
    })?;

    Ok(Observation::new(city, year, month, day, temperature))
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Reads every observation from a CSV source.
pub fn read_observations<R: Read>(source: R) -> Result<Vec<Observation>, ClimateError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| ClimateError::ParseError(format!("failed to read CSV header: {}", e)))?
        .clone();
    let cols = resolve_columns(&headers)?;

    let mut observations = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, CSV lines are 1-based
        let line = idx + 2;
        let record = result.map_err(|e| ClimateError::ParseError(format!("line {}: {}", line, e)))?;
        observations.push(parse_row(&record, cols, line)?);
    }

    Ok(observations)
}

/// Reads a CSV file and builds a `TemperatureStore` from it.
pub fn load_store(path: impl AsRef<Path>) -> Result<TemperatureStore, ClimateError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ClimateError::IoError(format!("failed to open '{}': {}", path.display(), e)))?;
    let observations = read_observations(file)?;
    Ok(TemperatureStore::load(observations))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
