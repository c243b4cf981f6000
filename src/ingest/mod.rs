/// Data ingestion for the climate trend service.
///
/// Submodules:
/// - `csv_records`: reads the daily temperature CSV into `Observation`s.

pub mod csv_records;
