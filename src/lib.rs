//! Climate trend analysis over multi-city daily temperature records.
//!
//! The crate loads daily observations into a [`store::TemperatureStore`],
//! derives yearly series from it ([`analysis::aggregate`]), and fits and
//! scores polynomial trend models ([`analysis::regression`]). The
//! [`pipeline`] module strings these together into the national trend study
//! run by the `climate_trends` binary.

pub mod analysis;
pub mod cities;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod store;
