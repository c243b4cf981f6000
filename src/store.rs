/// In-memory temperature store.
///
/// Holds every loaded observation in a sparse city → year → month → day
/// index. The store is built once from ingest output and is read-only
/// afterwards; all query methods take `&self`.
///
/// Ordered maps are used below the city level so that iteration order is
/// calendar order without any sorting at query time.

use std::collections::{BTreeMap, HashMap};

use crate::model::{ClimateError, Observation};

type DayMap = BTreeMap<u32, f64>;
type MonthMap = BTreeMap<u32, DayMap>;
type YearMap = BTreeMap<i32, MonthMap>;

// ---------------------------------------------------------------------------
// TemperatureStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TemperatureStore {
    data: HashMap<String, YearMap>,
    observations: usize,
}

impl TemperatureStore {
    /// Builds the store from parsed observations.
    ///
    /// A later observation for the same (city, year, month, day) replaces
    /// the earlier one.
    pub fn load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut data: HashMap<String, YearMap> = HashMap::new();
        for obs in records {
            data.entry(obs.city)
                .or_default()
                .entry(obs.year)
                .or_default()
                .entry(obs.month)
                .or_default()
                .insert(obs.day, obs.temperature);
        }

        let observations = data
            .values()
            .flat_map(|years| years.values())
            .flat_map(|months| months.values())
            .map(|days| days.len())
            .sum();

        Self { data, observations }
    }

    /// Returns the recorded daily temperatures for `city` in `year`, in
    /// calendar order. Missing days are skipped, not filled.
    ///
    /// Fails with `DataNotFound` if the city is unknown or has no data for
    /// that year.
    pub fn get_yearly_temperatures(&self, city: &str, year: i32) -> Result<Vec<f64>, ClimateError> {
        let months = self
            .data
            .get(city)
            .and_then(|years| years.get(&year))
            .ok_or_else(|| ClimateError::DataNotFound {
                city: city.to_string(),
                year,
            })?;

        Ok(months
            .range(1..=12)
            .flat_map(|(_, days)| days.range(1..=31).map(|(_, temp)| *temp))
            .collect())
    }

    /// Returns the temperature recorded for one city and date, or `None`
    /// if any level of the index (city, year, month, day) is missing.
    pub fn get_daily_temperature(&self, city: &str, month: u32, day: u32, year: i32) -> Option<f64> {
        self.data
            .get(city)?
            .get(&year)?
            .get(&month)?
            .get(&day)
            .copied()
    }

    /// City labels present in the store, sorted.
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = self.data.keys().map(String::as_str).collect();
        cities.sort_unstable();
        cities
    }

    /// Years with at least one observation for `city`, ascending.
    /// Empty if the city is unknown.
    pub fn years(&self, city: &str) -> Vec<i32> {
        self.data
            .get(city)
            .map(|years| years.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, city: &str, year: i32) -> bool {
        self.data
            .get(city)
            .map(|years| years.contains_key(&year))
            .unwrap_or(false)
    }

    /// Number of distinct (city, year, month, day) entries.
    pub fn len(&self) -> usize {
        self.observations
    }

    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
