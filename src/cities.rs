/// Default city roster for the climate trend service.
///
/// Lists the cities present in the bundled daily temperature data set, with
/// a little context about each. The driver uses this roster when the
/// configuration does not name its own cities. Labels are upper-case and
/// must match the `CITY` column exactly; store lookups are case-sensitive.

// ---------------------------------------------------------------------------
// City metadata
// ---------------------------------------------------------------------------

/// Metadata for a single city in the data set.
pub struct City {
    /// Label as it appears in the `CITY` column.
    pub label: &'static str,
    /// Two-letter state or territory code.
    pub region: &'static str,
    /// Broad climate description, for report readers.
    pub climate: &'static str,
}

/// All cities in the national data set, in the order the source data set
/// lists them. Cross-city aggregates over this roster are the "national"
/// figures in the run report.
pub static CITY_REGISTRY: &[City] = &[
    City {
        label: "BOSTON",
        region: "MA",
        climate: "humid continental",
    },
    City {
        label: "SEATTLE",
        region: "WA",
        climate: "marine west coast",
    },
    City {
        label: "SAN DIEGO",
        region: "CA",
        climate: "semi-arid mediterranean",
    },
    City {
        label: "PHILADELPHIA",
        region: "PA",
        climate: "humid subtropical",
    },
    City {
        label: "PHOENIX",
        region: "AZ",
        climate: "hot desert",
    },
    City {
        label: "LAS VEGAS",
        region: "NV",
        climate: "hot desert",
    },
    City {
        label: "CHARLOTTE",
        region: "NC",
        climate: "humid subtropical",
    },
    City {
        label: "DALLAS",
        region: "TX",
        climate: "humid subtropical",
    },
    City {
        label: "BALTIMORE",
        region: "MD",
        climate: "humid subtropical",
    },
    City {
        label: "SAN JUAN",
        region: "PR",
        climate: "tropical monsoon",
    },
    City {
        label: "LOS ANGELES",
        region: "CA",
        climate: "mediterranean",
    },
    City {
        label: "MIAMI",
        region: "FL",
        climate: "tropical monsoon",
    },
    City {
        label: "NEW ORLEANS",
        region: "LA",
        climate: "humid subtropical",
    },
    City {
        label: "ALBUQUERQUE",
        region: "NM",
        climate: "cold semi-arid",
    },
    City {
        label: "PORTLAND",
        region: "OR",
        climate: "warm-summer mediterranean",
    },
    City {
        label: "SAN FRANCISCO",
        region: "CA",
        climate: "cool-summer mediterranean",
    },
    City {
        label: "TAMPA",
        region: "FL",
        climate: "humid subtropical",
    },
    City {
        label: "NEW YORK",
        region: "NY",
        climate: "humid subtropical",
    },
    City {
        label: "DETROIT",
        region: "MI",
        climate: "humid continental",
    },
    City {
        label: "ST LOUIS",
        region: "MO",
        climate: "humid continental",
    },
    City {
        label: "CHICAGO",
        region: "IL",
        climate: "humid continental",
    },
];

/// Returns every city label in registry order, as owned strings suitable
/// for a `ClimateConfig`.
pub fn all_city_labels() -> Vec<String> {
    CITY_REGISTRY.iter().map(|c| c.label.to_string()).collect()
}

/// Looks up a city by its exact label. Returns `None` if not found.
pub fn find_city(label: &str) -> Option<&'static City> {
    CITY_REGISTRY.iter().find(|c| c.label == label)
}

/// Labels in `labels` that are not in the registry.
/// Useful for flagging typos before running a long analysis.
pub fn unknown_cities<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| find_city(l).is_none())
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
