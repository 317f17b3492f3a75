//! Population dataset types.
//!
//! The wire format is the stored document: a JSON object keyed by year
//! ("1950".."2021"), each year holding an array of country records with
//! `Country_name` / `Population` / `Continent` / `Flags` fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The five charted continents plus a catch-all for anything else.
///
/// Deserialization never fails on an unexpected continent string; such
/// records are kept and drawn in the theme's default color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Continent {
    Asia,
    Europe,
    Africa,
    America,
    Australia,
    Other,
}

/// The continents that have a filter button, in button order.
pub const CONTINENTS: [Continent; 5] = [
    Continent::Asia,
    Continent::Europe,
    Continent::Africa,
    Continent::America,
    Continent::Australia,
];

impl Continent {
    pub fn name(self) -> &'static str {
        match self {
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::Africa => "Africa",
            Self::America => "America",
            Self::Australia => "Australia",
            Self::Other => "Other",
        }
    }
}

impl From<String> for Continent {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Asia" => Self::Asia,
            "Europe" => Self::Europe,
            "Africa" => Self::Africa,
            "America" => Self::America,
            "Australia" => Self::Australia,
            _ => Self::Other,
        }
    }
}

impl From<Continent> for String {
    fn from(c: Continent) -> Self {
        c.name().to_string()
    }
}

/// One country in one year. `name` is unique within a year and is the
/// identity key for redraw matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(rename = "Country_name")]
    pub name: String,
    #[serde(rename = "Population")]
    pub population: u64,
    #[serde(rename = "Continent")]
    pub continent: Continent,
    #[serde(rename = "Flags")]
    pub flag: String,
}

/// The full dataset: year key -> that year's records.
///
/// Year keys are 4-digit strings, so the map's lexicographic order is
/// chronological order. The renderer never adds or removes keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyDataset(pub BTreeMap<String, Vec<CountryRecord>>);

impl YearlyDataset {
    /// Year keys in chronological order.
    pub fn year_keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn year_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self, year: &str) -> &[CountryRecord] {
        self.0.get(year).map(Vec::as_slice).unwrap_or(&[])
    }
}
