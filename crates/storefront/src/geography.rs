//! Country and subdivision lookup for address forms.
//!
//! The dataset is compiled into the binary from `data/geography.json`
//! (ISO 3166-1 countries with their top-level ISO 3166-2 subdivisions),
//! so lookups never leave the process.

use std::collections::HashMap;

use bc_storefront_core::CountryCode;
use serde::{Deserialize, Serialize};

const DATASET: &str = include_str!("../data/geography.json");

#[derive(Debug, Clone, Deserialize)]
struct Country {
    iso_code: String,
    name: String,
    #[serde(default)]
    states: Vec<Subdivision>,
}

#[derive(Debug, Clone, Deserialize)]
struct Subdivision {
    iso_code: String,
    name: String,
}

/// Country entry as listed to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRecord {
    pub name: String,
    pub sortname: String,
    pub id: String,
}

/// State / province entry as listed to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateRecord {
    pub name: String,
    pub id: String,
}

/// Read-only country and subdivision dataset.
#[derive(Debug, Clone)]
pub struct Geography {
    countries: Vec<Country>,
    by_code: HashMap<String, usize>,
}

impl Geography {
    /// Parse the embedded dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn load() -> Result<Self, serde_json::Error> {
        Self::from_json(DATASET)
    }

    fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let countries: Vec<Country> = serde_json::from_str(json)?;
        let by_code = countries
            .iter()
            .enumerate()
            .map(|(index, country)| (country.iso_code.to_ascii_uppercase(), index))
            .collect();

        Ok(Self { countries, by_code })
    }

    /// Every country, in dataset order.
    #[must_use]
    pub fn countries(&self) -> Vec<CountryRecord> {
        self.countries
            .iter()
            .map(|country| CountryRecord {
                name: country.name.clone(),
                sortname: country.name.clone(),
                id: country.iso_code.clone(),
            })
            .collect()
    }

    /// Subdivisions of a country; empty when the country is unknown.
    #[must_use]
    pub fn states_of(&self, code: &CountryCode) -> Vec<StateRecord> {
        self.by_code
            .get(code.as_str())
            .and_then(|index| self.countries.get(*index))
            .map(|country| {
                country
                    .states
                    .iter()
                    .map(|state| StateRecord {
                        name: state.name.clone(),
                        id: state.iso_code.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
