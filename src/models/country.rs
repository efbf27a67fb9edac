//! Country models
//!
//! Raw upstream payloads and the normalized records served to clients.
//! Every record field is always populated; absent upstream values get the
//! defaults listed on each conversion.

use anyhow::{bail, Context};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for missing text fields.
pub const UNKNOWN: &str = "Unknown";

// == Raw Upstream Payload ==

/// A country as returned by the REST Countries v3.1 API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCountry {
    pub name: Option<RawName>,
    pub flags: Option<RawFlags>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<u64>,
    pub capital: Option<Vec<String>>,
    pub currencies: Option<IndexMap<String, RawCurrency>>,
    pub languages: Option<IndexMap<String, String>>,
    pub timezones: Option<Vec<String>>,
    pub tld: Option<Vec<String>>,
    pub cca3: Option<String>,
    pub alpha3_code: Option<String>,
    pub area: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawName {
    pub common: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFlags {
    pub png: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurrency {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl RawCountry {
    pub fn name(&self) -> &str {
        non_empty(self.name.as_ref().and_then(|n| n.common.as_ref())).unwrap_or(UNKNOWN)
    }

    pub fn flag(&self) -> &str {
        non_empty(self.flags.as_ref().and_then(|f| f.png.as_ref())).unwrap_or("")
    }

    pub fn region(&self) -> &str {
        non_empty(self.region.as_ref()).unwrap_or(UNKNOWN)
    }

    pub fn subregion(&self) -> &str {
        non_empty(self.subregion.as_ref()).unwrap_or(UNKNOWN)
    }

    /// First listed capital, if the country has one.
    pub fn first_capital(&self) -> Option<&str> {
        non_empty(self.capital.as_ref().and_then(|c| c.first()))
    }

    pub fn capital(&self) -> &str {
        self.first_capital().unwrap_or(UNKNOWN)
    }

    pub fn timezones(&self) -> &[String] {
        self.timezones.as_deref().unwrap_or(&[])
    }

    pub fn alpha3_code(&self) -> &str {
        non_empty(self.cca3.as_ref())
            .or_else(|| non_empty(self.alpha3_code.as_ref()))
            .unwrap_or("")
    }

    pub fn currencies(&self) -> Vec<Currency> {
        self.currencies
            .iter()
            .flat_map(|map| map.values())
            .map(|c| Currency {
                name: c.name.clone().unwrap_or_default(),
                symbol: c.symbol.clone().unwrap_or_default(),
            })
            .collect()
    }

    /// Language names joined with `", "` in upstream order.
    pub fn languages(&self) -> String {
        match &self.languages {
            Some(map) if !map.is_empty() => map.values().cloned().collect::<Vec<_>>().join(", "),
            _ => UNKNOWN.to_string(),
        }
    }
}

// == Upstream Payload Parsing ==

/// Parses an upstream list response.
pub fn parse_country_list(payload: Value) -> anyhow::Result<Vec<RawCountry>> {
    serde_json::from_value(payload).context("upstream payload is not a list of countries")
}

/// Parses a single-country response. The upstream wraps lookups by code in
/// a one-element array; the first element is taken.
pub fn parse_single_country(payload: Value) -> anyhow::Result<RawCountry> {
    match payload {
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => serde_json::from_value(first).context("upstream country is malformed"),
            None => bail!("upstream returned an empty country list"),
        },
        other => serde_json::from_value(other).context("upstream country is malformed"),
    }
}

// == Normalized Records ==

/// A currency as `{name, symbol}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub name: String,
    pub symbol: String,
}

/// Entry in the full country list and in search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    pub name: String,
    pub flag: String,
    pub region: String,
    pub timezone: Vec<String>,
    pub capital: String,
    pub alpha3_code: String,
}

impl From<&RawCountry> for CountrySummary {
    fn from(raw: &RawCountry) -> Self {
        Self {
            name: raw.name().to_string(),
            flag: raw.flag().to_string(),
            region: raw.region().to_string(),
            timezone: raw.timezones().to_vec(),
            capital: raw.capital().to_string(),
            alpha3_code: raw.alpha3_code().to_string(),
        }
    }
}

/// Entry in a by-region listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCountry {
    pub name: String,
    pub flag: String,
    pub region: String,
}

impl From<&RawCountry> for RegionCountry {
    fn from(raw: &RawCountry) -> Self {
        Self {
            name: raw.name().to_string(),
            flag: raw.flag().to_string(),
            region: raw.region().to_string(),
        }
    }
}

/// Full record for a single country.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryDetail {
    pub name: String,
    pub flag: String,
    pub region: String,
    pub subregion: String,
    pub population: u64,
    pub capital: String,
    pub currencies: Vec<Currency>,
    pub languages: String,
    pub timezone: Vec<String>,
    pub top_level_domain: Vec<String>,
    pub alpha3_code: String,
}

impl From<&RawCountry> for CountryDetail {
    fn from(raw: &RawCountry) -> Self {
        Self {
            name: raw.name().to_string(),
            flag: raw.flag().to_string(),
            region: raw.region().to_string(),
            subregion: raw.subregion().to_string(),
            population: raw.population.unwrap_or(0),
            capital: raw.capital().to_string(),
            currencies: raw.currencies(),
            languages: raw.languages(),
            timezone: raw.timezones().to_vec(),
            top_level_domain: raw.tld.clone().unwrap_or_default(),
            alpha3_code: raw.alpha3_code().to_string(),
        }
    }
}

/// Record used by the side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryComparison {
    pub name: String,
    pub flag: String,
    pub region: String,
    pub subregion: String,
    pub population: u64,
    pub capital: String,
    pub area: f64,
    pub currencies: Vec<Currency>,
    pub languages: String,
    pub timezone: Vec<String>,
}

impl From<&RawCountry> for CountryComparison {
    fn from(raw: &RawCountry) -> Self {
        Self {
            name: raw.name().to_string(),
            flag: raw.flag().to_string(),
            region: raw.region().to_string(),
            subregion: raw.subregion().to_string(),
            population: raw.population.unwrap_or(0),
            capital: raw.capital().to_string(),
            area: raw.area.filter(|a| *a >= 0.0).unwrap_or(0.0),
            currencies: raw.currencies(),
            languages: raw.languages(),
            timezone: raw.timezones().to_vec(),
        }
    }
}

/// Distinct filter values offered to the UI, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub regions: Vec<String>,
    pub timezones: Vec<String>,
}

impl Filters {
    pub fn from_countries(countries: &[RawCountry]) -> Self {
        let mut regions = IndexSet::new();
        let mut timezones = IndexSet::new();

        for country in countries {
            if let Some(region) = non_empty(country.region.as_ref()) {
                regions.insert(region.to_string());
            }
            for tz in country.timezones().iter().filter(|tz| !tz.is_empty()) {
                timezones.insert(tz.clone());
            }
        }

        Self {
            regions: regions.into_iter().collect(),
            timezones: timezones.into_iter().collect(),
        }
    }
}
