//! Cache Key Module
//!
//! Structured keys built from an endpoint and its effective parameters.

use std::fmt;

// == Endpoint ==
/// The cached endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    AllCountries,
    Country,
    Region,
    Search,
    Compare,
    Filters,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::AllCountries => "all_countries",
            Endpoint::Country => "country",
            Endpoint::Region => "region",
            Endpoint::Search => "search",
            Endpoint::Compare => "compare",
            Endpoint::Filters => "filters",
        }
    }
}

// == Cache Key ==
/// Identifies one cached response.
///
/// Parameters are kept sorted by name, so the order in which a caller
/// supplied them never changes the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    endpoint: Endpoint,
    params: Vec<(String, String)>,
}

impl CacheKey {
    /// Key for an endpoint without parameters.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
        }
    }

    /// Key for an endpoint with parameters, in any order.
    pub fn with_params<I, K, V>(endpoint: Endpoint, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        params.sort();
        Self { endpoint, params }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint.as_str())?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}
